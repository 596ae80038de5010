// Copyright 2020 Xavier Gillard
//
// Permission is hereby granted, free of charge, to any person obtaining a copy of
// this software and associated documentation files (the "Software"), to deal in
// the Software without restriction, including without limitation the rights to
// use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS
// FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR
// COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER
// IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! This module provides the state table attached to every bag during the
//! traversal: the mapping from each of the 3^k colorings of the bag's k
//! vertices to the cost of the cheapest compatible partial solution. It also
//! provides the two enumerations the transitions are built on: all colorings
//! of a vertex set, and all pointwise-consistent coloring triples of a join.

use fxhash::FxHashMap;

use crate::{Coloring, ColorPairInterner, Cost, Vertex, COLORS, CONSISTENT_COLORS};

/// The state table of one bag. Once a bag's transition has run, the key set
/// is exactly the 3^k colorings over the bag's vertex set.
#[derive(Debug, Default)]
pub struct StateTable {
    entries: FxHashMap<Coloring, Cost>,
}

impl StateTable {
    /// Creates an empty table to be filled by a transition.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the table holding every coloring of the given vertex set,
    /// each mapped to the infeasibility sentinel. This is the starting point
    /// of the join transition, which then relaxes entries downwards.
    pub fn infinite(vertices: &[Vertex], interner: &ColorPairInterner) -> Self {
        let mut table = StateTable {
            entries: FxHashMap::with_capacity_and_hasher(
                3usize.pow(vertices.len() as u32),
                Default::default(),
            ),
        };
        for coloring in all_colorings(vertices, interner) {
            table.entries.insert(coloring, Cost::INFINITE);
        }
        table
    }

    /// The number of colorings stored.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True iff the table holds no coloring at all. Note that the table of
    /// an empty bag is *not* empty: it holds the empty coloring.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The cost stored for the given coloring, if the coloring belongs to
    /// the table's key set.
    pub fn cost(&self, coloring: &Coloring) -> Option<Cost> {
        self.entries.get(coloring).copied()
    }

    /// Stores (or overwrites) the cost of the given coloring.
    pub fn set(&mut self, coloring: Coloring, cost: Cost) {
        self.entries.insert(coloring, cost);
    }

    /// Lowers the stored cost of the given coloring to `cost` if that is an
    /// improvement. Returns false iff the coloring is not a key of the table.
    pub fn improve(&mut self, coloring: &Coloring, cost: Cost) -> bool {
        match self.entries.get_mut(coloring) {
            Some(stored) => {
                if cost < *stored {
                    *stored = cost;
                }
                true
            }
            None => false,
        }
    }

    /// Iterates over the (coloring, cost) entries in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&Coloring, Cost)> {
        self.entries.iter().map(|(c, v)| (c, *v))
    }
}

/// Enumerates the 3^k colorings of the given vertex set.
pub fn all_colorings(vertices: &[Vertex], interner: &ColorPairInterner) -> Vec<Coloring> {
    let mut colorings = vec![Coloring::with_capacity(vertices.len())];
    for &vertex in vertices {
        let mut extended = Vec::with_capacity(colorings.len() * COLORS.len());
        for color in COLORS {
            let pair = interner.intern(vertex, color);
            for coloring in &colorings {
                extended.push(coloring.extended(&pair));
            }
        }
        colorings = extended;
    }
    colorings
}

/// Enumerates the 4^k pointwise-consistent triples (parent, left, right) of
/// colorings over the given vertex set: the cartesian product, across the
/// vertices, of the four rows of the consistency table.
pub fn consistent_triples(
    vertices: &[Vertex],
    interner: &ColorPairInterner,
) -> Vec<(Coloring, Coloring, Coloring)> {
    let empty = || Coloring::with_capacity(vertices.len());
    let mut triples = vec![(empty(), empty(), empty())];
    for &vertex in vertices {
        let mut extended = Vec::with_capacity(triples.len() * CONSISTENT_COLORS.len());
        for (parent, left, right) in CONSISTENT_COLORS {
            let in_parent = interner.intern(vertex, parent);
            let in_left = interner.intern(vertex, left);
            let in_right = interner.intern(vertex, right);
            for (p, l, r) in &triples {
                extended.push((
                    p.extended(&in_parent),
                    l.extended(&in_left),
                    r.extended(&in_right),
                ));
            }
        }
        triples = extended;
    }
    triples
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod test_enumeration {
    use crate::{
        all_colorings, consistent_triples, Color, ColorPairInterner, Vertex, CONSISTENT_COLORS,
    };

    #[test]
    fn an_empty_vertex_set_has_one_coloring() {
        let interner = ColorPairInterner::new();
        let colorings = all_colorings(&[], &interner);
        assert_eq!(1, colorings.len());
        assert!(colorings[0].is_empty());
    }

    #[test]
    fn a_bag_of_k_vertices_has_3_pow_k_colorings() {
        let interner = ColorPairInterner::new();
        let vertices = [Vertex(0), Vertex(1), Vertex(2)];
        let colorings = all_colorings(&vertices, &interner);
        assert_eq!(27, colorings.len());
        // all distinct and all complete
        for (i, a) in colorings.iter().enumerate() {
            assert_eq!(3, a.len());
            for b in colorings.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn a_join_over_k_vertices_has_4_pow_k_triples() {
        let interner = ColorPairInterner::new();
        let vertices = [Vertex(0), Vertex(1)];
        assert_eq!(16, consistent_triples(&vertices, &interner).len());
    }

    #[test]
    fn every_triple_is_pointwise_consistent() {
        let interner = ColorPairInterner::new();
        let vertices = [Vertex(0), Vertex(1), Vertex(2)];
        for (parent, left, right) in consistent_triples(&vertices, &interner) {
            for &vertex in &vertices {
                let row = (
                    parent.color_of(vertex).unwrap(),
                    left.color_of(vertex).unwrap(),
                    right.color_of(vertex).unwrap(),
                );
                assert!(CONSISTENT_COLORS.contains(&row));
            }
        }
    }

    #[test]
    fn a_white_parent_yields_two_triples_per_vertex() {
        let interner = ColorPairInterner::new();
        let vertices = [Vertex(0)];
        let whites = consistent_triples(&vertices, &interner)
            .iter()
            .filter(|(p, _, _)| p.color_of(Vertex(0)) == Some(Color::White))
            .count();
        assert_eq!(2, whites);
    }
}

#[cfg(test)]
mod test_state_table {
    use crate::{all_colorings, ColorPairInterner, Cost, StateTable, Vertex};

    #[test]
    fn infinite_tables_cover_the_whole_coloring_space() {
        let interner = ColorPairInterner::new();
        let vertices = [Vertex(0), Vertex(1)];
        let table = StateTable::infinite(&vertices, &interner);
        assert_eq!(9, table.len());
        for coloring in all_colorings(&vertices, &interner) {
            assert_eq!(Some(Cost::INFINITE), table.cost(&coloring));
        }
    }

    #[test]
    fn improve_only_lowers() {
        let interner = ColorPairInterner::new();
        let vertices = [Vertex(0)];
        let mut table = StateTable::infinite(&vertices, &interner);
        let colorings = all_colorings(&vertices, &interner);
        let key = &colorings[0];

        assert!(table.improve(key, Cost::new(3)));
        assert_eq!(Some(Cost::new(3)), table.cost(key));
        assert!(table.improve(key, Cost::new(5)));
        assert_eq!(Some(Cost::new(3)), table.cost(key));
        assert!(table.improve(key, Cost::new(1)));
        assert_eq!(Some(Cost::new(1)), table.cost(key));
    }

    #[test]
    fn improve_rejects_foreign_colorings() {
        let interner = ColorPairInterner::new();
        let mut table = StateTable::infinite(&[Vertex(0)], &interner);
        let foreign = all_colorings(&[Vertex(1)], &interner);
        assert!(!table.improve(&foreign[0], Cost::ZERO));
    }
}
