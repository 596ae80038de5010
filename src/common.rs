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

//! This module defines the most basic data types that are used throughout all
//! the code of our library: the vertices of the input graph, the three-valued
//! coloring of a vertex inside a partial subproblem, and the saturating cost
//! arithmetic used by the state tables.

// ----------------------------------------------------------------------------
// --- VERTEX -----------------------------------------------------------------
// ----------------------------------------------------------------------------
/// This type denotes a vertex of the graph whose minimum dominating set is
/// being computed. Each vertex is assumed to be identified with an integer.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Vertex(pub usize);
impl Vertex {
    #[inline]
    /// This function returns the id (numeric value) of the vertex.
    pub fn id(self) -> usize {
        self.0
    }
}

/// The identifier of a bag in the nice tree decomposition. Bag identifiers
/// are dense: they index the vector holding the materialized bags, and the
/// identifier 0 is reserved for the root.
pub type BagId = usize;

// ----------------------------------------------------------------------------
// --- COLOR ------------------------------------------------------------------
// ----------------------------------------------------------------------------
/// The color assigned to a vertex of a bag inside a partial subproblem.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum Color {
    /// The vertex is not selected into the dominating set and is not yet
    /// dominated within the processed subtree. It still demands domination
    /// from a neighbor that will be introduced above.
    White = 0,
    /// The vertex is selected into the dominating set.
    Black = 1,
    /// The vertex is not selected and is either already dominated or has been
    /// released from the domination requirement within the processed subtree.
    Grey = 2,
}

/// All three colors, in a fixed order. Used to enumerate the colorings of a
/// bag.
pub const COLORS: [Color; 3] = [Color::White, Color::Black, Color::Grey];

/// The per-vertex consistency table of the join transition. Each row gives
/// the color of a vertex in the parent bag and the colors it must take in the
/// left and right children respectively: a Black vertex is selected in both
/// children; a White demand is carried by exactly one of the two children
/// (the other sees the vertex as Grey) so that the obligation is never
/// counted twice; a Grey vertex stays Grey on both sides.
pub const CONSISTENT_COLORS: [(Color, Color, Color); 4] = [
    (Color::Black, Color::Black, Color::Black),
    (Color::White, Color::White, Color::Grey),
    (Color::White, Color::Grey, Color::White),
    (Color::Grey, Color::Grey, Color::Grey),
];

// ----------------------------------------------------------------------------
// --- COST -------------------------------------------------------------------
// ----------------------------------------------------------------------------
/// The cost of a partial solution: either the number of vertices selected so
/// far, or the `INFINITE` sentinel standing for an infeasible coloring. All
/// arithmetic saturates at the sentinel, so a sum involving infinity is
/// infinity and never wraps around.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Cost(usize);

impl Cost {
    /// The cost of an empty partial solution.
    pub const ZERO: Cost = Cost(0);
    /// The sentinel marking an infeasible coloring.
    pub const INFINITE: Cost = Cost(usize::MAX);

    /// Creates the cost of a feasible partial solution of the given size.
    pub fn new(value: usize) -> Cost {
        debug_assert!(value < usize::MAX);
        Cost(value)
    }

    /// True iff this cost is the infeasibility sentinel.
    pub fn is_infinite(self) -> bool {
        self == Cost::INFINITE
    }

    /// The size of the partial solution, or `None` when infeasible.
    pub fn value(self) -> Option<usize> {
        if self.is_infinite() {
            None
        } else {
            Some(self.0)
        }
    }

    /// Adds two costs; any operand being infinite makes the result infinite.
    pub fn saturating_add(self, other: Cost) -> Cost {
        if self.is_infinite() || other.is_infinite() {
            Cost::INFINITE
        } else {
            Cost(self.0 + other.0)
        }
    }

    /// Subtracts `amount` from a finite cost; infinity absorbs the
    /// subtraction. Used by the join transition to undo the double counting
    /// of the Black vertices shared by both children.
    pub fn saturating_sub(self, amount: usize) -> Cost {
        if self.is_infinite() {
            Cost::INFINITE
        } else {
            Cost(self.0.saturating_sub(amount))
        }
    }
}

impl std::fmt::Debug for Cost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.value() {
            Some(v) => write!(f, "{v}"),
            None => write!(f, "inf"),
        }
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod test_cost {
    use crate::Cost;

    #[test]
    fn finite_addition_behaves_like_plain_integers() {
        assert_eq!(Cost::new(5), Cost::new(2).saturating_add(Cost::new(3)));
        assert_eq!(Some(5), Cost::new(5).value());
    }

    #[test]
    fn infinity_absorbs_addition() {
        assert!(Cost::INFINITE.saturating_add(Cost::new(3)).is_infinite());
        assert!(Cost::new(3).saturating_add(Cost::INFINITE).is_infinite());
        assert!(Cost::INFINITE.saturating_add(Cost::INFINITE).is_infinite());
    }

    #[test]
    fn infinity_absorbs_subtraction() {
        assert!(Cost::INFINITE.saturating_sub(4).is_infinite());
        assert_eq!(Cost::new(1), Cost::new(5).saturating_sub(4));
    }

    #[test]
    fn infinity_is_greater_than_any_finite_cost() {
        assert!(Cost::new(usize::MAX - 1) < Cost::INFINITE);
        assert!(Cost::ZERO < Cost::INFINITE);
        assert_eq!(Cost::ZERO, Cost::new(7).min(Cost::ZERO));
        assert_eq!(Cost::new(7), Cost::new(7).min(Cost::INFINITE));
    }
}

#[cfg(test)]
mod test_consistency {
    use crate::{Color, CONSISTENT_COLORS};

    #[test]
    fn black_is_selected_on_both_sides() {
        let blacks = CONSISTENT_COLORS
            .iter()
            .filter(|(p, _, _)| *p == Color::Black)
            .collect::<Vec<_>>();
        assert_eq!(1, blacks.len());
        assert_eq!(&(Color::Black, Color::Black, Color::Black), blacks[0]);
    }

    #[test]
    fn a_white_demand_is_carried_by_exactly_one_child() {
        for (parent, left, right) in CONSISTENT_COLORS {
            if parent == Color::White {
                let whites = [left, right]
                    .iter()
                    .filter(|c| **c == Color::White)
                    .count();
                assert_eq!(1, whites);
            }
        }
    }
}
