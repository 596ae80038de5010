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

//! This module implements the per-bag transition rules of the dynamic
//! program: the leaf base case, introduce-vertex, introduce-edge, forget and
//! join. Each rule derives a bag's state table from the table(s) of its
//! child(ren); the introduce-edge rule updates a bag's own table in place
//! after its primary transition has run.

use crate::{
    all_colorings, consistent_triples, Bag, BagId, Color, ColorPairInterner, Coloring, Cost,
    SolveError, StateTable, Vertex,
};

/// Builds the state table of a leaf bag. A strict nice tree decomposition
/// leaf is empty and its table holds the single empty coloring at cost zero.
/// One-vertex leaves (emitted by some decomposers) are initialized to what
/// introducing that vertex over an empty leaf would have produced.
pub fn leaf(bag: &Bag, interner: &ColorPairInterner) -> Result<StateTable, SolveError> {
    let mut table = StateTable::new();
    match *bag.vertices.as_slice() {
        [] => {
            table.set(Coloring::new(), Cost::ZERO);
        }
        [vertex] => {
            let single =
                |color| Coloring::from_iter([interner.intern(vertex, color)]);
            table.set(single(Color::White), Cost::INFINITE);
            table.set(single(Color::Grey), Cost::ZERO);
            table.set(single(Color::Black), Cost::new(1));
        }
        _ => {
            return Err(SolveError::OversizedLeaf {
                bag: bag.id,
                size: bag.vertices.len(),
            })
        }
    }
    Ok(table)
}

/// Builds the state table of an introduce bag from its child's table. The
/// introduced vertex has no incident edge yet among the bag's vertices, so a
/// White assignment is infeasible for now (the introduce-edge updates running
/// at this same bag may later transfer domination onto it), a Grey assignment
/// inherits the child's cost unchanged and a Black assignment pays for the
/// newly selected vertex.
pub fn introduce_vertex(
    bag: &Bag,
    child: &Bag,
    child_table: &StateTable,
    interner: &ColorPairInterner,
) -> Result<StateTable, SolveError> {
    let vertex = introduced_vertex(bag, child)?;
    let mut table = StateTable::new();
    for coloring in all_colorings(&bag.vertices, interner) {
        let color = coloring
            .color_of(vertex)
            .ok_or(SolveError::MissingColoring { bag: bag.id })?;
        let value = match color {
            Color::White => Cost::INFINITE,
            Color::Grey => lookup(child_table, &coloring.restricted(vertex), child.id)?,
            Color::Black => lookup(child_table, &coloring.restricted(vertex), child.id)?
                .saturating_add(Cost::new(1)),
        };
        table.set(coloring, value);
    }
    Ok(table)
}

/// Applies one introduce-edge update to the bag's own table. Every coloring
/// selecting one endpoint (Black) while the other still demands domination
/// (White) adopts the cost of its sibling coloring in which the demanding
/// endpoint is already considered dominated (Grey): the new edge witnesses
/// the domination.
///
/// All rewritten entries are Black/White ones and all entries read are
/// Black/Grey or Grey/Black ones, so the updates of a single edge never feed
/// each other; the new values are nevertheless collected first and written
/// after the scan so every read targets the pristine snapshot.
pub fn introduce_edge(
    bag: &Bag,
    table: &mut StateTable,
    u: Vertex,
    v: Vertex,
    interner: &ColorPairInterner,
) -> Result<(), SolveError> {
    let u_black = interner.intern(u, Color::Black);
    let u_white = interner.intern(u, Color::White);
    let v_black = interner.intern(v, Color::Black);
    let v_white = interner.intern(v, Color::White);

    let mut rewrites = Vec::new();
    for (coloring, _) in table.iter() {
        let released = if coloring.contains(&u_black) && coloring.contains(&v_white) {
            coloring.recolored(v, Color::Grey, interner)
        } else if coloring.contains(&u_white) && coloring.contains(&v_black) {
            coloring.recolored(u, Color::Grey, interner)
        } else {
            continue;
        };
        let value = lookup(table, &released, bag.id)?;
        rewrites.push((coloring.clone(), value));
    }
    for (coloring, value) in rewrites {
        table.set(coloring, value);
    }
    Ok(())
}

/// Builds the state table of a forget bag from its child's table. The
/// vertex leaving the bag must be dominated for good: either it was selected
/// (Black) or its domination demand was resolved by an earlier introduce-edge
/// update (recorded on the White entry). The child's Grey extensions carry no
/// such commitment and deliberately do not participate.
pub fn forget_vertex(
    bag: &Bag,
    child: &Bag,
    child_table: &StateTable,
    interner: &ColorPairInterner,
) -> Result<StateTable, SolveError> {
    let vertex = forgotten_vertex(bag, child)?;
    let selected = interner.intern(vertex, Color::Black);
    let dominated = interner.intern(vertex, Color::White);

    let mut table = StateTable::new();
    for coloring in all_colorings(&bag.vertices, interner) {
        let if_selected = lookup(child_table, &coloring.extended(&selected), child.id)?;
        let if_dominated = lookup(child_table, &coloring.extended(&dominated), child.id)?;
        table.set(coloring, if_selected.min(if_dominated));
    }
    Ok(table)
}

/// Builds the state table of a join bag from the tables of its two children.
/// For every pointwise-consistent triple, the candidate cost is the sum of
/// both children's costs minus the number of Black vertices of the parent
/// coloring, which both children counted. The table keeps the minimum over
/// all triples sharing one parent coloring.
pub fn join(
    bag: &Bag,
    left: &Bag,
    right: &Bag,
    left_table: &StateTable,
    right_table: &StateTable,
    interner: &ColorPairInterner,
) -> Result<StateTable, SolveError> {
    let mut table = StateTable::infinite(&bag.vertices, interner);
    for (coloring, in_left, in_right) in consistent_triples(&bag.vertices, interner) {
        let shared_black = coloring.count_of(Color::Black);
        let left_cost = lookup(left_table, &in_left, left.id)?;
        let right_cost = lookup(right_table, &in_right, right.id)?;
        let candidate = left_cost
            .saturating_add(right_cost)
            .saturating_sub(shared_black);
        if !table.improve(&coloring, candidate) {
            return Err(SolveError::MissingColoring { bag: bag.id });
        }
    }
    Ok(table)
}

fn lookup(table: &StateTable, coloring: &Coloring, bag: BagId) -> Result<Cost, SolveError> {
    table
        .cost(coloring)
        .ok_or(SolveError::MissingColoring { bag })
}

/// The vertex present in the introduce bag but not in its child.
fn introduced_vertex(bag: &Bag, child: &Bag) -> Result<Vertex, SolveError> {
    match sole_difference(&bag.vertices, &child.vertices) {
        Some(vertex) => Ok(vertex),
        None => Err(SolveError::NotAnIntroduce { bag: bag.id }),
    }
}

/// The vertex present in the child of the forget bag but not in the bag.
fn forgotten_vertex(bag: &Bag, child: &Bag) -> Result<Vertex, SolveError> {
    match sole_difference(&child.vertices, &bag.vertices) {
        Some(vertex) => Ok(vertex),
        None => Err(SolveError::NotAForget { bag: bag.id }),
    }
}

/// The single vertex of `larger` missing from `smaller`, provided the two
/// sets differ by exactly that vertex.
fn sole_difference(larger: &[Vertex], smaller: &[Vertex]) -> Option<Vertex> {
    if larger.len() != smaller.len() + 1 {
        return None;
    }
    let mut extra = larger.iter().filter(|v| !smaller.contains(v));
    match (extra.next(), extra.next()) {
        (Some(&vertex), None) => Some(vertex),
        _ => None,
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################
