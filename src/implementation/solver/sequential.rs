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

//! This module provides the implementation of a sequential solver: a single
//! thread walks the decomposition in post-order, dispatches the transition
//! matching each bag's type, applies the introduce-edge updates declared on
//! the bag, and reads the optimum out of the root's single child.

use crate::{
    transition, BagId, BagType, Color, ColorPairInterner, Coloring, Completion, Decomposition,
    Solver, SolveError, StateTable, ROOT,
};

/// This is the structure implementing the single-threaded driver of the
/// dynamic program.
///
/// # Example Usage
/// ```
/// # use tdom::*;
/// // the path graph 0 - 1: root {} <- f {1} <- i {0,1}+e(0,1) <- i {0} <- l {}
/// let decomposition = Decomposition::new(vec![
///     BagSpec { id: 0, bag_type: BagType::Forget, parent: None, vertices: vec![], edges: vec![] },
///     BagSpec { id: 1, bag_type: BagType::Forget, parent: Some(0), vertices: vec![Vertex(1)], edges: vec![] },
///     BagSpec {
///         id: 2,
///         bag_type: BagType::Introduce,
///         parent: Some(1),
///         vertices: vec![Vertex(0), Vertex(1)],
///         edges: vec![(Vertex(0), Vertex(1))],
///     },
///     BagSpec { id: 3, bag_type: BagType::Introduce, parent: Some(2), vertices: vec![Vertex(0)], edges: vec![] },
///     BagSpec { id: 4, bag_type: BagType::Leaf, parent: Some(3), vertices: vec![], edges: vec![] },
/// ]).unwrap();
///
/// let mut solver = SequentialSolver::new(&decomposition);
/// let completion = solver.minimize().unwrap();
/// assert_eq!(Some(1), completion.best_value);
/// ```
pub struct SequentialSolver<'a> {
    /// The decomposition being walked. It is never mutated: the evolving
    /// state lives in the `tables` slots.
    decomposition: &'a Decomposition,
    /// The canonical (vertex, color) pairs of this run.
    interner: ColorPairInterner,
    /// One state table slot per bag. A slot is filled when the bag's
    /// transition completes and emptied as soon as the parent consumes it,
    /// which releases the dominant share of the memory as early as possible.
    tables: Vec<Option<StateTable>>,
}

impl<'a> SequentialSolver<'a> {
    /// Creates a fresh driver for the given decomposition.
    pub fn new(decomposition: &'a Decomposition) -> Self {
        let tables = (0..decomposition.nb_bags()).map(|_| None).collect();
        SequentialSolver {
            decomposition,
            interner: ColorPairInterner::new(),
            tables,
        }
    }

    /// Removes and returns the state table of the given bag, thereby
    /// releasing the slot.
    fn take_table(&mut self, id: BagId) -> Result<StateTable, SolveError> {
        self.tables[id]
            .take()
            .ok_or(SolveError::TableUnavailable { bag: id })
    }

    /// Runs the primary transition of one non-root bag, applies its
    /// introduce-edge updates in declaration order, and parks the resulting
    /// table in the bag's slot.
    fn process(&mut self, id: BagId) -> Result<(), SolveError> {
        let decomposition = self.decomposition;
        let bag = decomposition.bag(id);

        let mut table = match bag.bag_type {
            BagType::Leaf => transition::leaf(bag, &self.interner)?,
            BagType::Introduce => {
                let child_id = bag.child1.ok_or(SolveError::MissingChild { bag: id })?;
                let child_table = self.take_table(child_id)?;
                transition::introduce_vertex(
                    bag,
                    decomposition.bag(child_id),
                    &child_table,
                    &self.interner,
                )?
            }
            BagType::Forget => {
                let child_id = bag.child1.ok_or(SolveError::MissingChild { bag: id })?;
                let child_table = self.take_table(child_id)?;
                transition::forget_vertex(
                    bag,
                    decomposition.bag(child_id),
                    &child_table,
                    &self.interner,
                )?
            }
            BagType::Join => {
                let left_id = bag.child1.ok_or(SolveError::MissingChild { bag: id })?;
                let right_id = bag.child2.ok_or(SolveError::MissingChild { bag: id })?;
                let left_table = self.take_table(left_id)?;
                let right_table = self.take_table(right_id)?;
                transition::join(
                    bag,
                    decomposition.bag(left_id),
                    decomposition.bag(right_id),
                    &left_table,
                    &right_table,
                    &self.interner,
                )?
            }
        };

        for &(u, v) in &bag.edges {
            transition::introduce_edge(bag, &mut table, u, v, &self.interner)?;
        }

        self.tables[id] = Some(table);
        Ok(())
    }

    /// Reads the optimum out of the root: its single child holds exactly one
    /// vertex, which undergoes the final forget. That vertex must end up
    /// selected (Black) or dominated (recorded on its White entry); its
    /// unconstrained Grey entry does not describe a dominating set and takes
    /// no part in the readout.
    fn readout(&mut self) -> Result<Completion, SolveError> {
        let decomposition = self.decomposition;
        let root = decomposition.root();
        let child_id = root.child1.ok_or(SolveError::MissingChild { bag: ROOT })?;
        let child = decomposition.bag(child_id);
        if child.vertices.len() != 1 {
            return Err(SolveError::MalformedRootChild {
                bag: child_id,
                size: child.vertices.len(),
            });
        }
        let vertex = child.vertices[0];
        let table = self.take_table(child_id)?;

        let single = |color| Coloring::from_iter([self.interner.intern(vertex, color)]);
        let if_selected = table
            .cost(&single(Color::Black))
            .ok_or(SolveError::MissingColoring { bag: child_id })?;
        let if_dominated = table
            .cost(&single(Color::White))
            .ok_or(SolveError::MissingColoring { bag: child_id })?;

        Ok(Completion {
            best_value: if_selected.min(if_dominated).value(),
        })
    }
}

impl Solver for SequentialSolver<'_> {
    fn minimize(&mut self) -> Result<Completion, SolveError> {
        let order = self.decomposition.postorder();
        for &id in order {
            if id == ROOT {
                break;
            }
            self.process(id)?;
        }
        self.readout()
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod test_sequential {
    use crate::{BagSpec, BagType, Decomposition, SequentialSolver, Solver, Vertex};

    fn spec(
        id: usize,
        bag_type: BagType,
        parent: Option<usize>,
        vertices: &[usize],
        edges: &[(usize, usize)],
    ) -> BagSpec {
        BagSpec {
            id,
            bag_type,
            parent,
            vertices: vertices.iter().map(|&v| Vertex(v)).collect(),
            edges: edges.iter().map(|&(u, v)| (Vertex(u), Vertex(v))).collect(),
        }
    }

    #[test]
    fn an_isolated_vertex_dominates_itself() {
        let decomposition = Decomposition::new(vec![
            spec(0, BagType::Forget, None, &[], &[]),
            spec(1, BagType::Introduce, Some(0), &[0], &[]),
            spec(2, BagType::Leaf, Some(1), &[], &[]),
        ])
        .unwrap();
        let completion = SequentialSolver::new(&decomposition).minimize().unwrap();
        assert_eq!(Some(1), completion.best_value);
    }

    #[test]
    fn one_endpoint_dominates_a_single_edge() {
        let decomposition = Decomposition::new(vec![
            spec(0, BagType::Forget, None, &[], &[]),
            spec(1, BagType::Forget, Some(0), &[1], &[]),
            spec(2, BagType::Introduce, Some(1), &[0, 1], &[(0, 1)]),
            spec(3, BagType::Introduce, Some(2), &[0], &[]),
            spec(4, BagType::Leaf, Some(3), &[], &[]),
        ])
        .unwrap();
        let completion = SequentialSolver::new(&decomposition).minimize().unwrap();
        assert_eq!(Some(1), completion.best_value);
    }

    #[test]
    fn a_one_vertex_leaf_decomposition_is_accepted() {
        // same single vertex graph, with the compatibility shim exercised
        let decomposition = Decomposition::new(vec![
            spec(0, BagType::Forget, None, &[], &[]),
            spec(1, BagType::Leaf, Some(0), &[0], &[]),
        ])
        .unwrap();
        let completion = SequentialSolver::new(&decomposition).minimize().unwrap();
        assert_eq!(Some(1), completion.best_value);
    }

    #[test]
    fn minimizing_twice_yields_identical_output() {
        let decomposition = Decomposition::new(vec![
            spec(0, BagType::Forget, None, &[], &[]),
            spec(1, BagType::Forget, Some(0), &[1], &[]),
            spec(2, BagType::Introduce, Some(1), &[0, 1], &[(0, 1)]),
            spec(3, BagType::Introduce, Some(2), &[0], &[]),
            spec(4, BagType::Leaf, Some(3), &[], &[]),
        ])
        .unwrap();
        // every run recomputes the tables from the leaves up, so one driver
        // can be reused and two drivers agree
        let mut solver = SequentialSolver::new(&decomposition);
        assert_eq!(solver.minimize().unwrap(), solver.minimize().unwrap());
        assert_eq!(
            solver.minimize().unwrap(),
            SequentialSolver::new(&decomposition).minimize().unwrap()
        );
    }
}
