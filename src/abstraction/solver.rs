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

//! This module defines the `Solver` abstraction: the interface of a driver
//! that walks a materialized nice tree decomposition and computes the size of
//! a minimum dominating set of the underlying graph.

use crate::BagId;

/// The outcome of a complete traversal of the decomposition.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Completion {
    /// The size of a minimum dominating set, or `None` when every complete
    /// assignment turned out infeasible. The latter cannot occur on a
    /// decomposition of an actual graph (selecting every vertex is always
    /// feasible) but the readout stays total rather than panicking.
    pub best_value: Option<usize>,
}

/// An invariant violation detected while running the dynamic program. These
/// conditions mean the input bypassed the structural validation or that the
/// engine itself is buggy; they are fatal and yield no partial result.
#[derive(Debug, thiserror::Error)]
pub enum SolveError {
    /// A non-leaf bag was visited without the child its type requires.
    #[error("bag {bag} is missing a child required by its type")]
    MissingChild { bag: BagId },
    /// A child state table was consumed twice, or never produced.
    #[error("the state table of bag {bag} is not available")]
    TableUnavailable { bag: BagId },
    /// A leaf bag held more than the single vertex the compatibility shim
    /// tolerates.
    #[error("leaf bag {bag} holds {size} vertices")]
    OversizedLeaf { bag: BagId, size: usize },
    /// An introduce bag did not extend its child's vertex set by exactly one
    /// vertex.
    #[error("bag {bag} does not introduce exactly one vertex over its child")]
    NotAnIntroduce { bag: BagId },
    /// A forget bag did not shrink its child's vertex set by exactly one
    /// vertex.
    #[error("bag {bag} does not forget exactly one vertex of its child")]
    NotAForget { bag: BagId },
    /// The single child of the root did not hold exactly one vertex.
    #[error("the root's child (bag {bag}) holds {size} vertices instead of one")]
    MalformedRootChild { bag: BagId, size: usize },
    /// A state table lookup missed: the 3^k key-set invariant was broken or
    /// two sibling tables cover different vertex sets.
    #[error("a coloring is missing from the state table of bag {bag}")]
    MissingColoring { bag: BagId },
}

/// This trait encapsulates a minimum dominating set solver: a driver that
/// traverses the decomposition bottom up, applies the per-bag transitions and
/// reads the optimum out of the root.
pub trait Solver {
    /// Runs the dynamic program to completion and returns the size of a
    /// minimum dominating set of the decomposed graph.
    fn minimize(&mut self) -> Result<Completion, SolveError>;
}
