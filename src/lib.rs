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

//! # TDOM
//! TDOM computes the size of a **minimum dominating set** of an undirected
//! simple graph by dynamic programming over a **nice tree decomposition** of
//! that graph. The decomposition itself is an input: the caller (typically
//! the bundled binary, reading the text format of the [`io`] module) hands
//! over one description per bag, and the engine walks the bags bottom up.
//!
//! The dynamic program assigns each vertex of a bag one of three colors:
//! *Black* (selected into the dominating set), *White* (not selected and not
//! yet dominated: a demand the surrounding graph still has to fulfil) and
//! *Grey* (not selected, already dominated or released from the demand).
//! Each bag maps all 3^k colorings of its k vertices to the cheapest
//! compatible partial solution; the four transition rules — introduce a
//! vertex, introduce an edge, forget a vertex, join two subtrees — rewrite
//! those tables until the root reads the optimum out of its single child.
//! The cost of this exactness is an exponential dependency on the
//! decomposition width, not on the graph size.
//!
//! ## Quick Example
//! The following solves the two-vertex graph with a single edge: one
//! endpoint suffices to dominate both vertices.
//!
//! ```
//! use tdom::*;
//!
//! // root {} <- forget {1} <- introduce {0,1} + edge (0,1) <- introduce {0} <- leaf {}
//! let decomposition = Decomposition::new(vec![
//!     BagSpec { id: 0, bag_type: BagType::Forget, parent: None, vertices: vec![], edges: vec![] },
//!     BagSpec { id: 1, bag_type: BagType::Forget, parent: Some(0), vertices: vec![Vertex(1)], edges: vec![] },
//!     BagSpec {
//!         id: 2,
//!         bag_type: BagType::Introduce,
//!         parent: Some(1),
//!         vertices: vec![Vertex(0), Vertex(1)],
//!         edges: vec![(Vertex(0), Vertex(1))],
//!     },
//!     BagSpec { id: 3, bag_type: BagType::Introduce, parent: Some(2), vertices: vec![Vertex(0)], edges: vec![] },
//!     BagSpec { id: 4, bag_type: BagType::Leaf, parent: Some(3), vertices: vec![], edges: vec![] },
//! ]).unwrap();
//!
//! let mut solver = SequentialSolver::new(&decomposition);
//! let completion = solver.minimize().unwrap();
//! assert_eq!(Some(1), completion.best_value);
//! ```

mod common;
mod abstraction;
mod implementation;
pub mod io;

pub use common::*;
pub use abstraction::*;
pub use implementation::*;
