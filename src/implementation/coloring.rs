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

//! This module provides the coloring container: a partial assignment of
//! colors to the vertices of one bag. A coloring is semantically a *set* of
//! interned (vertex, color) pairs in which each vertex occurs at most once;
//! its hash and equality are order-insensitive so that two colorings built by
//! enumerating the same bag in different vertex orders are interchangeable as
//! state table keys.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::{Color, ColorPair, ColorPairInterner, Vertex};

/// A partial assignment of colors to the vertices of a bag.
///
/// All the pairs held by the colorings of one run must originate from the
/// same interner: membership tests and equality rely on pointer identity.
#[derive(Debug, Clone, Default)]
pub struct Coloring {
    pairs: Vec<Arc<ColorPair>>,
}

impl Coloring {
    /// Creates an empty coloring.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty coloring with room for a bag of the given size.
    pub fn with_capacity(capacity: usize) -> Self {
        Coloring { pairs: Vec::with_capacity(capacity) }
    }

    /// The number of colored vertices.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// True iff no vertex is colored.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Adds one colored vertex. The vertex must not be colored already.
    pub fn push(&mut self, pair: Arc<ColorPair>) {
        debug_assert!(self.color_of(pair.vertex()).is_none());
        self.pairs.push(pair);
    }

    /// Iterates over the colored vertices, in insertion order. The order
    /// carries no meaning.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<ColorPair>> {
        self.pairs.iter()
    }

    /// Membership test by identity.
    pub fn contains(&self, pair: &Arc<ColorPair>) -> bool {
        self.pairs.iter().any(|p| Arc::ptr_eq(p, pair))
    }

    /// The color assigned to the given vertex, if any.
    pub fn color_of(&self, vertex: Vertex) -> Option<Color> {
        self.pairs
            .iter()
            .find(|p| p.vertex() == vertex)
            .map(|p| p.color())
    }

    /// The number of vertices bearing the given color.
    pub fn count_of(&self, color: Color) -> usize {
        self.pairs.iter().filter(|p| p.color() == color).count()
    }

    /// A copy of this coloring restricted to every vertex but the given one.
    pub fn restricted(&self, vertex: Vertex) -> Coloring {
        let pairs = self
            .pairs
            .iter()
            .filter(|p| p.vertex() != vertex)
            .cloned()
            .collect();
        Coloring { pairs }
    }

    /// A copy of this coloring extended with one more colored vertex.
    pub fn extended(&self, pair: &Arc<ColorPair>) -> Coloring {
        let mut copy = Coloring { pairs: Vec::with_capacity(self.len() + 1) };
        copy.pairs.extend(self.pairs.iter().cloned());
        copy.push(pair.clone());
        copy
    }

    /// A copy of this coloring in which the given vertex is reassigned to the
    /// given color.
    pub fn recolored(
        &self,
        vertex: Vertex,
        color: Color,
        interner: &ColorPairInterner,
    ) -> Coloring {
        let pairs = self
            .pairs
            .iter()
            .map(|p| {
                if p.vertex() == vertex {
                    interner.intern(vertex, color)
                } else {
                    p.clone()
                }
            })
            .collect();
        Coloring { pairs }
    }
}

impl FromIterator<Arc<ColorPair>> for Coloring {
    fn from_iter<I: IntoIterator<Item = Arc<ColorPair>>>(iter: I) -> Self {
        let mut coloring = Coloring::new();
        for pair in iter {
            coloring.push(pair);
        }
        coloring
    }
}

/// Set equality: the sizes match and every pair of one coloring occurs in the
/// other. Because each vertex is colored at most once, checking one direction
/// suffices when the sizes agree.
impl PartialEq for Coloring {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.pairs.iter().all(|p| other.contains(p))
    }
}
impl Eq for Coloring {}

/// The hash is the wrapping sum of the per-pair hashes, a commutative
/// combination, so that the insertion order of the pairs cannot influence it.
impl Hash for Coloring {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut acc = 0u64;
        for pair in &self.pairs {
            acc = acc.wrapping_add(pair.raw_hash());
        }
        state.write_u64(acc);
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################
