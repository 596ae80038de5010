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

//! This module provides the canonicalization of (vertex, color) pairs. The
//! inner loops of the transitions repeatedly ask "does this coloring contain
//! (v, c) ?"; interning the pairs collapses those structural comparisons into
//! pointer identity checks.

use std::sync::Arc;

use dashmap::DashMap;
use fxhash::FxBuildHasher;

use crate::{Color, Vertex};

/// The canonical representative of a (vertex, color) assignment. Instances
/// are only ever created by the interner, hence two pairs carrying the same
/// vertex and color share one allocation and can be compared by identity
/// (`Arc::ptr_eq`).
#[derive(Debug)]
pub struct ColorPair {
    vertex: Vertex,
    color: Color,
    /// The pair's contribution to the commutative hash of a coloring,
    /// computed once at interning time.
    hash: u64,
}

impl ColorPair {
    fn new(vertex: Vertex, color: Color) -> Self {
        let hash = fxhash::hash64(&(vertex.id(), color as u8));
        ColorPair { vertex, color, hash }
    }

    /// The vertex this pair colors.
    #[inline]
    pub fn vertex(&self) -> Vertex {
        self.vertex
    }

    /// The color assigned to the vertex.
    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    /// The precomputed hash contribution of this pair.
    #[inline]
    pub fn raw_hash(&self) -> u64 {
        self.hash
    }
}

/// The color-pair interner. The first `intern` call for a pair allocates its
/// canonical instance; every subsequent call hands the same instance back.
/// Insertion is safe under concurrency, so a driver processing sibling
/// subtrees in parallel can share one interner by reference.
#[derive(Debug, Default)]
pub struct ColorPairInterner {
    pairs: DashMap<(Vertex, Color), Arc<ColorPair>, FxBuildHasher>,
}

impl ColorPairInterner {
    /// Creates an empty interner. Its memory stays bounded by three pairs per
    /// vertex of the decomposed graph and lives for the whole solve.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the canonical instance for (vertex, color).
    pub fn intern(&self, vertex: Vertex, color: Color) -> Arc<ColorPair> {
        self.pairs
            .entry((vertex, color))
            .or_insert_with(|| Arc::new(ColorPair::new(vertex, color)))
            .value()
            .clone()
    }

    /// The number of distinct pairs interned so far.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// True iff no pair was interned yet.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################
