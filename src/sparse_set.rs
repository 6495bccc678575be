// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Term-doc sparse set: for each document, the set of term-ids it
//! contains (no counts, no positions). Built append-only one document at
//! a time, then frozen into compressed-sparse-row form.

use crate::error::{Error, Result};

/// Append-only builder for a [`SparseSetMatrix`].
#[derive(Debug, Clone, Default)]
pub struct SparseSetBuilder {
    indptr: Vec<u32>,
    cols: Vec<u32>,
}

impl SparseSetBuilder {
    pub fn new() -> Self {
        Self {
            indptr: vec![0],
            cols: Vec::new(),
        }
    }

    /// Accept a possibly unsorted, possibly duplicated list of term-ids
    /// and store its sorted-unique set as a new row.
    pub fn append(&mut self, term_ids: &[u32]) {
        let mut row: Vec<u32> = term_ids.to_vec();
        row.sort_unstable();
        row.dedup();
        self.cols.extend_from_slice(&row);
        self.indptr.push(self.cols.len() as u32);
    }

    pub fn build(self) -> SparseSetMatrix {
        SparseSetMatrix {
            indptr: self.indptr,
            cols: self.cols,
        }
    }
}

/// Frozen `(indptr, cols)` CSR-style set-of-sets.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SparseSetMatrix {
    indptr: Vec<u32>,
    cols: Vec<u32>,
}

impl SparseSetMatrix {
    pub fn num_rows(&self) -> usize {
        self.indptr.len().saturating_sub(1)
    }

    /// The sorted set of term-ids appearing in row `i`.
    pub fn row(&self, i: usize) -> Result<&[u32]> {
        if i + 1 >= self.indptr.len() {
            return Err(Error::IndexError {
                index: i,
                len: self.num_rows(),
            });
        }
        let start = self.indptr[i] as usize;
        let end = self.indptr[i + 1] as usize;
        Ok(&self.cols[start..end])
    }

    pub fn row_eq(&self, i: usize, j: usize) -> Result<bool> {
        Ok(self.row(i)? == self.row(j)?)
    }

    /// Per-row set cardinality (not term frequency — that comes from the
    /// positional index).
    pub fn sum_axis1(&self) -> Vec<u32> {
        (0..self.num_rows())
            .map(|i| self.row(i).map(<[u32]>::len).unwrap_or(0) as u32)
            .collect()
    }

    pub fn nbytes(&self) -> usize {
        (self.indptr.len() + self.cols.len()) * std::mem::size_of::<u32>()
    }
}
