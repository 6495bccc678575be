// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Error type for the index core.
//!
//! No error is retried inside this crate and nothing here writes diagnostics;
//! callers decide how to log or surface a failure. `TermMissing` is special:
//! callers working through [`crate::column::Column`] never observe it directly
//! because the façade recovers it to an all-zeros/all-false result.

use std::fmt;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure modes surfaced by the index core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Query-side lookup of a term never seen by the dictionary.
    TermMissing { term: String },
    /// A position exceeds the encoder's representable payload width.
    PositionOverflow { position: u64, max: u64 },
    /// A document's token count exceeds `MAX_POSITION`.
    DocTooLong { doc_id: u32, len: u64, max: u64 },
    /// A non-string input where a string was required, or a non-sequence
    /// where a sequence was required.
    TypeError { message: String },
    /// Out-of-bounds element access.
    IndexError { index: usize, len: usize },
    /// Malformed positions (not strictly ascending), mismatched array
    /// widths, or a scalar assigned to a multi-element slot.
    ValueError { message: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::TermMissing { term } => write!(f, "term not found in dictionary: {term:?}"),
            Error::PositionOverflow { position, max } => {
                write!(f, "position {position} exceeds encoder capacity {max}")
            }
            Error::DocTooLong { doc_id, len, max } => {
                write!(f, "doc {doc_id} has length {len} > MAX_POSITION {max}")
            }
            Error::TypeError { message } => write!(f, "type error: {message}"),
            Error::IndexError { index, len } => {
                write!(f, "index {index} out of bounds for length {len}")
            }
            Error::ValueError { message } => write!(f, "value error: {message}"),
        }
    }
}

impl std::error::Error for Error {}
