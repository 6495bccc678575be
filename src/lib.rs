// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Columnar positional full-text search index: a roaringish bit-packed
//! encoding underneath a term dictionary, a term-doc sparse set, and a
//! row-viewable matrix, exposed through one column façade.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌────────────────┐   ┌───────────────┐
//! │ tokenizer.rs │──▶│  builder.rs    │──▶│  column.rs    │
//! │ (Tokenizer)  │   │ (build_index)  │   │ (Column)      │
//! └──────────────┘   └────────────────┘   └───────────────┘
//!                           │                     │
//!              ┌────────────┼─────────────┐       │
//!              ▼            ▼             ▼       ▼
//!     ┌────────────┐ ┌─────────────┐ ┌──────────┐ │
//!     │ term_dict  │ │ positional_ │ │ sparse_  │ │
//!     │ .rs        │ │ index.rs    │ │ set.rs   │ │
//!     └────────────┘ └──────┬──────┘ └────┬─────┘ │
//!                           ▼             ▼        │
//!                    ┌────────────┐ ┌───────────┐  │
//!                    │ roaringish/│ │ row_view.rs│◀─┘
//!                    │ (mod,      │ └───────────┘
//!                    │ accessors) │
//!                    └────────────┘
//!              similarity.rs (pluggable BM25) plugs into column.rs
//! ```
//!
//! # Usage
//!
//! ```
//! use roaringish_column::{BuildConfig, Bm25, Column, Doc, WhitespaceTokenizer};
//!
//! let docs = [
//!     Doc::Raw("quick brown fox".to_string()),
//!     Doc::Raw("the quick fox jumps".to_string()),
//! ];
//! let column = Column::from_docs(&docs, &WhitespaceTokenizer, &BuildConfig::default()).unwrap();
//! assert_eq!(column.term_freq("quick"), vec![1, 1]);
//! assert_eq!(column.phrase_freq(&["quick", "fox"], 2), vec![1, 0]);
//! assert!(column.score("fox", &Bm25::default())[0] > 0.0);
//! ```

pub mod builder;
pub mod column;
pub mod contracts;
pub mod error;
pub mod positional_index;
pub mod primitives;
pub mod roaringish;
pub mod similarity;
pub mod sparse_set;
pub mod term_dict;
pub mod tokenizer;

mod row_view;

pub use builder::{build_index, BuildConfig, BuiltIndex};
pub use column::{Column, Doc, QueryTerm};
pub use error::{Error, Result};
pub use positional_index::{PositionalIndex, PositionalIndexBuilder};
pub use roaringish::{RoaringishEncoder, DEFAULT_KEY_BITS};
pub use row_view::RowViewableMatrix;
pub use similarity::{default_bm25, Bm25, Similarity};
pub use sparse_set::{SparseSetBuilder, SparseSetMatrix};
pub use term_dict::TermDict;
pub use tokenizer::{Tokenizer, WhitespaceTokenizer};
