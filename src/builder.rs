// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Turns raw document text into the three structures a [`crate::column::Column`]
//! is built from: a [`TermDict`], a [`PositionalIndex`], and a term-doc
//! [`SparseSetMatrix`].

use std::collections::HashMap;

use tracing::debug;

use crate::contracts;
use crate::error::{Error, Result};
use crate::positional_index::{PositionalIndex, PositionalIndexBuilder};
use crate::roaringish::{RoaringishEncoder, DEFAULT_KEY_BITS};
use crate::sparse_set::{SparseSetBuilder, SparseSetMatrix};
use crate::term_dict::TermDict;
use crate::tokenizer::Tokenizer;

/// How often a progress line is emitted while building a large batch.
const PROGRESS_STRIDE: usize = 10_000;

#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Key width passed to the roaringish encoder; defaults to
    /// [`DEFAULT_KEY_BITS`].
    pub key_bits: u32,
    /// Reject any document whose token count exceeds this. `None` means
    /// only the encoder's own `MAX_POSITION` bound applies.
    pub max_doc_len: Option<u64>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            key_bits: DEFAULT_KEY_BITS,
            max_doc_len: None,
        }
    }
}

/// The three structures produced from one build pass, plus per-document
/// token counts (`doc_lengths`) the column façade needs for BM25.
#[derive(Debug, Clone)]
pub struct BuiltIndex {
    pub term_dict: TermDict,
    pub positional_index: PositionalIndex,
    pub term_doc: SparseSetMatrix,
    pub doc_lengths: Vec<u32>,
}

/// Tokenize and encode `docs` (in order — their index becomes their doc
/// id) into a [`BuiltIndex`].
pub fn build_index<T: Tokenizer>(
    docs: &[&str],
    tokenizer: &T,
    config: &BuildConfig,
) -> Result<BuiltIndex> {
    let encoder = RoaringishEncoder::new(config.key_bits);
    let max_len = config.max_doc_len.unwrap_or(encoder.max_position());

    let mut term_dict = TermDict::new();
    let mut index_builder = PositionalIndexBuilder::new(encoder);
    let mut term_doc_builder = SparseSetBuilder::new();
    let mut doc_lengths = Vec::with_capacity(docs.len());

    debug!(num_docs = docs.len(), "building index");

    for (i, text) in docs.iter().enumerate() {
        let doc_id = i as u32;
        let tokens = tokenizer.tokenize(text);
        if tokens.len() as u64 > max_len {
            return Err(Error::DocTooLong {
                doc_id,
                len: tokens.len() as u64,
                max: max_len,
            });
        }

        index_builder.ensure_capacity(doc_id);
        doc_lengths.push(tokens.len() as u32);

        let mut per_term_positions: HashMap<u32, Vec<u32>> = HashMap::new();
        let mut doc_term_ids = Vec::with_capacity(tokens.len());
        for (posn, token) in tokens.iter().enumerate() {
            let term_id = term_dict.add_term(token);
            doc_term_ids.push(term_id);
            per_term_positions.entry(term_id).or_default().push(posn as u32);
        }
        for (term_id, positions) in per_term_positions {
            contracts::check_strictly_ascending(&positions);
            index_builder.add_posns(doc_id, term_id, &positions);
        }
        term_doc_builder.append(&doc_term_ids);

        if doc_id > 0 && doc_id as usize % PROGRESS_STRIDE == 0 {
            debug!(doc_id, "indexing progress");
        }
    }

    let positional_index = index_builder.build()?;
    let term_doc = term_doc_builder.build();
    debug!(
        num_terms = term_dict.len(),
        num_docs = doc_lengths.len(),
        "index built"
    );

    Ok(BuiltIndex {
        term_dict,
        positional_index,
        term_doc,
        doc_lengths,
    })
}
