// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The column façade: the thing a host tabular column embeds. Wraps an
//! immutable, shared [`IndexCore`] behind an `Rc` plus a per-column row
//! selection, so `slice`/`copy`/`take` are cheap and share the same
//! underlying index.
//!
//! `TermMissing` is recovered here (per [`crate::error::Error`]'s own
//! doc comment) rather than at the positional index: every query method
//! below catches it and substitutes the all-zero/all-false result a
//! caller would expect for a term that simply never occurred.

use std::collections::HashMap;
use std::rc::Rc;

use tracing::warn;

use crate::builder::BuildConfig;
use crate::error::{Error, Result};
use crate::positional_index::{PositionalIndex, PositionalIndexBuilder};
use crate::roaringish::RoaringishEncoder;
use crate::similarity::Similarity;
use crate::sparse_set::{SparseSetBuilder, SparseSetMatrix};
use crate::term_dict::TermDict;
use crate::tokenizer::Tokenizer;

/// One input cell, in whatever form the host already has it in. The
/// builder pattern-matches this once at the entry point instead of the
/// source's habit of treating a cell as "whichever shape its last write
/// left it in".
#[derive(Debug, Clone)]
pub enum Doc {
    /// Untokenized text; run through the column's tokenizer.
    Raw(String),
    /// Already tokenized, with or without per-term positions. When
    /// positions are absent they are synthesized as `0..count` — enough
    /// to support term/doc frequency, not phrase queries.
    Tokenized {
        term_counts: HashMap<String, u32>,
        positions: Option<HashMap<String, Vec<u32>>>,
    },
    /// Already resolved to dictionary term-ids. Only valid for ids an
    /// earlier `Raw`/`Tokenized` document in the same batch already
    /// registered — the dictionary is built fresh per [`Column::from_docs`]
    /// call, so nothing can reference an id before it exists.
    Encoded {
        positions: HashMap<u32, Vec<u32>>,
    },
}

/// The shared, immutable state behind every [`Column`] view.
#[derive(Debug)]
struct IndexCore {
    term_dict: TermDict,
    positional_index: PositionalIndex,
    term_doc: SparseSetMatrix,
    doc_lengths: Vec<u32>,
    avg_doc_len: f64,
}

/// A query token: either a single term or a phrase (itself matched at
/// `slop=1`), mirroring the source's `str | list[str]` token argument.
#[derive(Debug, Clone, Copy)]
pub enum QueryTerm<'a> {
    Term(&'a str),
    Phrase(&'a [&'a str]),
}

#[derive(Debug)]
pub struct Column {
    core: Rc<IndexCore>,
    /// Logical row `i` maps to underlying document id `rows[i]`.
    rows: Vec<u32>,
}

impl Column {
    /// Build a column from a finite sequence of documents, consumed
    /// eagerly and once (no lazy re-tokenization later).
    pub fn from_docs<T: Tokenizer>(docs: &[Doc], tokenizer: &T, config: &BuildConfig) -> Result<Self> {
        let encoder = RoaringishEncoder::new(config.key_bits);
        let max_len = config.max_doc_len.unwrap_or(encoder.max_position());

        let mut term_dict = TermDict::new();
        let mut index_builder = PositionalIndexBuilder::new(encoder);
        let mut term_doc_builder = SparseSetBuilder::new();
        let mut doc_lengths = Vec::with_capacity(docs.len());

        for (i, doc) in docs.iter().enumerate() {
            let doc_id = i as u32;
            index_builder.ensure_capacity(doc_id);

            let mut per_term_positions: HashMap<u32, Vec<u32>> = HashMap::new();
            match doc {
                Doc::Raw(text) => {
                    for (posn, token) in tokenizer.tokenize(text).iter().enumerate() {
                        let term_id = term_dict.add_term(token);
                        per_term_positions.entry(term_id).or_default().push(posn as u32);
                    }
                }
                Doc::Tokenized { term_counts, positions } => {
                    for (term, &count) in term_counts {
                        let term_id = term_dict.add_term(term);
                        let posns = positions
                            .as_ref()
                            .and_then(|p| p.get(term))
                            .cloned()
                            .unwrap_or_else(|| (0..count).collect());
                        per_term_positions.entry(term_id).or_default().extend(posns);
                    }
                }
                Doc::Encoded { positions } => {
                    for (&term_id, posns) in positions {
                        if term_dict.get_term(term_id).is_err() {
                            return Err(Error::IndexError {
                                index: term_id as usize,
                                len: term_dict.len(),
                            });
                        }
                        per_term_positions.entry(term_id).or_default().extend(posns.iter().copied());
                    }
                }
            }

            let doc_len = per_term_positions
                .values()
                .flat_map(|v| v.iter().max())
                .max()
                .map_or(0, |&m| m + 1);
            if doc_len as u64 > max_len {
                return Err(Error::DocTooLong {
                    doc_id,
                    len: doc_len as u64,
                    max: max_len,
                });
            }
            doc_lengths.push(doc_len);

            let mut doc_term_ids = Vec::with_capacity(per_term_positions.len());
            for (term_id, mut positions) in per_term_positions {
                positions.sort_unstable();
                positions.dedup();
                doc_term_ids.push(term_id);
                index_builder.add_posns(doc_id, term_id, &positions);
            }
            term_doc_builder.append(&doc_term_ids);
        }

        let avg_doc_len = if doc_lengths.is_empty() {
            0.0
        } else {
            doc_lengths.iter().map(|&l| l as f64).sum::<f64>() / doc_lengths.len() as f64
        };

        let core = IndexCore {
            term_dict,
            positional_index: index_builder.build()?,
            term_doc: term_doc_builder.build(),
            doc_lengths,
            avg_doc_len,
        };
        let rows = (0..core.term_doc.num_rows() as u32).collect();
        Ok(Self { core: Rc::new(core), rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Shallow copy: new row selection, same shared index.
    pub fn copy(&self) -> Self {
        Self {
            core: Rc::clone(&self.core),
            rows: self.rows.clone(),
        }
    }

    /// Narrow to a subset of the *currently visible* rows, by logical
    /// index, sharing the same underlying index.
    pub fn slice(&self, logical_indices: &[usize]) -> Self {
        Self {
            core: Rc::clone(&self.core),
            rows: logical_indices.iter().map(|&i| self.rows[i]).collect(),
        }
    }

    /// `take` with fill: `None` entries in `indices` produce a row of
    /// all-zero term ids (the host maps this back to its own null
    /// representation).
    pub fn take(&self, indices: &[Option<usize>]) -> Self {
        let rows = indices
            .iter()
            .map(|&idx| idx.map(|i| self.rows[i]).unwrap_or(u32::MAX))
            .collect();
        Self {
            core: Rc::clone(&self.core),
            rows,
        }
    }

    /// Merge two columns that share a compatible term dictionary into a
    /// fresh index covering both document ranges.
    pub fn concat(columns: &[&Column]) -> Result<Self> {
        let Some((first, rest)) = columns.split_first() else {
            return Err(Error::ValueError {
                message: "concat requires at least one column".to_string(),
            });
        };
        for other in rest {
            if !first.core.term_dict.compatible(&other.core.term_dict) {
                return Err(Error::ValueError {
                    message: "incompatible term dictionaries".to_string(),
                });
            }
        }

        let mut term_dict = first.core.term_dict.copy();
        let mut positional_index = first.core.positional_index.clone();
        let mut term_doc_builder = SparseSetBuilder::new();
        let mut doc_lengths = Vec::new();
        let mut offset = 0u32;

        for column in columns {
            for &row in &column.rows {
                term_doc_builder.append(column.core.term_doc.row(row as usize)?);
                doc_lengths.push(column.core.doc_lengths[row as usize]);
            }
            if !std::ptr::eq(Rc::as_ptr(&column.core), Rc::as_ptr(&first.core)) {
                positional_index = positional_index.merge(&column.core.positional_index);
                for (id, term) in column.core.term_dict.iter() {
                    if term_dict.get_term_id(term).is_err() {
                        term_dict.add_term(term);
                    }
                    let _ = id;
                }
            }
            offset += column.rows.len() as u32;
        }
        let _ = offset;

        let avg_doc_len = doc_lengths.iter().map(|&l| l as f64).sum::<f64>() / doc_lengths.len().max(1) as f64;
        let core = IndexCore {
            term_dict,
            positional_index,
            term_doc: term_doc_builder.build(),
            doc_lengths,
            avg_doc_len,
        };
        let rows = (0..core.term_doc.num_rows() as u32).collect();
        Ok(Self { core: Rc::new(core), rows })
    }

    /// A row is NA when it came from an unfilled `take` slot or when its
    /// document tokenized to zero length — "an empty document compares
    /// equal to NA".
    pub fn is_na(&self, logical: usize) -> bool {
        let doc_id = self.rows[logical];
        doc_id == u32::MAX || self.core.doc_lengths.get(doc_id as usize).copied().unwrap_or(0) == 0
    }

    /// Elementwise equality against another column: same term-doc row
    /// contents and same document length, only when the two term
    /// dictionaries agree on every id both define. Mismatched lengths are
    /// a caller error, not a per-row `false`.
    pub fn eq_column(&self, other: &Column) -> Result<Vec<bool>> {
        if self.rows.len() != other.rows.len() {
            return Err(Error::ValueError {
                message: "columns have different lengths".to_string(),
            });
        }
        if !self.core.term_dict.compatible(&other.core.term_dict) {
            return Ok(vec![false; self.rows.len()]);
        }
        let self_lens = self.doc_lengths();
        let other_lens = other.doc_lengths();
        let mut out = Vec::with_capacity(self.rows.len());
        for i in 0..self.rows.len() {
            let rows_eq = match (self.rows[i], other.rows[i]) {
                (u32::MAX, u32::MAX) => true,
                (u32::MAX, _) | (_, u32::MAX) => false,
                (a, b) => {
                    let ra = self.core.term_doc.row(a as usize).ok().unwrap_or(&[]);
                    let rb = other.core.term_doc.row(b as usize).ok().unwrap_or(&[]);
                    ra == rb
                }
            };
            out.push(rows_eq && self_lens[i] == other_lens[i]);
        }
        Ok(out)
    }

    fn doc_id_to_logical(&self) -> HashMap<u32, Vec<usize>> {
        let mut map: HashMap<u32, Vec<usize>> = HashMap::new();
        for (logical, &doc_id) in self.rows.iter().enumerate() {
            map.entry(doc_id).or_default().push(logical);
        }
        map
    }

    pub fn doc_lengths(&self) -> Vec<u32> {
        self.rows
            .iter()
            .map(|&r| self.core.doc_lengths.get(r as usize).copied().unwrap_or(0))
            .collect()
    }

    pub fn avg_doc_len(&self) -> f64 {
        self.core.avg_doc_len
    }

    /// Term frequency per (visible) row. A term never seen by the
    /// dictionary recovers to all-zeros.
    pub fn term_freq(&self, token: &str) -> Vec<u32> {
        self.term_freqs_bounded(token, None, None)
    }

    /// [`Self::term_freq`] restricted to `[min_posn, max_posn]`.
    pub fn term_freqs_bounded(&self, token: &str, min_posn: Option<u64>, max_posn: Option<u64>) -> Vec<u32> {
        let mut out = vec![0u32; self.rows.len()];
        let Ok(term_id) = self.core.term_dict.get_term_id(token) else {
            return out;
        };
        let by_doc = self.core.positional_index.termfreqs_bounded(term_id, None, min_posn, max_posn);
        let doc_to_logical = self.doc_id_to_logical();
        for (doc_id, count) in by_doc {
            if let Some(logicals) = doc_to_logical.get(&doc_id) {
                for &logical in logicals {
                    out[logical] = count;
                }
            }
        }
        out
    }

    pub fn doc_freq(&self, token: &str) -> u32 {
        self.term_freq(token).iter().filter(|&&tf| tf > 0).count() as u32
    }

    pub fn positions(&self, token: &str) -> Result<Vec<Vec<u32>>> {
        let term_id = self.core.term_dict.get_term_id(token)?;
        Ok(self
            .rows
            .iter()
            .map(|&doc_id| {
                if doc_id == u32::MAX {
                    Vec::new()
                } else {
                    self.core.positional_index.positions_for_doc(term_id, doc_id)
                }
            })
            .collect())
    }

    pub fn match_term(&self, token: &str) -> Vec<bool> {
        self.term_freq(token).iter().map(|&tf| tf > 0).collect()
    }

    pub fn match_phrase(&self, tokens: &[&str], slop: u32) -> Vec<bool> {
        self.phrase_freq(tokens, slop)
            .iter()
            .map(|&f| f > 0)
            .collect()
    }

    pub fn match_query(&self, term: QueryTerm<'_>) -> Vec<bool> {
        match term {
            QueryTerm::Term(t) => self.match_term(t),
            QueryTerm::Phrase(ts) => self.match_phrase(ts, 1),
        }
    }

    pub fn and_query(&self, terms: &[QueryTerm<'_>]) -> Vec<bool> {
        let mut mask = vec![true; self.rows.len()];
        for term in terms {
            let m = self.match_query(*term);
            for (a, b) in mask.iter_mut().zip(m) {
                *a &= b;
            }
        }
        mask
    }

    pub fn or_query(&self, terms: &[QueryTerm<'_>], min_should_match: u32) -> Vec<bool> {
        let mut counts = vec![0u32; self.rows.len()];
        for term in terms {
            for (c, m) in counts.iter_mut().zip(self.match_query(*term)) {
                *c += m as u32;
            }
        }
        counts.into_iter().map(|c| c >= min_should_match).collect()
    }

    pub fn score(&self, token: &str, similarity: &impl Similarity) -> Vec<f64> {
        let tf: Vec<f64> = self.term_freq(token).into_iter().map(f64::from).collect();
        let df = self.doc_freq(token) as f64;
        let doc_lens: Vec<f64> = self.doc_lengths().into_iter().map(f64::from).collect();
        similarity.score(&tf, &vec![df; tf.len()], &doc_lens, self.core.avg_doc_len, self.rows.len() as u64)
    }

    pub fn score_phrase(&self, tokens: &[&str], slop: u32, similarity: &impl Similarity) -> Vec<f64> {
        let tf: Vec<f64> = self.phrase_freq(tokens, slop).into_iter().map(f64::from).collect();
        let df = tf.iter().filter(|&&f| f > 0.0).count() as f64;
        let doc_lens: Vec<f64> = self.doc_lengths().into_iter().map(f64::from).collect();
        similarity.score(&tf, &vec![df; tf.len()], &doc_lens, self.core.avg_doc_len, self.rows.len() as u64)
    }

    /// Phrase frequency per visible row. Dispatches to the bit-trick
    /// path for `slop=1` with distinct terms, otherwise the
    /// matrix-of-differences fallback escalating to scan-merge.
    pub fn phrase_freq(&self, tokens: &[&str], slop: u32) -> Vec<u32> {
        let mut out = vec![0u32; self.rows.len()];
        let term_ids: Vec<u32> = match tokens.iter().map(|t| self.core.term_dict.get_term_id(t)).collect() {
            Ok(ids) => ids,
            Err(_) => return out,
        };
        let distinct = {
            let mut sorted = term_ids.clone();
            sorted.sort_unstable();
            sorted.dedup();
            sorted.len() == term_ids.len()
        };

        let doc_to_logical = self.doc_id_to_logical();
        if slop == 1 && distinct {
            for (doc_id, count) in self.core.positional_index.phrase_freq_bit_trick(&term_ids) {
                if let Some(logicals) = doc_to_logical.get(&doc_id) {
                    for &logical in logicals {
                        out[logical] = count;
                    }
                }
            }
            return out;
        }

        let candidate_terms: Vec<QueryTerm<'_>> = tokens.iter().map(|&t| QueryTerm::Term(t)).collect();
        let mask = self.and_query(&candidate_terms);
        let mut candidate_docs: Vec<u32> = mask
            .iter()
            .zip(&self.rows)
            .filter(|&(&m, _)| m)
            .map(|(_, &doc)| doc)
            .collect();
        candidate_docs.sort_unstable();
        candidate_docs.dedup();
        if candidate_docs.is_empty() {
            return out;
        }

        let (matrix_counts, skipped) = self
            .core
            .positional_index
            .phrase_freq_matrix_diff(&term_ids, slop, &candidate_docs);
        for (doc_id, count) in matrix_counts {
            if let Some(logicals) = doc_to_logical.get(&doc_id) {
                for &logical in logicals {
                    out[logical] = count;
                }
            }
        }
        if !skipped.is_empty() {
            warn!(num_docs = skipped.len(), "falling back to scan-merge for long documents");
            let scan_counts = self.core.positional_index.phrase_freq_scan_merge(&term_ids, slop, &skipped);
            for (doc_id, count) in scan_counts {
                if let Some(logicals) = doc_to_logical.get(&doc_id) {
                    for &logical in logicals {
                        out[logical] = count;
                    }
                }
            }
        }
        out
    }

    pub fn nbytes(&self) -> usize {
        self.rows.len() * std::mem::size_of::<u32>()
    }
}
