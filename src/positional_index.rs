// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Positional index: `term-id -> encoded posting list`, plus the
//! phrase-frequency algorithms that operate on it.
//!
//! Three phrase-matching strategies live here, in increasing order of
//! generality and decreasing order of speed:
//!
//! 1. [`PositionalIndex::phrase_freq_bit_trick`] — slop = 1, all terms
//!    distinct. Pure bit-arithmetic over the roaringish encoding.
//! 2. [`PositionalIndex::phrase_freq_matrix_diff`] — any slop, repeated
//!    terms allowed, for documents whose per-term position count is
//!    within [`MATRIX_DIFF_WIDTH`].
//! 3. [`PositionalIndex::phrase_freq_scan_merge`] — the same contract as
//!    (2) with no width limit, for documents the matrix path would rather
//!    not touch.
//!
//! (2) and (3) share one core recipe ([`phrase_count_single_doc`]); the
//! "matrix" and "scan-merge" names describe the batching strategy a
//! numpy-based implementation would pick, not a difference in results —
//! this crate computes one document at a time either way, so both paths
//! must and do agree.

use std::collections::HashMap;

use crate::error::Result;
use crate::roaringish::{accessors, RoaringishEncoder};

/// Width beyond which [`PositionalIndex::phrase_freq_matrix_diff`] defers
/// to [`PositionalIndex::phrase_freq_scan_merge`] for a document.
pub const MATRIX_DIFF_WIDTH: usize = 40;

#[derive(Debug, Clone)]
pub struct PositionalIndex {
    encoder: RoaringishEncoder,
    postings: HashMap<u32, Vec<u64>>,
    max_key: u64,
}

impl PositionalIndex {
    pub fn encoder(&self) -> &RoaringishEncoder {
        &self.encoder
    }

    pub fn max_key(&self) -> u64 {
        self.max_key
    }

    fn posting(&self, term_id: u32) -> &[u64] {
        self.postings.get(&term_id).map_or(&[], Vec::as_slice)
    }

    /// Term frequency per document: the number of set LSB bits across a
    /// term's encoded rows for that document. When `doc_ids` is given
    /// (sorted), only those documents are considered and absent ones
    /// contribute zero; otherwise every document with at least one
    /// occurrence is returned.
    pub fn termfreqs(&self, term_id: u32, doc_ids: Option<&[u32]>) -> Vec<(u32, u32)> {
        let encoded = self.posting(term_id);
        let encoded = match doc_ids {
            Some(ids) => {
                let keys: Vec<u64> = ids.iter().map(|&d| d as u64).collect();
                self.encoder.slice(encoded, &keys)
            }
            None => encoded.to_vec(),
        };
        group_popcount_by_key(&self.encoder, &encoded)
    }

    /// Like [`Self::termfreqs`] but restricted to `[min_posn, max_posn]`.
    pub fn termfreqs_bounded(
        &self,
        term_id: u32,
        doc_ids: Option<&[u32]>,
        min_posn: Option<u64>,
        max_posn: Option<u64>,
    ) -> Vec<(u32, u32)> {
        let encoded = self.posting(term_id);
        let encoded = match doc_ids {
            Some(ids) => {
                let keys: Vec<u64> = ids.iter().map(|&d| d as u64).collect();
                self.encoder.slice(encoded, &keys)
            }
            None => encoded.to_vec(),
        };
        let encoded = self.encoder.restrict_positions(&encoded, min_posn, max_posn);
        group_popcount_by_key(&self.encoder, &encoded)
    }

    /// Decoded, ascending positions for one document.
    pub fn positions_for_doc(&self, term_id: u32, doc_id: u32) -> Vec<u32> {
        let encoded = self.posting(term_id);
        let sliced = self.encoder.slice(encoded, &[doc_id as u64]);
        self.encoder
            .decode_positions_only(&sliced)
            .into_iter()
            .map(|p| p as u32)
            .collect()
    }

    /// Raw encoded slice for one document.
    pub fn doc_encoded_posns(&self, term_id: u32, doc_id: u32) -> Vec<u64> {
        self.encoder.slice(self.posting(term_id), &[doc_id as u64])
    }

    /// Restrict this index to the given sorted document ids.
    pub fn slice(&self, doc_ids: &[u32]) -> Self {
        let keys: Vec<u64> = doc_ids.iter().map(|&d| d as u64).collect();
        let postings = self
            .postings
            .iter()
            .map(|(&tid, enc)| (tid, self.encoder.slice(enc, &keys)))
            .collect();
        Self {
            encoder: self.encoder,
            postings,
            max_key: doc_ids.iter().copied().max().unwrap_or(0) as u64,
        }
    }

    /// Concatenate two indexes covering disjoint document ranges. On
    /// overlapping terms their encoded arrays are sort-merged by header.
    pub fn merge(&self, other: &Self) -> Self {
        let mut postings = self.postings.clone();
        for (&tid, other_enc) in &other.postings {
            postings
                .entry(tid)
                .and_modify(|enc| *enc = merge_sorted_by_header(&self.encoder, enc, other_enc))
                .or_insert_with(|| other_enc.clone());
        }
        Self {
            encoder: self.encoder,
            postings,
            max_key: self.max_key.max(other.max_key),
        }
    }

    /// Exact phrase frequency for `slop=1`, all `term_ids` distinct. See
    /// module docs for the algorithm.
    pub fn phrase_freq_bit_trick(&self, term_ids: &[u32]) -> Vec<(u32, u32)> {
        assert!(term_ids.len() >= 2, "phrase must have at least two terms");
        let mut running: Vec<u64> = self.posting(term_ids[0]).to_vec();
        for (i, &tid) in term_ids.iter().enumerate().skip(1) {
            let rhs = self.posting(tid);
            let (lhs_m, rhs_m) = self.encoder.intersect_rshift(&running, rhs, i as u64);
            running = lhs_m
                .iter()
                .zip(rhs_m.iter())
                .filter_map(|(&l, &r)| {
                    let header = accessors::header(&self.encoder, l);
                    let bits = accessors::payload_lsb(&self.encoder, l)
                        & accessors::payload_lsb(&self.encoder, r);
                    (bits != 0).then_some(header | bits)
                })
                .collect();
        }
        group_popcount_by_key(&self.encoder, &running)
    }

    /// Matrix-of-differences fallback: any slop, repeated terms allowed.
    /// `candidate_docs` should already be the intersection of `match` for
    /// every term (callers normally get this from the column façade).
    /// Returns per-doc counts plus the subset of `candidate_docs` this
    /// path declined because a position list was too long.
    pub fn phrase_freq_matrix_diff(
        &self,
        term_ids: &[u32],
        slop: u32,
        candidate_docs: &[u32],
    ) -> (Vec<(u32, u32)>, Vec<u32>) {
        let mut counts = Vec::new();
        let mut skipped = Vec::new();
        for &doc in candidate_docs {
            let positions: Vec<Vec<u32>> = term_ids
                .iter()
                .map(|&tid| self.positions_for_doc(tid, doc))
                .collect();
            if positions.iter().any(|p| p.len() > MATRIX_DIFF_WIDTH) {
                skipped.push(doc);
                continue;
            }
            let count = phrase_count_single_doc(&positions, slop);
            if count > 0 {
                counts.push((doc, count));
            }
        }
        (counts, skipped)
    }

    /// Scan-merge fallback: walks `N` sorted position arrays in lockstep.
    /// No width limit; use for documents [`Self::phrase_freq_matrix_diff`]
    /// skipped.
    pub fn phrase_freq_scan_merge(
        &self,
        term_ids: &[u32],
        slop: u32,
        candidate_docs: &[u32],
    ) -> Vec<(u32, u32)> {
        let mut counts = Vec::new();
        for &doc in candidate_docs {
            let positions: Vec<Vec<u32>> = term_ids
                .iter()
                .map(|&tid| self.positions_for_doc(tid, doc))
                .collect();
            let count = phrase_count_single_doc(&positions, slop);
            if count > 0 {
                counts.push((doc, count));
            }
        }
        counts
    }
}

fn group_popcount_by_key(encoder: &RoaringishEncoder, encoded: &[u64]) -> Vec<(u32, u32)> {
    let mut out: Vec<(u32, u32)> = Vec::new();
    for &row in encoded {
        let key = accessors::key(encoder, row) as u32;
        let bits = accessors::payload_lsb(encoder, row).count_ones();
        if let Some(last) = out.last_mut() {
            if last.0 == key {
                last.1 += bits;
                continue;
            }
        }
        out.push((key, bits));
    }
    out
}

fn merge_sorted_by_header(encoder: &RoaringishEncoder, lhs: &[u64], rhs: &[u64]) -> Vec<u64> {
    let mut out = Vec::with_capacity(lhs.len() + rhs.len());
    let (mut i, mut j) = (0usize, 0usize);
    while i < lhs.len() && j < rhs.len() {
        let lh = accessors::header(encoder, lhs[i]);
        let rh = accessors::header(encoder, rhs[j]);
        match lh.cmp(&rh) {
            std::cmp::Ordering::Less => {
                out.push(lhs[i]);
                i += 1;
            }
            std::cmp::Ordering::Greater => {
                out.push(rhs[j]);
                j += 1;
            }
            std::cmp::Ordering::Equal => {
                let bits = accessors::payload_lsb(encoder, lhs[i])
                    | accessors::payload_lsb(encoder, rhs[j]);
                out.push(lh | bits);
                i += 1;
                j += 1;
            }
        }
    }
    out.extend_from_slice(&lhs[i..]);
    out.extend_from_slice(&rhs[j..]);
    out
}

/// The shared phrase-counting recipe: chain consecutive position arrays,
/// keeping only chains where every consecutive pair is exactly `slop`
/// apart, applying the repeated-term correction (subtract
/// `ceil(consecutive_match_runs / 2)`) whenever two consecutive terms in
/// the phrase are the same term.
fn phrase_count_single_doc(term_positions: &[Vec<u32>], slop: u32) -> u32 {
    if term_positions.iter().any(Vec::is_empty) {
        return 0;
    }
    let mut prior = term_positions[0].clone();
    let mut bigram_freq = prior.len() as u32;
    for idx in 1..term_positions.len() {
        let term = &term_positions[idx];
        let is_same_term = *term == prior;

        let satisfies_slop: Vec<bool> = prior
            .iter()
            .map(|&p| term.binary_search(&(p + slop)).is_ok())
            .collect();
        bigram_freq = satisfies_slop.iter().filter(|&&b| b).count() as u32;

        if is_same_term && bigram_freq > 0 {
            let consecutive_ones = satisfies_slop
                .windows(2)
                .filter(|w| w[0] && w[1])
                .count() as u32;
            bigram_freq -= consecutive_ones.div_ceil(2);
        }

        prior = prior
            .into_iter()
            .zip(satisfies_slop)
            .filter(|&(_, ok)| ok)
            .map(|(p, _)| p + slop)
            .collect();

        if bigram_freq == 0 {
            return 0;
        }
    }
    bigram_freq
}

/// Append-only staging area that [`PositionalIndex::build`] consumes.
#[derive(Debug, Clone, Default)]
pub struct PositionalIndexBuilder {
    encoder: RoaringishEncoder,
    staged: HashMap<u32, Vec<(u32, u32)>>, // term_id -> (doc_id, position)
    max_key: u64,
}

impl PositionalIndexBuilder {
    pub fn new(encoder: RoaringishEncoder) -> Self {
        Self {
            encoder,
            staged: HashMap::new(),
            max_key: 0,
        }
    }

    /// Append `(doc_id, positions)` for `term_id`. `positions` must be
    /// strictly ascending within this call; callers are expected to have
    /// validated this already (see [`crate::contracts`]).
    pub fn add_posns(&mut self, doc_id: u32, term_id: u32, positions: &[u32]) {
        let entry = self.staged.entry(term_id).or_default();
        entry.extend(positions.iter().map(|&p| (doc_id, p)));
        self.max_key = self.max_key.max(doc_id as u64);
    }

    pub fn ensure_capacity(&mut self, doc_id: u32) {
        self.max_key = self.max_key.max(doc_id as u64);
    }

    pub fn build(self) -> Result<PositionalIndex> {
        let mut postings = HashMap::with_capacity(self.staged.len());
        for (term_id, mut rows) in self.staged {
            rows.sort_unstable();
            let keys: Vec<u64> = rows.iter().map(|&(d, _)| d as u64).collect();
            let payload: Vec<u64> = rows.iter().map(|&(_, p)| p as u64).collect();
            let encoded = self.encoder.encode(&payload, Some(&keys))?;
            postings.insert(term_id, encoded);
        }
        Ok(PositionalIndex {
            encoder: self.encoder,
            postings,
            max_key: self.max_key,
        })
    }

    /// Accept parallel arrays already lex-sorted by `(term, doc, posn)`
    /// and encode in one pass, per-term boundaries inferred from where
    /// `terms` changes.
    pub fn from_flat(encoder: RoaringishEncoder, terms: &[u32], docs: &[u32], posns: &[u32]) -> Result<PositionalIndex> {
        assert_eq!(terms.len(), docs.len());
        assert_eq!(terms.len(), posns.len());
        let mut postings = HashMap::new();
        let mut max_key = 0u64;
        let mut start = 0usize;
        while start < terms.len() {
            let term = terms[start];
            let mut end = start;
            while end < terms.len() && terms[end] == term {
                max_key = max_key.max(docs[end] as u64);
                end += 1;
            }
            let keys: Vec<u64> = docs[start..end].iter().map(|&d| d as u64).collect();
            let payload: Vec<u64> = posns[start..end].iter().map(|&p| p as u64).collect();
            let encoded = encoder.encode(&payload, Some(&keys))?;
            postings.insert(term, encoded);
            start = end;
        }
        Ok(PositionalIndex {
            encoder,
            postings,
            max_key,
        })
    }
}
