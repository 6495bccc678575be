// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Pluggable scoring. The BM25 formula itself is an external collaborator
//! — this crate bundles the Lucene-compatible default and defines the
//! shape every `Similarity` must have.

/// `(term_freqs, doc_freqs, doc_lens, avg_doc_len, num_docs) -> scores`,
/// one score per document. A pure function: no side effects, no access to
/// anything but its arguments.
pub trait Similarity {
    fn score(
        &self,
        term_freqs: &[f64],
        doc_freqs: &[f64],
        doc_lens: &[f64],
        avg_doc_len: f64,
        num_docs: u64,
    ) -> Vec<f64>;
}

impl<F> Similarity for F
where
    F: Fn(&[f64], &[f64], &[f64], f64, u64) -> Vec<f64>,
{
    fn score(
        &self,
        term_freqs: &[f64],
        doc_freqs: &[f64],
        doc_lens: &[f64],
        avg_doc_len: f64,
        num_docs: u64,
    ) -> Vec<f64> {
        self(term_freqs, doc_freqs, doc_lens, avg_doc_len, num_docs)
    }
}

/// Lucene-compatible BM25 (`k1=1.2`, `b=0.75` by default).
#[derive(Debug, Clone, Copy)]
pub struct Bm25 {
    pub k1: f64,
    pub b: f64,
}

impl Default for Bm25 {
    fn default() -> Self {
        Self { k1: 1.2, b: 0.75 }
    }
}

impl Similarity for Bm25 {
    fn score(
        &self,
        term_freqs: &[f64],
        doc_freqs: &[f64],
        doc_lens: &[f64],
        avg_doc_len: f64,
        num_docs: u64,
    ) -> Vec<f64> {
        let n = num_docs as f64;
        term_freqs
            .iter()
            .zip(doc_freqs)
            .zip(doc_lens)
            .map(|((&tf, &df), &dl)| {
                if tf == 0.0 {
                    return 0.0;
                }
                let idf = (1.0 + (n - df + 0.5) / (df + 0.5)).ln();
                let norm = 1.0 - self.b + self.b * dl / avg_doc_len;
                let tf_component = tf / (tf + self.k1 * norm);
                idf * tf_component
            })
            .collect()
    }
}

/// The bundled default: [`Bm25::default`].
pub fn default_bm25() -> Bm25 {
    Bm25::default()
}
