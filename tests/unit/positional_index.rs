//! Positional index built directly (bypassing the column façade) to pin
//! down `termfreqs`/`phrase_freq_*` behavior in isolation.

use roaringish_column::{PositionalIndexBuilder, RoaringishEncoder};

fn build(rows: &[(u32, u32, &[u32])]) -> roaringish_column::PositionalIndex {
    let mut builder = PositionalIndexBuilder::new(RoaringishEncoder::default());
    for &(doc_id, term_id, positions) in rows {
        builder.ensure_capacity(doc_id);
        builder.add_posns(doc_id, term_id, positions);
    }
    builder.build().unwrap()
}

#[test]
fn termfreqs_counts_set_lsb_bits_per_document() {
    const FOO: u32 = 0;
    let index = build(&[(0, FOO, &[0, 1, 2]), (1, FOO, &[5])]);
    let mut freqs = index.termfreqs(FOO, None);
    freqs.sort_unstable();
    assert_eq!(freqs, vec![(0, 3), (1, 1)]);
}

#[test]
fn termfreqs_with_doc_filter_reports_zero_for_absent_docs() {
    const FOO: u32 = 0;
    let index = build(&[(0, FOO, &[0])]);
    let freqs = index.termfreqs(FOO, Some(&[0, 1]));
    assert_eq!(freqs, vec![(0, 1), (1, 0)]);
}

#[test]
fn phrase_freq_bit_trick_matches_adjacent_terms_in_order() {
    const FOO: u32 = 0;
    const BAR: u32 = 1;
    let index = build(&[(0, FOO, &[0, 10]), (0, BAR, &[1, 20])]);
    assert_eq!(index.phrase_freq_bit_trick(&[FOO, BAR]), vec![(0, 1)]);
    assert_eq!(index.phrase_freq_bit_trick(&[BAR, FOO]), vec![]);
}

#[test]
fn phrase_longer_than_doc_has_zero_phrase_freq() {
    const FOO: u32 = 0;
    const BAR: u32 = 1;
    let index = build(&[(0, FOO, &[0])]);
    assert_eq!(index.phrase_freq_bit_trick(&[FOO, BAR]), vec![]);
}
