//! Properties tying phrase frequency to its constituent bigrams, and BM25
//! monotonicity, exercised through the column façade over random corpora.

use proptest::prelude::*;
use roaringish_column::{BuildConfig, Bm25, Column, Similarity, WhitespaceTokenizer};

fn token_strategy() -> impl Strategy<Value = String> {
    prop_oneof![Just("a"), Just("b"), Just("c")].prop_map(str::to_string)
}

fn document_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(token_strategy(), 0..12).prop_map(|tokens| tokens.join(" "))
}

proptest! {
    #[test]
    fn phrase_freq_never_exceeds_either_bigram(
        docs in prop::collection::vec(document_strategy(), 1..10)
    ) {
        let doc_values: Vec<_> = docs.iter().map(|d| roaringish_column::Doc::Raw(d.clone())).collect();
        let column = Column::from_docs(&doc_values, &WhitespaceTokenizer, &BuildConfig::default()).unwrap();

        let ab = column.phrase_freq(&["a", "b"], 1);
        let bc = column.phrase_freq(&["b", "c"], 1);
        let abc = column.phrase_freq(&["a", "b", "c"], 1);

        for i in 0..column.len() {
            prop_assert!(abc[i] <= ab[i]);
            prop_assert!(abc[i] <= bc[i]);
        }
    }

    #[test]
    fn term_freq_equals_doc_freq_popcount_bound(
        docs in prop::collection::vec(document_strategy(), 1..10)
    ) {
        let doc_values: Vec<_> = docs.iter().map(|d| roaringish_column::Doc::Raw(d.clone())).collect();
        let column = Column::from_docs(&doc_values, &WhitespaceTokenizer, &BuildConfig::default()).unwrap();

        let tf = column.term_freq("a");
        let doc_freq = column.doc_freq("a");
        prop_assert_eq!(doc_freq as usize, tf.iter().filter(|&&f| f > 0).count());
    }

    #[test]
    fn bm25_is_monotonic_in_term_freq(
        df in 1u64..50,
        dl in 1u64..40,
        avgdl in 1.0f64..40.0,
        low_tf in 1u64..5,
        extra_tf in 0u64..10,
    ) {
        let bm25 = Bm25::default();
        let high_tf = low_tf + extra_tf;
        let low = bm25.score(&[low_tf as f64], &[df as f64], &[dl as f64], avgdl, 1000)[0];
        let high = bm25.score(&[high_tf as f64], &[df as f64], &[dl as f64], avgdl, 1000)[0];
        prop_assert!(high >= low);
    }
}
