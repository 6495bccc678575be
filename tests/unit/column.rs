use roaringish_column::{BuildConfig, Column, Doc, QueryTerm, WhitespaceTokenizer};

fn docs(texts: &[&str]) -> Column {
    let docs: Vec<Doc> = texts.iter().map(|t| Doc::Raw(t.to_string())).collect();
    Column::from_docs(&docs, &WhitespaceTokenizer, &BuildConfig::default()).unwrap()
}

#[test]
fn concat_merges_disjoint_columns_into_one_index() {
    let first = docs(&["foo bar"]);
    let second = docs(&["foo baz"]);
    let merged = Column::concat(&[&first, &second]).unwrap();
    assert_eq!(merged.len(), 2);
    assert_eq!(merged.term_freq("foo"), vec![1, 1]);
    assert_eq!(merged.term_freq("bar"), vec![1, 0]);
    assert_eq!(merged.term_freq("baz"), vec![0, 1]);
}

#[test]
fn concat_rejects_incompatible_dictionaries() {
    // `first` assigns id 0 to "foo"; `second` assigns id 0 to "baz" instead.
    let first = docs(&["foo"]);
    let second = docs(&["baz foo"]);
    assert!(Column::concat(&[&first, &second]).is_err());
}

#[test]
fn take_fills_with_na_row_and_copy_shares_index() {
    let col = docs(&["foo bar", "bar"]);
    let taken = col.take(&[Some(1), None, Some(0)]);
    assert_eq!(taken.len(), 3);
    assert!(!taken.is_na(0));
    assert!(taken.is_na(1));
    assert!(!taken.is_na(2));
    assert_eq!(taken.term_freq("foo"), vec![0, 0, 1]);

    let copied = col.copy();
    assert_eq!(copied.term_freq("bar"), col.term_freq("bar"));
}

#[test]
fn query_term_and_or_dispatch_covers_phrases() {
    let col = docs(&["quick brown fox", "quick fox"]);
    let mask = col.and_query(&[QueryTerm::Phrase(&["quick", "brown"])]);
    assert_eq!(mask, vec![true, false]);
    let mask = col.or_query(&[QueryTerm::Term("brown"), QueryTerm::Term("fox")], 2);
    assert_eq!(mask, vec![true, false]);
}
