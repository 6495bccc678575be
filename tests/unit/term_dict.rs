use roaringish_column::{Error, TermDict};

#[test]
fn add_term_assigns_dense_ids_in_first_seen_order() {
    let mut dict = TermDict::new();
    assert_eq!(dict.add_term("foo"), 0);
    assert_eq!(dict.add_term("bar"), 1);
    assert_eq!(dict.add_term("foo"), 0);
    assert_eq!(dict.len(), 2);
}

#[test]
fn get_term_id_fails_for_unseen_term() {
    let dict = TermDict::new();
    assert!(matches!(dict.get_term_id("nope"), Err(Error::TermMissing { .. })));
}

#[test]
fn compatible_requires_agreement_on_shared_ids() {
    let mut a = TermDict::new();
    a.add_term("foo");
    a.add_term("bar");
    let mut b = TermDict::new();
    b.add_term("foo");
    b.add_term("baz");
    assert!(!a.compatible(&b));
}
