use roaringish_column::{SparseSetBuilder, SparseSetMatrix};

fn sample() -> SparseSetMatrix {
    let mut builder = SparseSetBuilder::new();
    builder.append(&[3, 1, 1, 2]);
    builder.append(&[]);
    builder.append(&[5]);
    builder.build()
}

#[test]
fn append_sorts_and_dedupes_each_row() {
    let matrix = sample();
    assert_eq!(matrix.row(0).unwrap(), &[1, 2, 3]);
    assert_eq!(matrix.row(1).unwrap(), &[] as &[u32]);
    assert_eq!(matrix.num_rows(), 3);
}

#[test]
fn row_equality_is_set_equality() {
    let matrix = sample();
    assert!(!matrix.row_eq(0, 2).unwrap());
    assert_eq!(matrix.row(0).unwrap(), matrix.row(0).unwrap());
}

#[test]
fn sum_axis1_reports_row_cardinality() {
    let matrix = sample();
    assert_eq!(matrix.sum_axis1(), vec![3, 0, 1]);
}
