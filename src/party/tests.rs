use super::split_into_parts;

#[test]
fn split_is_exact_for_the_reference_inputs() {
    assert_eq!(split_into_parts(30, 3), vec![10, 10, 10]);
    assert_eq!(split_into_parts(300, 3), vec![100, 100, 100]);
    // 100 is not divisible by 3; the last part absorbs the remainder
    assert_eq!(split_into_parts(100, 3), vec![33, 33, 34]);
}

#[test]
fn split_is_exact_for_awkward_inputs() {
    for &value in &[0i64, 1, -1, 7, -100, 1_000_003, i64::MAX / 2, i64::MIN / 2] {
        for n in 1..=7usize {
            let parts = split_into_parts(value, n);
            assert_eq!(parts.len(), n, "value {} split into {} parts", value, n);
            assert_eq!(
                parts.iter().sum::<i64>(),
                value,
                "parts {:?} do not reconstruct {}",
                parts,
                value
            );
        }
    }
}

#[test]
fn split_into_one_part_is_the_identity() {
    assert_eq!(split_into_parts(42, 1), vec![42]);
    assert_eq!(split_into_parts(-42, 1), vec![-42]);
}

#[test]
#[should_panic(expected = "cannot split into zero parts")]
fn split_into_zero_parts_panics() {
    split_into_parts(1, 0);
}
