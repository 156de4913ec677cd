/// Splits `value` into exactly `n` additive parts that sum back to `value`.
///
/// The first `n - 1` parts each carry the truncated quotient `value / n`; the
/// last part carries the exact remainder, so reconstruction is exact for
/// every integer input, including negative values and values not divisible
/// by `n`.
///
/// `n` must be at least 1; calling with `n == 0` is a programming defect and
/// panics.
pub fn split_into_parts(value: i64, n: usize) -> Vec<i64> {
    assert!(n >= 1, "cannot split into zero parts");
    let quotient = value / n as i64;
    let mut parts = vec![quotient; n];
    parts[n - 1] = value - quotient * (n as i64 - 1);
    parts
}
