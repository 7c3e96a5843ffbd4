pub mod fixture;

/// Add two integers.
///
/// Overflow behaves as for any `i64` addition.
pub fn add(left: i64, right: i64) -> i64 {
    left + right
}

/// Check if `value` is an element of `slice`
pub fn contains<E: PartialEq>(slice: &[E], value: &E) -> bool {
    slice.iter().any(|x| x == value)
}
