//! Custom Test Assertions
//!
//! Assertion helpers for monetary values that give more meaningful error
//! messages than the standard macros.

use rust_decimal::Decimal;

/// Asserts that a monetary value carries no sub-cent precision.
///
/// # Panics
///
/// Panics if rounding the value to 2 decimal places would change it.
pub fn assert_rounded_to_cents(value: Decimal) {
    assert_eq!(
        value,
        value.round_dp(2),
        "expected a value rounded to cents, got {value}"
    );
}

/// Asserts that two decimals are equal within a tolerance.
///
/// # Panics
///
/// Panics if the values differ by more than `tolerance`.
pub fn assert_decimal_approx_eq(actual: Decimal, expected: Decimal, tolerance: Decimal) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "decimals differ by more than tolerance: actual={actual}, expected={expected}, diff={diff}, tolerance={tolerance}"
    );
}
