//! Monetary rounding with precise decimal arithmetic
//!
//! All amounts and fees in the system are `rust_decimal::Decimal` values with
//! two fraction digits at rest. This module provides the single rounding
//! helper every component uses when a monetary value is finalized.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a monetary value to two decimal places, half away from zero.
///
/// This is applied exactly once per fee, after all per-rule contributions
/// have been summed. Rounding per contribution would compound errors across
/// rules, so intermediate values stay unrounded.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a ratio or time-derived metric to two decimal places.
///
/// Same strategy as [`round_money`], named separately because the inputs
/// (success rates, average timings) are not monetary.
pub fn round_metric(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
