//! Fee domain errors

use thiserror::Error;

use domain_rules::RuleError;

/// Errors that can occur during a fee calculation
///
/// Validation failures abort the calculation before any rule is evaluated;
/// nothing is partially computed.
#[derive(Debug, Error)]
pub enum FeeError {
    #[error("Transaction amount must be a positive number")]
    InvalidAmount,

    #[error("Client credit score must be between 0 and 1000")]
    InvalidCreditScore,

    #[error("Rule evaluation failed: {0}")]
    Rules(#[from] RuleError),
}
