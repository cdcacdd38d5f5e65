//! Rule domain errors

use thiserror::Error;

use core_kernel::PortError;

/// Errors that can occur in the rule domain
///
/// Compile errors are isolated per rule at load time; evaluation errors
/// abort the whole evaluate call for the affected fact set. The asymmetry
/// is deliberate and mirrors the original system.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("Failed to compile rule '{rule}': {reason}")]
    Compile { rule: String, reason: String },

    #[error("Rule evaluation failed: {0}")]
    Evaluation(String),

    #[error("Rule not found: {0}")]
    NotFound(String),

    #[error("Repository error: {0}")]
    Repository(#[from] PortError),
}

impl RuleError {
    pub fn compile(rule: impl Into<String>, reason: impl Into<String>) -> Self {
        RuleError::Compile {
            rule: rule.into(),
            reason: reason.into(),
        }
    }

    pub fn evaluation(message: impl Into<String>) -> Self {
        RuleError::Evaluation(message.into())
    }
}
