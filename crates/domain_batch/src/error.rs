//! Batch domain errors
//!
//! A batch is rejected as a whole only before any item runs; once accepted,
//! item failures are absorbed into the result metrics instead of surfacing
//! here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("batch must contain at least one transaction")]
    EmptyBatch,

    #[error("batch size {size} exceeds maximum of {max} transactions")]
    BatchTooLarge { size: usize, max: usize },
}
