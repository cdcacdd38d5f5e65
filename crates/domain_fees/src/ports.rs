//! History recording port for single calculations
//!
//! Recording is one-way: the core hands a finished result to the recorder
//! and moves on. Failures are observable only to the recorder.

use async_trait::async_trait;

use core_kernel::PortError;

use crate::result::CalculationResult;

/// Sink for finished single-calculation results
#[async_trait]
pub trait CalculationHistoryPort: Send + Sync {
    async fn record_single(&self, result: &CalculationResult) -> Result<(), PortError>;
}

/// Recorder that drops everything; used by the pure calculation paths and
/// in tests where history is irrelevant.
pub struct NoopCalculationHistory;

#[async_trait]
impl CalculationHistoryPort for NoopCalculationHistory {
    async fn record_single(&self, _result: &CalculationResult) -> Result<(), PortError> {
        Ok(())
    }
}
