//! Outbound port for batch history recording

use async_trait::async_trait;

use core_kernel::{BatchId, PortError};

use crate::metrics::BatchResult;

/// Persists a finished batch's aggregate result.
///
/// Called fire-and-forget after the batch completes; a recording failure is
/// logged and never reaches the caller.
#[async_trait]
pub trait BatchHistoryPort: Send + Sync {
    async fn record_batch(&self, result: &BatchResult, batch_id: &BatchId) -> Result<(), PortError>;
}

/// Recorder that drops everything, for callers without a history store.
#[derive(Debug, Default)]
pub struct NoopBatchHistory;

#[async_trait]
impl BatchHistoryPort for NoopBatchHistory {
    async fn record_batch(
        &self,
        _result: &BatchResult,
        _batch_id: &BatchId,
    ) -> Result<(), PortError> {
        Ok(())
    }
}
