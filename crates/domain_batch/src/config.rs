//! Batch processor configuration
//!
//! Loaded from environment variables with the `BATCH_` prefix; every field
//! has a default, so construction never fails in practice.

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

/// Divisor for deriving the chunk size from the batch size.
const CHUNK_DIVISOR: usize = 10;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Lower bound on the derived chunk size
    pub min_chunk_size: usize,
    /// Upper bound on the derived chunk size
    pub max_chunk_size: usize,
    /// Pause between chunk groups on large batches, in milliseconds
    pub backpressure_delay_ms: u64,
    /// Error messages kept on the result; failures beyond this are only counted
    pub max_stored_errors: usize,
    /// Batches above this size get backpressure pauses
    pub large_batch_threshold: usize,
    /// Batches above this size get per-chunk progress logs
    pub progress_log_threshold: usize,
    /// Hard cap on accepted batch size
    pub max_batch_size: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            min_chunk_size: 10,
            max_chunk_size: 50,
            backpressure_delay_ms: 10,
            max_stored_errors: 10,
            large_batch_threshold: 1000,
            progress_log_threshold: 100,
            max_batch_size: 1000,
        }
    }
}

impl BatchConfig {
    /// Loads configuration from `BATCH_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(Environment::with_prefix("BATCH").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Concurrency window for a batch of `total` items.
    ///
    /// One tenth of the batch, clamped to `[min_chunk_size, max_chunk_size]`,
    /// so small batches still run a handful of items at once and huge
    /// batches never run unbounded.
    pub fn chunk_size(&self, total: usize) -> usize {
        (total / CHUNK_DIVISOR).clamp(self.min_chunk_size, self.max_chunk_size)
    }
}
