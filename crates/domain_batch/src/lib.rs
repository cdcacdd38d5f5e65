//! Batch Domain
//!
//! Runs many fee calculations as one batch: the batch is split into chunks
//! sized from the batch itself, each chunk's items run concurrently, and
//! chunks run strictly one after another. A failing item is counted and its
//! message kept (up to a cap) while the rest of the batch continues.
//!
//! Two modes share the same machinery: a pure mode that only calculates,
//! and a persisting mode that creates the client and transaction records
//! before calculating.

pub mod config;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod processor;

pub use config::BatchConfig;
pub use error::BatchError;
pub use metrics::BatchResult;
pub use ports::{BatchHistoryPort, NoopBatchHistory};
pub use processor::BatchProcessor;
