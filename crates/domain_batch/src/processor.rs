//! Chunked concurrent batch processor
//!
//! A batch runs as a sequence of chunks. Every item in a chunk is spawned
//! onto the runtime at once and the chunk is joined in full before the next
//! one starts, so the chunk size is also the concurrency ceiling. Item
//! failures are absorbed into the metrics; only an empty or oversized batch
//! is rejected outright.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rust_decimal::Decimal;

use core_kernel::{BatchId, ClientStorePort, TransactionCreator};
use domain_fees::{CalculationRequest, FeeCalculationService};

use crate::config::BatchConfig;
use crate::error::BatchError;
use crate::metrics::{BatchMetrics, BatchResult, ItemOutcome};
use crate::ports::BatchHistoryPort;

/// Chunks after which the processor yields on large batches.
const BACKPRESSURE_INTERVAL: usize = 5;

pub struct BatchProcessor {
    service: Arc<FeeCalculationService>,
    history: Arc<dyn BatchHistoryPort>,
    config: BatchConfig,
}

impl BatchProcessor {
    pub fn new(
        service: Arc<FeeCalculationService>,
        history: Arc<dyn BatchHistoryPort>,
        config: BatchConfig,
    ) -> Self {
        Self {
            service,
            history,
            config,
        }
    }

    /// Calculates fees for a batch without persisting anything.
    pub async fn process_pure(
        &self,
        requests: Vec<CalculationRequest>,
    ) -> Result<BatchResult, BatchError> {
        self.check_batch(&requests)?;
        let service = Arc::clone(&self.service);
        self.run(requests, move |request| {
            let service = Arc::clone(&service);
            async move {
                let result = service
                    .calculate_pure(request)
                    .await
                    .map_err(|e| e.to_string())?;
                Ok((result.transaction.amount, result.fee))
            }
        })
        .await
    }

    /// Creates the client and transaction for each item, then calculates
    /// its fee against the stored records.
    ///
    /// The stores are injected per call; the surrounding layer decides what
    /// backs them for a given batch.
    pub async fn process_persisting(
        &self,
        requests: Vec<CalculationRequest>,
        clients: Arc<dyn ClientStorePort>,
        transactions: Arc<dyn TransactionCreator>,
    ) -> Result<BatchResult, BatchError> {
        self.check_batch(&requests)?;
        let service = Arc::clone(&self.service);
        self.run(requests, move |request| {
            let service = Arc::clone(&service);
            let clients = Arc::clone(&clients);
            let transactions = Arc::clone(&transactions);
            async move {
                let client = clients
                    .create(request.client)
                    .await
                    .map_err(|e| e.to_string())?;
                let transaction = transactions
                    .create(request.transaction, client.id)
                    .await
                    .map_err(|e| e.to_string())?;
                let result = service
                    .calculate(transaction, client)
                    .await
                    .map_err(|e| e.to_string())?;
                Ok((result.transaction.amount, result.fee))
            }
        })
        .await
    }

    fn check_batch(&self, requests: &[CalculationRequest]) -> Result<(), BatchError> {
        if requests.is_empty() {
            return Err(BatchError::EmptyBatch);
        }
        if requests.len() > self.config.max_batch_size {
            return Err(BatchError::BatchTooLarge {
                size: requests.len(),
                max: self.config.max_batch_size,
            });
        }
        Ok(())
    }

    async fn run<F, Fut>(
        &self,
        requests: Vec<CalculationRequest>,
        process_item: F,
    ) -> Result<BatchResult, BatchError>
    where
        F: Fn(CalculationRequest) -> Fut,
        Fut: Future<Output = Result<(Decimal, Decimal), String>> + Send + 'static,
    {
        let total = requests.len();
        let chunk_size = self.config.chunk_size(total);
        let started = Instant::now();
        let mut metrics = BatchMetrics::new(self.config.max_stored_errors);

        tracing::info!(total, chunk_size, "batch started");

        let mut items = requests.into_iter();
        let mut next_index = 0usize;
        let mut chunk_index = 0usize;
        loop {
            let chunk: Vec<_> = items.by_ref().take(chunk_size).collect();
            if chunk.is_empty() {
                break;
            }

            let chunk_started = Instant::now();
            let handles: Vec<_> = chunk
                .into_iter()
                .map(|request| {
                    let item_index = next_index;
                    next_index += 1;
                    (item_index, tokio::spawn(process_item(request)))
                })
                .collect();

            let mut outcomes = Vec::with_capacity(handles.len());
            for (item_index, handle) in handles {
                outcomes.push(match handle.await {
                    Ok(Ok((amount, fee))) => ItemOutcome::Success { amount, fee },
                    Ok(Err(message)) => ItemOutcome::Failure {
                        index: item_index,
                        message,
                    },
                    Err(join_error) => ItemOutcome::Failure {
                        index: item_index,
                        message: join_error.to_string(),
                    },
                });
            }
            metrics.absorb_chunk(outcomes);

            if total > self.config.progress_log_threshold {
                tracing::info!(
                    chunk = chunk_index + 1,
                    processed = metrics.processed(),
                    failed = metrics.failed(),
                    total,
                    chunk_ms = chunk_started.elapsed().as_millis() as u64,
                    "batch chunk complete"
                );
            }
            if total > self.config.large_batch_threshold
                && chunk_index % BACKPRESSURE_INTERVAL == 0
            {
                tokio::time::sleep(Duration::from_millis(self.config.backpressure_delay_ms)).await;
            }
            chunk_index += 1;
        }

        let result = metrics.finish(total, started.elapsed().as_millis() as u64);
        let batch_id = BatchId::generate();
        tracing::info!(
            %batch_id,
            processed = result.processed_transactions,
            failed = result.failed_transactions,
            %result.success_rate,
            elapsed_ms = result.total_time_ms,
            "batch complete"
        );
        self.record_history(result.clone(), batch_id);
        Ok(result)
    }

    /// Hands the result to the recorder without waiting for it.
    fn record_history(&self, result: BatchResult, batch_id: BatchId) {
        let history = Arc::clone(&self.history);
        tokio::spawn(async move {
            if let Err(error) = history.record_batch(&result, &batch_id).await {
                tracing::warn!(%batch_id, %error, "failed to record batch history");
            }
        });
    }
}
