//! Batch outcome aggregation
//!
//! Per-item outcomes are folded into the running metrics once per chunk,
//! after the whole chunk has joined, so a partially processed chunk never
//! leaks into the totals.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{round_metric, round_money};

/// What one batch item produced: the amounts on success, or an error message.
#[derive(Debug)]
pub(crate) enum ItemOutcome {
    Success { amount: Decimal, fee: Decimal },
    Failure { index: usize, message: String },
}

/// Running totals while a batch executes.
#[derive(Debug)]
pub(crate) struct BatchMetrics {
    processed: usize,
    failed: usize,
    total_amount: Decimal,
    total_fee: Decimal,
    errors: Vec<String>,
    max_stored_errors: usize,
}

impl BatchMetrics {
    pub(crate) fn new(max_stored_errors: usize) -> Self {
        Self {
            processed: 0,
            failed: 0,
            total_amount: Decimal::ZERO,
            total_fee: Decimal::ZERO,
            errors: Vec::new(),
            max_stored_errors,
        }
    }

    /// Folds a completed chunk's outcomes into the totals.
    pub(crate) fn absorb_chunk(&mut self, outcomes: Vec<ItemOutcome>) {
        for outcome in outcomes {
            match outcome {
                ItemOutcome::Success { amount, fee } => {
                    self.processed += 1;
                    self.total_amount += amount;
                    self.total_fee += fee;
                }
                ItemOutcome::Failure { index, message } => {
                    self.failed += 1;
                    if self.errors.len() < self.max_stored_errors {
                        self.errors.push(format!("Batch item {index}: {message}"));
                    }
                }
            }
        }
    }

    pub(crate) fn processed(&self) -> usize {
        self.processed
    }

    pub(crate) fn failed(&self) -> usize {
        self.failed
    }

    /// Finalizes the metrics into a reportable result.
    pub(crate) fn finish(self, total: usize, total_time_ms: u64) -> BatchResult {
        let total_decimal = Decimal::from(total as u64);
        let average_processing_time_ms = if total == 0 {
            Decimal::ZERO
        } else {
            round_metric(Decimal::from(total_time_ms) / total_decimal)
        };
        let success_rate = if total == 0 {
            Decimal::ZERO
        } else {
            round_metric(Decimal::from(self.processed as u64) / total_decimal * Decimal::ONE_HUNDRED)
        };

        BatchResult {
            processed_transactions: self.processed,
            failed_transactions: self.failed,
            total_amount: round_money(self.total_amount),
            total_fee: round_money(self.total_fee),
            total_time_ms,
            average_processing_time_ms,
            success_rate,
            errors: self.errors,
        }
    }
}

/// The aggregate outcome of one batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    pub processed_transactions: usize,
    pub failed_transactions: usize,
    /// Sum of successfully processed transaction amounts, rounded to 2dp
    pub total_amount: Decimal,
    /// Sum of successfully processed fees, rounded to 2dp
    pub total_fee: Decimal,
    pub total_time_ms: u64,
    /// `total_time_ms / batch size`, rounded to 2dp
    pub average_processing_time_ms: Decimal,
    /// Processed share of the batch as a percentage, rounded to 2dp
    pub success_rate: Decimal,
    /// First few item failures; the rest are only counted
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_absorb_chunk_counts_both_outcomes() {
        let mut metrics = BatchMetrics::new(10);
        metrics.absorb_chunk(vec![
            ItemOutcome::Success {
                amount: dec!(100),
                fee: dec!(2.50),
            },
            ItemOutcome::Failure {
                index: 1,
                message: "Invalid transaction amount".into(),
            },
            ItemOutcome::Success {
                amount: dec!(50),
                fee: dec!(1.00),
            },
        ]);

        let result = metrics.finish(3, 30);
        assert_eq!(result.processed_transactions, 2);
        assert_eq!(result.failed_transactions, 1);
        assert_eq!(result.total_amount, dec!(150.00));
        assert_eq!(result.total_fee, dec!(3.50));
        assert_eq!(result.errors, vec!["Batch item 1: Invalid transaction amount"]);
    }

    #[test]
    fn test_error_log_is_capped() {
        let mut metrics = BatchMetrics::new(2);
        let outcomes = (0..5)
            .map(|index| ItemOutcome::Failure {
                index,
                message: "boom".into(),
            })
            .collect();
        metrics.absorb_chunk(outcomes);

        let result = metrics.finish(5, 10);
        assert_eq!(result.failed_transactions, 5);
        assert_eq!(result.errors.len(), 2);
    }

    #[test]
    fn test_success_rate_and_average_are_rounded() {
        let mut metrics = BatchMetrics::new(10);
        metrics.absorb_chunk(vec![
            ItemOutcome::Success {
                amount: dec!(10),
                fee: dec!(0.10),
            },
            ItemOutcome::Success {
                amount: dec!(10),
                fee: dec!(0.10),
            },
            ItemOutcome::Failure {
                index: 2,
                message: "boom".into(),
            },
        ]);

        let result = metrics.finish(3, 100);
        assert_eq!(result.success_rate, dec!(66.67));
        assert_eq!(result.average_processing_time_ms, dec!(33.33));
    }

    #[test]
    fn test_result_serializes_with_wire_names() {
        let metrics = BatchMetrics::new(10);
        let result = metrics.finish(0, 0);
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("processedTransactions").is_some());
        assert!(json.get("failedTransactions").is_some());
        assert!(json.get("averageProcessingTimeMs").is_some());
        assert!(json.get("successRate").is_some());
        // empty error list stays off the wire
        assert!(json.get("errors").is_none());
    }
}
