//! Calculation request and result shapes
//!
//! These are the wire-independent shapes of one calculation; any transport
//! maps onto them without renaming fields or changing numeric semantics.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{ClientDraft, ClientRecord, TransactionDraft, TransactionRecord};

/// One rule's contribution to a calculation
///
/// The fee here is the pre-rounded individual contribution; only the summed
/// total is rounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedRule {
    pub id: String,
    pub description: String,
    pub fee: Decimal,
}

/// A single fee calculation request: transaction plus client facts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationRequest {
    pub transaction: TransactionDraft,
    pub client: ClientDraft,
}

/// The outcome of one fee calculation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    pub transaction: TransactionRecord,
    pub client: ClientRecord,
    /// Total fee, rounded to 2 decimal places
    pub fee: Decimal,
    /// `transaction.amount + fee`
    pub total_amount: Decimal,
    /// One entry per fee-producing matched rule, in priority order
    pub applied_rules: Vec<AppliedRule>,
    pub calculation_time_ms: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}
