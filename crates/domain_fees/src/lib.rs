//! Fee Domain
//!
//! Turns the rule engine's matched events into a monetary fee for one
//! transaction. The flow per calculation:
//!
//! 1. Validate the transaction/client inputs (fail fast, never defaulted)
//! 2. Evaluate the active rule snapshot against the fact set
//! 3. Derive each matched event's contribution from its fee formula
//! 4. Sum all contributions, round once, and report the applied rules
//!
//! Results are handed to the history recorder fire-and-forget; a recording
//! failure never affects the calculation outcome.

pub mod calculator;
pub mod error;
pub mod ports;
pub mod result;
pub mod service;

pub use calculator::{fee_for_event, validate_inputs};
pub use error::FeeError;
pub use ports::{CalculationHistoryPort, NoopCalculationHistory};
pub use result::{AppliedRule, CalculationRequest, CalculationResult};
pub use service::FeeCalculationService;
