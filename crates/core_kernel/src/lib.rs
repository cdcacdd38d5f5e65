//! Core Kernel - Foundational types and utilities for the fee engine
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Transaction and client fact types evaluated by the rule engine
//! - Monetary rounding with precise decimal arithmetic
//! - Common identifiers and batch correlation ids
//! - Port traits for the external collaborators (stores, history recorder)

pub mod error;
pub mod facts;
pub mod identifiers;
pub mod money;
pub mod ports;

pub use error::CoreError;
pub use facts::{
    ClientDraft, ClientRecord, ClientSegment, Currency, FactSet, TransactionDraft,
    TransactionRecord, TransactionType,
};
pub use identifiers::{BatchId, ClientId, RuleId, TransactionId};
pub use money::{round_metric, round_money};
pub use ports::{ClientStorePort, PortError, TransactionCreator};
