//! Ports for the external collaborators the core depends on
//!
//! The calculation core never talks to a database or transport directly.
//! Surrounding subsystems (CRUD layers, persistence, HTTP) implement these
//! traits; the core only sees the narrow contracts.
//!
//! Domain-specific ports (rule repository, history recorders) live in their
//! owning domain crates. This module holds the unified [`PortError`] and the
//! store ports the persisting batch mode injects.

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

use crate::facts::{ClientDraft, ClientRecord, TransactionDraft, TransactionRecord};
use crate::identifiers::ClientId;

/// Error type for port operations
///
/// All port implementations surface failures through this type so the core
/// handles collaborator errors uniformly.
#[derive(Debug, Error)]
pub enum PortError {
    /// The requested entity was not found
    #[error("Not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    /// A validation error occurred
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Connection to the underlying system failed
    #[error("Connection error: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The collaborator is unavailable
    #[error("Service unavailable: {service}")]
    ServiceUnavailable { service: String },

    /// An internal error occurred
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl PortError {
    /// Creates a NotFound error
    pub fn not_found(entity_type: impl Into<String>, id: impl fmt::Display) -> Self {
        PortError::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        PortError::Validation {
            message: message.into(),
        }
    }

    /// Creates a Connection error
    pub fn connection(message: impl Into<String>) -> Self {
        PortError::Connection {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a ServiceUnavailable error
    pub fn unavailable(service: impl Into<String>) -> Self {
        PortError::ServiceUnavailable {
            service: service.into(),
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        PortError::Internal {
            message: message.into(),
        }
    }
}

/// Store that persists clients for the persisting batch mode.
///
/// The pure calculation path never calls this.
#[async_trait]
pub trait ClientStorePort: Send + Sync {
    async fn create(&self, draft: ClientDraft) -> Result<ClientRecord, PortError>;
}

/// Creates transaction records for the persisting batch mode.
///
/// Injected per batch call, mirroring how the surrounding transaction
/// service hands its own `create` to the processor.
#[async_trait]
pub trait TransactionCreator: Send + Sync {
    async fn create(
        &self,
        draft: TransactionDraft,
        client_id: ClientId,
    ) -> Result<TransactionRecord, PortError>;
}
