//! Rule repository port
//!
//! The rule domain needs its definitions from somewhere; where exactly is a
//! concern of the surrounding persistence layer. Adapters implement
//! [`RuleRepositoryPort`]; the engine and the admin service only see this
//! contract.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use core_kernel::{PortError, RuleId};

use crate::rule::{RuleDefinition, RuleScope};

/// Data for creating a rule
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRule {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub scope: RuleScope,
    pub conditions: Value,
    pub event: Value,
    #[serde(default = "default_priority")]
    pub priority: i32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_priority() -> i32 {
    1
}

fn default_active() -> bool {
    true
}

/// Partial update of a rule; absent fields keep their value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub scope: Option<RuleScope>,
    pub conditions: Option<Value>,
    pub event: Option<Value>,
    pub priority: Option<i32>,
    pub is_active: Option<bool>,
}

/// Storage contract for rule definitions
#[async_trait]
pub trait RuleRepositoryPort: Send + Sync {
    /// All active rules, ordered by ascending priority
    async fn list_active_by_priority(&self) -> Result<Vec<RuleDefinition>, PortError>;

    /// All rules regardless of active flag, ordered by ascending priority
    async fn list_all(&self) -> Result<Vec<RuleDefinition>, PortError>;

    async fn get(&self, id: RuleId) -> Result<Option<RuleDefinition>, PortError>;

    async fn create(&self, rule: NewRule) -> Result<RuleDefinition, PortError>;

    async fn update(
        &self,
        id: RuleId,
        changes: RuleUpdate,
    ) -> Result<Option<RuleDefinition>, PortError>;

    /// Returns true when a rule was deleted
    async fn delete(&self, id: RuleId) -> Result<bool, PortError>;

    /// Flips the active flag; returns the updated rule if it exists
    async fn toggle_active(&self, id: RuleId) -> Result<Option<RuleDefinition>, PortError>;
}
