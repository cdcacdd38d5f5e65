//! Pre-built Test Fixtures
//!
//! Ready-to-use rule definitions and an in-memory rule repository shared by
//! the crate test suites. The fixtures are consistent and predictable; tests
//! that need variations build on them with the builders.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::Mutex;

use core_kernel::{PortError, RuleId};
use domain_rules::{NewRule, RuleDefinition, RuleRepositoryPort, RuleScope, RuleUpdate};

/// Fixture rules for engine and fee tests
pub struct RuleFixtures;

impl RuleFixtures {
    /// A flat fixed fee applied to every transaction
    pub fn flat_fee(id: i64, amount: &str) -> RuleDefinition {
        RuleDefinition {
            id: RuleId::new(id),
            name: format!("Flat Fee {id}"),
            description: format!("Fixed fee of {amount}"),
            scope: RuleScope::Any,
            conditions: json!({ "all": [] }),
            event: json!({
                "type": "calculate-fee",
                "params": { "feeType": "fixed", "amount": amount }
            }),
            priority: 1,
            is_active: true,
        }
    }

    /// A percentage fee on amounts strictly above a threshold
    pub fn percentage_over(id: i64, threshold: &str, rate: &str) -> RuleDefinition {
        RuleDefinition {
            id: RuleId::new(id),
            name: format!("Percentage Over {threshold}"),
            description: format!("{rate} of the amount above {threshold}"),
            scope: RuleScope::Any,
            conditions: json!({
                "all": [{
                    "fact": "transaction",
                    "path": "$.amount",
                    "operator": "greaterThan",
                    "value": threshold
                }]
            }),
            event: json!({
                "type": "calculate-fee",
                "params": { "feeType": "percentage", "percentage": rate }
            }),
            priority: 2,
            is_active: true,
        }
    }

    /// A rule whose event names a fee type no formula exists for
    pub fn unrecognized_fee_type(id: i64) -> RuleDefinition {
        RuleDefinition {
            id: RuleId::new(id),
            name: "Future Fee".to_string(),
            description: "Fee type introduced by a newer deployment".to_string(),
            scope: RuleScope::Any,
            conditions: json!({ "all": [] }),
            event: json!({
                "type": "calculate-fee",
                "params": { "feeType": "dynamic-surge", "fixedFee": "1.00" }
            }),
            priority: 1,
            is_active: true,
        }
    }

    /// An inactive rule that loaders must skip
    pub fn inactive(id: i64) -> RuleDefinition {
        let mut rule = Self::flat_fee(id, "99.00");
        rule.name = format!("Disabled Rule {id}");
        rule.is_active = false;
        rule
    }

    /// A rule whose condition document does not compile
    pub fn broken(id: i64) -> RuleDefinition {
        let mut rule = Self::flat_fee(id, "1.00");
        rule.name = format!("Broken Rule {id}");
        rule.conditions = json!({
            "all": [{
                "fact": "transaction",
                "path": "$.amount",
                "operator": "between",
                "value": "10"
            }]
        });
        rule
    }
}

/// In-memory rule repository adapter.
///
/// Backs tests that drive the engine through the repository port; can be
/// switched into a failing state to exercise degraded-mode behavior.
pub struct InMemoryRuleRepository {
    rules: Mutex<Vec<RuleDefinition>>,
    next_id: AtomicI64,
    unavailable: AtomicBool,
}

impl InMemoryRuleRepository {
    pub fn new(seed: Vec<RuleDefinition>) -> Self {
        let next_id = seed.iter().map(|r| r.id.value()).max().unwrap_or(0) + 1;
        Self {
            rules: Mutex::new(seed),
            next_id: AtomicI64::new(next_id),
            unavailable: AtomicBool::new(false),
        }
    }

    pub fn set_unavailable(&self, down: bool) {
        self.unavailable.store(down, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), PortError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(PortError::unavailable("rule repository"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RuleRepositoryPort for InMemoryRuleRepository {
    async fn list_active_by_priority(&self) -> Result<Vec<RuleDefinition>, PortError> {
        self.check_available()?;
        let mut rules: Vec<_> = self
            .rules
            .lock()
            .await
            .iter()
            .filter(|r| r.is_active)
            .cloned()
            .collect();
        rules.sort_by_key(|r| (r.priority, r.id));
        Ok(rules)
    }

    async fn list_all(&self) -> Result<Vec<RuleDefinition>, PortError> {
        self.check_available()?;
        let mut rules = self.rules.lock().await.clone();
        rules.sort_by_key(|r| (r.priority, r.id));
        Ok(rules)
    }

    async fn get(&self, id: RuleId) -> Result<Option<RuleDefinition>, PortError> {
        self.check_available()?;
        Ok(self.rules.lock().await.iter().find(|r| r.id == id).cloned())
    }

    async fn create(&self, rule: NewRule) -> Result<RuleDefinition, PortError> {
        self.check_available()?;
        let definition = RuleDefinition {
            id: RuleId::new(self.next_id.fetch_add(1, Ordering::SeqCst)),
            name: rule.name,
            description: rule.description,
            scope: rule.scope,
            conditions: rule.conditions,
            event: rule.event,
            priority: rule.priority,
            is_active: rule.is_active,
        };
        self.rules.lock().await.push(definition.clone());
        Ok(definition)
    }

    async fn update(
        &self,
        id: RuleId,
        changes: RuleUpdate,
    ) -> Result<Option<RuleDefinition>, PortError> {
        self.check_available()?;
        let mut rules = self.rules.lock().await;
        let Some(rule) = rules.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        if let Some(name) = changes.name {
            rule.name = name;
        }
        if let Some(description) = changes.description {
            rule.description = description;
        }
        if let Some(scope) = changes.scope {
            rule.scope = scope;
        }
        if let Some(conditions) = changes.conditions {
            rule.conditions = conditions;
        }
        if let Some(event) = changes.event {
            rule.event = event;
        }
        if let Some(priority) = changes.priority {
            rule.priority = priority;
        }
        if let Some(is_active) = changes.is_active {
            rule.is_active = is_active;
        }
        Ok(Some(rule.clone()))
    }

    async fn delete(&self, id: RuleId) -> Result<bool, PortError> {
        self.check_available()?;
        let mut rules = self.rules.lock().await;
        let before = rules.len();
        rules.retain(|r| r.id != id);
        Ok(rules.len() < before)
    }

    async fn toggle_active(&self, id: RuleId) -> Result<Option<RuleDefinition>, PortError> {
        self.check_available()?;
        let mut rules = self.rules.lock().await;
        let Some(rule) = rules.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        rule.is_active = !rule.is_active;
        Ok(Some(rule.clone()))
    }
}
