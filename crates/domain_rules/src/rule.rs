//! Rule definitions and compilation
//!
//! [`RuleDefinition`] is the repository-owned record with raw JSON
//! `conditions` and `event` documents. [`CompiledRule`] is the validated,
//! typed form held by a snapshot. Compilation is where all structural
//! problems surface; a rule that compiles cannot fail structurally during
//! evaluation.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use core_kernel::{RuleId, TransactionType};

use crate::condition::{ConditionNode, FactViews};
use crate::error::RuleError;
use crate::event::{FeeEventSpec, FeeParams};

/// Transaction types a rule applies to, including the wildcard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RuleScope {
    Pos,
    Ecommerce,
    Transfer,
    Atm,
    Online,
    Any,
}

impl RuleScope {
    /// Whether a transaction of the given type is in scope.
    ///
    /// A non-`ANY` scope acts as an implicit leading AND on the transaction
    /// type: the rule's condition tree is not even evaluated for
    /// out-of-scope transactions.
    pub fn matches(&self, transaction_type: TransactionType) -> bool {
        match self {
            RuleScope::Any => true,
            RuleScope::Pos => transaction_type == TransactionType::Pos,
            RuleScope::Ecommerce => transaction_type == TransactionType::Ecommerce,
            RuleScope::Transfer => transaction_type == TransactionType::Transfer,
            RuleScope::Atm => transaction_type == TransactionType::Atm,
            RuleScope::Online => transaction_type == TransactionType::Online,
        }
    }
}

impl fmt::Display for RuleScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RuleScope::Pos => "POS",
            RuleScope::Ecommerce => "ECOMMERCE",
            RuleScope::Transfer => "TRANSFER",
            RuleScope::Atm => "ATM",
            RuleScope::Online => "ONLINE",
            RuleScope::Any => "ANY",
        };
        write!(f, "{name}")
    }
}

/// A fee rule as stored by the rule repository
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleDefinition {
    pub id: RuleId,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub scope: RuleScope,
    /// Raw condition tree document
    pub conditions: Value,
    /// Raw fee event document
    pub event: Value,
    /// Lower number = evaluated and applied first
    pub priority: i32,
    pub is_active: bool,
}

/// A validated rule held by an engine snapshot
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub id: RuleId,
    pub name: String,
    pub scope: RuleScope,
    pub priority: i32,
    conditions: ConditionNode,
    params: FeeParams,
}

impl CompiledRule {
    /// Compiles a definition into its typed form.
    ///
    /// Fails on a malformed condition tree or event document. The caller
    /// isolates the failure to this one rule.
    pub fn compile(definition: &RuleDefinition) -> Result<Self, RuleError> {
        let conditions: ConditionNode = serde_json::from_value(definition.conditions.clone())
            .map_err(|e| RuleError::compile(&definition.name, format!("conditions: {e}")))?;
        conditions
            .validate()
            .map_err(|reason| RuleError::compile(&definition.name, reason))?;

        let event: FeeEventSpec = serde_json::from_value(definition.event.clone())
            .map_err(|e| RuleError::compile(&definition.name, format!("event: {e}")))?;

        let mut params = event.params;
        params.rule_id = Some(definition.id);
        params.rule_name = Some(definition.name.clone());
        params.description = Some(definition.description.clone());

        Ok(Self {
            id: definition.id,
            name: definition.name.clone(),
            scope: definition.scope,
            priority: definition.priority,
            conditions,
            params,
        })
    }

    /// Runs the condition tree against the rendered facts
    pub fn matches(&self, facts: &FactViews) -> bool {
        self.conditions.evaluate(facts)
    }

    /// The event params this rule emits when matched
    pub fn params(&self) -> &FeeParams {
        &self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn definition(conditions: Value, event: Value) -> RuleDefinition {
        RuleDefinition {
            id: RuleId::new(7),
            name: "Test Rule".to_string(),
            description: "A test rule".to_string(),
            scope: RuleScope::Any,
            conditions,
            event,
            priority: 1,
            is_active: true,
        }
    }

    #[test]
    fn test_compile_injects_trace_fields() {
        let def = definition(
            json!({"all": [{"fact": "transaction", "path": "$.amount", "operator": "greaterThan", "value": 10}]}),
            json!({"type": "calculate-fee", "params": {"feeType": "fixed", "amount": 1.5}}),
        );
        let compiled = CompiledRule::compile(&def).unwrap();
        assert_eq!(compiled.params().rule_id, Some(RuleId::new(7)));
        assert_eq!(compiled.params().rule_name.as_deref(), Some("Test Rule"));
        assert_eq!(compiled.params().description.as_deref(), Some("A test rule"));
    }

    #[test]
    fn test_compile_rejects_malformed_conditions() {
        let def = definition(
            json!({"all": [{"fact": "transaction", "path": "$.amount", "operator": "nonsense", "value": 10}]}),
            json!({"type": "calculate-fee", "params": {"feeType": "fixed", "amount": 1}}),
        );
        assert!(matches!(
            CompiledRule::compile(&def),
            Err(RuleError::Compile { .. })
        ));
    }

    #[test]
    fn test_compile_rejects_malformed_event() {
        let def = definition(
            json!({"all": []}),
            json!({"type": "calculate-fee"}),
        );
        assert!(matches!(
            CompiledRule::compile(&def),
            Err(RuleError::Compile { .. })
        ));
    }

    #[test]
    fn test_scope_matching() {
        use core_kernel::TransactionType;
        assert!(RuleScope::Any.matches(TransactionType::Atm));
        assert!(RuleScope::Pos.matches(TransactionType::Pos));
        assert!(!RuleScope::Pos.matches(TransactionType::Ecommerce));
    }
}
