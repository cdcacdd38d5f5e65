//! Built-in default rule set
//!
//! Hard-coded equivalents of the seeded repository rules. The engine falls
//! back to these when the rule repository is unavailable at load time, so
//! the service keeps calculating fees in degraded mode instead of starting
//! empty.

use serde_json::json;

use core_kernel::RuleId;

use crate::rule::{RuleDefinition, RuleScope};

/// Returns the built-in default rules, in priority order.
pub fn default_rules() -> Vec<RuleDefinition> {
    vec![
        RuleDefinition {
            id: RuleId::new(1),
            name: "POS Fixed Fee".to_string(),
            description: "Fixed fee 0.20€ for POS ≤ 100€, otherwise 0.2% of amount".to_string(),
            scope: RuleScope::Pos,
            conditions: json!({
                "all": [
                    {"fact": "transaction", "path": "$.type", "operator": "equal", "value": "POS"}
                ]
            }),
            event: json!({
                "type": "calculate-fee",
                "params": {
                    "feeType": "conditional",
                    "condition": {"field": "amount", "operator": "lessThanInclusive", "value": 100},
                    "fixedFee": 0.2,
                    "percentageFee": 0.002
                }
            }),
            priority: 1,
            is_active: true,
        },
        RuleDefinition {
            id: RuleId::new(2),
            name: "E-commerce Fee".to_string(),
            description: "1.8% + 0.15€, max 120€, for e-commerce".to_string(),
            scope: RuleScope::Ecommerce,
            conditions: json!({
                "all": [
                    {"fact": "transaction", "path": "$.type", "operator": "equal", "value": "ECOMMERCE"}
                ]
            }),
            event: json!({
                "type": "calculate-fee",
                "params": {
                    "feeType": "percentage_plus_fixed",
                    "percentage": 0.018,
                    "fixedAmount": 0.15,
                    "cap": 120
                }
            }),
            priority: 2,
            is_active: true,
        },
        RuleDefinition {
            id: RuleId::new(3),
            name: "Large Transaction Surcharge".to_string(),
            description: "Additional 0.5% fee for transactions over €5000".to_string(),
            scope: RuleScope::Any,
            conditions: json!({
                "all": [
                    {"fact": "transaction", "path": "$.amount", "operator": "greaterThan", "value": 5000}
                ]
            }),
            event: json!({
                "type": "calculate-fee",
                "params": {"feeType": "percentage", "percentage": 0.005}
            }),
            priority: 5,
            is_active: true,
        },
        RuleDefinition {
            id: RuleId::new(4),
            name: "Credit Score Discount".to_string(),
            description: "1% discount if creditScore > 400".to_string(),
            scope: RuleScope::Any,
            conditions: json!({
                "all": [
                    {"fact": "client", "path": "$.creditScore", "operator": "greaterThan", "value": 400}
                ]
            }),
            event: json!({
                "type": "calculate-fee",
                "params": {"feeType": "percentage", "percentage": -0.01}
            }),
            priority: 10,
            is_active: true,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::CompiledRule;

    #[test]
    fn test_default_rules_all_compile() {
        for definition in default_rules() {
            CompiledRule::compile(&definition).unwrap();
        }
    }

    #[test]
    fn test_default_rules_are_priority_ordered() {
        let priorities: Vec<i32> = default_rules().iter().map(|r| r.priority).collect();
        let mut sorted = priorities.clone();
        sorted.sort();
        assert_eq!(priorities, sorted);
    }
}
