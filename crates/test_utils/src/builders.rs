//! Test Data Builders
//!
//! Builder patterns for constructing test data with sensible defaults.
//! Tests specify only the fields they care about.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

use core_kernel::{ClientDraft, ClientSegment, Currency, RuleId, TransactionDraft, TransactionType};
use domain_rules::{RuleDefinition, RuleScope};

/// Builder for transaction drafts
pub struct TransactionDraftBuilder {
    transaction_type: TransactionType,
    amount: Decimal,
    currency: Option<Currency>,
}

impl Default for TransactionDraftBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionDraftBuilder {
    pub fn new() -> Self {
        Self {
            transaction_type: TransactionType::Pos,
            amount: dec!(100),
            currency: None,
        }
    }

    pub fn with_type(mut self, transaction_type: TransactionType) -> Self {
        self.transaction_type = transaction_type;
        self
    }

    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.amount = amount;
        self
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = Some(currency);
        self
    }

    pub fn build(self) -> TransactionDraft {
        TransactionDraft {
            transaction_type: self.transaction_type,
            amount: self.amount,
            currency: self.currency,
        }
    }
}

/// Builder for client drafts
pub struct ClientDraftBuilder {
    name: String,
    credit_score: Decimal,
    segment: Option<ClientSegment>,
    email: Option<String>,
}

impl Default for ClientDraftBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientDraftBuilder {
    pub fn new() -> Self {
        Self {
            name: "Test Client".to_string(),
            credit_score: dec!(300),
            segment: None,
            email: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_credit_score(mut self, credit_score: Decimal) -> Self {
        self.credit_score = credit_score;
        self
    }

    pub fn with_segment(mut self, segment: ClientSegment) -> Self {
        self.segment = Some(segment);
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn build(self) -> ClientDraft {
        ClientDraft {
            name: self.name,
            credit_score: self.credit_score,
            segment: self.segment,
            email: self.email,
        }
    }
}

/// Builder for rule definitions
///
/// Defaults to an always-matching flat-fee rule; override the condition and
/// event documents to shape the scenario.
pub struct RuleDefinitionBuilder {
    id: RuleId,
    name: String,
    description: String,
    scope: RuleScope,
    conditions: Value,
    event: Value,
    priority: i32,
    is_active: bool,
}

impl Default for RuleDefinitionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleDefinitionBuilder {
    pub fn new() -> Self {
        Self {
            id: RuleId::new(1),
            name: "Test Rule".to_string(),
            description: "Flat test fee".to_string(),
            scope: RuleScope::Any,
            conditions: json!({ "all": [] }),
            event: json!({
                "type": "calculate-fee",
                "params": { "feeType": "fixed", "amount": "1.00" }
            }),
            priority: 1,
            is_active: true,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = RuleId::new(id);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_scope(mut self, scope: RuleScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_conditions(mut self, conditions: Value) -> Self {
        self.conditions = conditions;
        self
    }

    pub fn with_event(mut self, event: Value) -> Self {
        self.event = event;
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    pub fn build(self) -> RuleDefinition {
        RuleDefinition {
            id: self.id,
            name: self.name,
            description: self.description,
            scope: self.scope,
            conditions: self.conditions,
            event: self.event,
            priority: self.priority,
            is_active: self.is_active,
        }
    }
}
