//! Transaction and client facts evaluated by the rule engine
//!
//! A [`FactSet`] is the immutable `{transaction, client}` pair supplied per
//! evaluation. Rule conditions address fact fields by path against the JSON
//! rendering of each record, so the serde field names here are part of the
//! rule contract (`type`, `amount`, `creditScore`, ...).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::identifiers::{ClientId, TransactionId};

/// Business transaction types subject to fees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    Pos,
    Ecommerce,
    Transfer,
    Atm,
    Online,
}

impl TransactionType {
    /// Returns the wire name of the type
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Pos => "POS",
            TransactionType::Ecommerce => "ECOMMERCE",
            TransactionType::Transfer => "TRANSFER",
            TransactionType::Atm => "ATM",
            TransactionType::Online => "ONLINE",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Currencies accepted for transaction amounts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Eur,
    Usd,
    Gbp,
}

impl Currency {
    /// Returns the currency symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Eur => "€",
            Currency::Usd => "$",
            Currency::Gbp => "£",
        }
    }

    /// Returns the ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Eur => "EUR",
            Currency::Usd => "USD",
            Currency::Gbp => "GBP",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Commercial segment a client belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ClientSegment {
    Standard,
    Premium,
    Vip,
}

/// Incoming transaction data, before any identity is assigned
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDraft {
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<Currency>,
}

/// Incoming client data, before any identity is assigned
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientDraft {
    pub name: String,
    pub credit_score: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment: Option<ClientSegment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// A transaction with identity, as evaluated and reported
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub id: TransactionId,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub amount: Decimal,
    pub currency: Currency,
    pub client_id: ClientId,
    pub created_at: DateTime<Utc>,
}

impl TransactionRecord {
    /// Builds an ephemeral record for the pure calculation path.
    ///
    /// Nothing is persisted; the record only exists so the fact set and the
    /// calculation result have a complete transaction to refer to.
    pub fn ephemeral(draft: &TransactionDraft, client_id: ClientId) -> Self {
        Self {
            id: TransactionId::new(),
            transaction_type: draft.transaction_type,
            amount: draft.amount,
            currency: draft.currency.unwrap_or_default(),
            client_id,
            created_at: Utc::now(),
        }
    }
}

/// A client with identity, as evaluated and reported
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRecord {
    pub id: ClientId,
    pub name: String,
    pub credit_score: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment: Option<ClientSegment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl ClientRecord {
    /// Builds an ephemeral record for the pure calculation path.
    pub fn ephemeral(draft: &ClientDraft) -> Self {
        Self {
            id: ClientId::new(),
            name: draft.name.clone(),
            credit_score: draft.credit_score,
            segment: draft.segment,
            email: draft.email.clone(),
        }
    }
}

/// The immutable fact pair a rule evaluation runs against
#[derive(Debug, Clone)]
pub struct FactSet {
    pub transaction: TransactionRecord,
    pub client: ClientRecord,
}

impl FactSet {
    pub fn new(transaction: TransactionRecord, client: ClientRecord) -> Self {
        Self {
            transaction,
            client,
        }
    }

    /// Renders the transaction fact as JSON for path resolution
    pub fn transaction_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(&self.transaction)
    }

    /// Renders the client fact as JSON for path resolution
    pub fn client_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(&self.client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_facts() -> FactSet {
        let client = ClientRecord {
            id: ClientId::new(),
            name: "Acme SL".to_string(),
            credit_score: dec!(450),
            segment: Some(ClientSegment::Premium),
            email: None,
        };
        let transaction = TransactionRecord {
            id: TransactionId::new(),
            transaction_type: TransactionType::Pos,
            amount: dec!(75.00),
            currency: Currency::Eur,
            client_id: client.id,
            created_at: Utc::now(),
        };
        FactSet::new(transaction, client)
    }

    #[test]
    fn test_transaction_json_uses_wire_field_names() {
        let facts = sample_facts();
        let value = facts.transaction_value().unwrap();
        assert_eq!(value["type"], "POS");
        assert!(value.get("amount").is_some());
        assert!(value.get("createdAt").is_some());
    }

    #[test]
    fn test_client_json_uses_wire_field_names() {
        let facts = sample_facts();
        let value = facts.client_value().unwrap();
        assert!(value.get("creditScore").is_some());
        assert_eq!(value["segment"], "PREMIUM");
        // Absent optional fields are omitted, not null
        assert!(value.get("email").is_none());
    }

    #[test]
    fn test_transaction_type_wire_names() {
        let json = serde_json::to_string(&TransactionType::Ecommerce).unwrap();
        assert_eq!(json, "\"ECOMMERCE\"");
    }

    #[test]
    fn test_ephemeral_records_keep_draft_values() {
        let draft = TransactionDraft {
            transaction_type: TransactionType::Atm,
            amount: dec!(12.34),
            currency: None,
        };
        let record = TransactionRecord::ephemeral(&draft, ClientId::new());
        assert_eq!(record.amount, dec!(12.34));
        assert_eq!(record.currency, Currency::Eur);
    }
}
