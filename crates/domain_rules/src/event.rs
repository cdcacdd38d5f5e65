//! Fee events emitted by matched rules
//!
//! A rule's event describes how to turn a match into a monetary
//! contribution. The `feeType` discriminator selects one of a closed set of
//! formulas; an unrecognized discriminator is kept as [`FeeFormula::Unknown`]
//! so it can contribute zero with a warning at calculation time instead of
//! failing the rule (the behavior the original engine had).

use rust_decimal::Decimal;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use core_kernel::RuleId;

/// Event type emitted by fee rules
pub const CALCULATE_FEE: &str = "calculate-fee";

/// The raw event document attached to a rule
#[derive(Debug, Clone, Deserialize)]
pub struct FeeEventSpec {
    #[serde(rename = "type")]
    pub event_type: String,
    pub params: FeeParams,
}

/// Parameters of a fee event
///
/// The trace fields are injected by the engine at load time from the owning
/// rule, so every matched event can be attributed without a lookup.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeParams {
    #[serde(default)]
    pub rule_id: Option<RuleId>,
    #[serde(default)]
    pub rule_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(flatten)]
    pub formula: FeeFormula,
}

/// Amount threshold used by the `conditional` formula
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AmountCondition {
    pub field: String,
    #[serde(default)]
    pub operator: Option<String>,
    pub value: Decimal,
}

/// The closed set of fee formulas
#[derive(Debug, Clone, PartialEq)]
pub enum FeeFormula {
    /// A flat amount
    Fixed { amount: Decimal },
    /// `amount * percentage`; a negative percentage is a discount
    Percentage { percentage: Decimal },
    /// `amount * percentage + fixed_amount`, clamped to `cap` when present
    PercentagePlusFixed {
        percentage: Decimal,
        fixed_amount: Decimal,
        cap: Option<Decimal>,
    },
    /// `fixed_fee` when the amount is at or below the threshold, otherwise
    /// `amount * percentage_fee`
    Conditional {
        condition: AmountCondition,
        fixed_fee: Decimal,
        percentage_fee: Decimal,
    },
    /// Unrecognized `feeType`; contributes zero at calculation time
    Unknown { fee_type: String },
}

// Per-variant payloads. Missing numeric fields default to zero, matching
// the lenient reads of the original calculator.
#[derive(Deserialize)]
struct FixedPayload {
    #[serde(default)]
    amount: Decimal,
}

#[derive(Deserialize)]
struct PercentagePayload {
    #[serde(default)]
    percentage: Decimal,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PercentagePlusFixedPayload {
    #[serde(default)]
    percentage: Decimal,
    #[serde(default)]
    fixed_amount: Decimal,
    #[serde(default)]
    cap: Option<Decimal>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConditionalPayload {
    condition: AmountCondition,
    #[serde(default)]
    fixed_fee: Decimal,
    #[serde(default)]
    percentage_fee: Decimal,
}

impl<'de> Deserialize<'de> for FeeFormula {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        let fee_type = raw
            .get("feeType")
            .and_then(Value::as_str)
            .ok_or_else(|| D::Error::custom("missing 'feeType'"))?
            .to_string();

        match fee_type.as_str() {
            "fixed" => {
                let payload: FixedPayload =
                    serde_json::from_value(raw).map_err(D::Error::custom)?;
                Ok(FeeFormula::Fixed {
                    amount: payload.amount,
                })
            }
            "percentage" => {
                let payload: PercentagePayload =
                    serde_json::from_value(raw).map_err(D::Error::custom)?;
                Ok(FeeFormula::Percentage {
                    percentage: payload.percentage,
                })
            }
            "percentage_plus_fixed" => {
                let payload: PercentagePlusFixedPayload =
                    serde_json::from_value(raw).map_err(D::Error::custom)?;
                Ok(FeeFormula::PercentagePlusFixed {
                    percentage: payload.percentage,
                    fixed_amount: payload.fixed_amount,
                    cap: payload.cap,
                })
            }
            "conditional" => {
                let payload: ConditionalPayload =
                    serde_json::from_value(raw).map_err(D::Error::custom)?;
                Ok(FeeFormula::Conditional {
                    condition: payload.condition,
                    fixed_fee: payload.fixed_fee,
                    percentage_fee: payload.percentage_fee,
                })
            }
            _ => Ok(FeeFormula::Unknown { fee_type }),
        }
    }
}
