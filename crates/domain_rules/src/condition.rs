//! Condition tree evaluation
//!
//! A condition is either a leaf comparison against one fact field or an
//! `all`/`any` conjunction of child conditions. Trees arrive as JSON from
//! the rule repository and are validated structurally at rule-load time;
//! evaluation itself never fails. An unresolved path, a type mismatch, or an
//! unparseable timestamp simply makes the affected leaf false.

use chrono::{DateTime, Datelike, Timelike};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

use core_kernel::FactSet;

/// Which fact object a leaf condition reads from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FactRoot {
    Transaction,
    Client,
}

/// Closed set of comparison operators
///
/// An operator name outside this set fails deserialization, which surfaces
/// as a rule-compile error at load time rather than a runtime failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operator {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanInclusive,
    LessThan,
    LessThanInclusive,
    In,
    NotIn,
    /// Membership of the fact timestamp's weekday in an integer set,
    /// 0 = Sunday .. 6 = Saturday
    DayOfWeek,
    /// Half-open `[start, end)` interval over the fact timestamp's hour,
    /// given as `"HH:MM"` strings and compared by hour only
    TimeRange,
}

/// A leaf comparison: one fact field against a literal value
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Condition {
    pub fact: FactRoot,
    pub path: String,
    pub operator: Operator,
    pub value: Value,
}

/// A node of the condition tree
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionNode {
    All { all: Vec<ConditionNode> },
    Any { any: Vec<ConditionNode> },
    Leaf(Condition),
}

/// JSON renderings of the fact pair, built once per evaluation
#[derive(Debug)]
pub struct FactViews {
    transaction: Value,
    client: Value,
}

impl FactViews {
    /// Renders both fact roots from a fact set
    pub fn render(facts: &FactSet) -> Result<Self, serde_json::Error> {
        Ok(Self {
            transaction: facts.transaction_value()?,
            client: facts.client_value()?,
        })
    }

    fn root(&self, fact: FactRoot) -> &Value {
        match fact {
            FactRoot::Transaction => &self.transaction,
            FactRoot::Client => &self.client,
        }
    }
}

impl ConditionNode {
    /// Evaluates the tree against the rendered facts.
    ///
    /// `all` is true iff every child is true and short-circuits on the first
    /// false child; `any` is true iff at least one child is true. An empty
    /// `all` is vacuously true, an empty `any` false.
    pub fn evaluate(&self, facts: &FactViews) -> bool {
        match self {
            ConditionNode::All { all } => all.iter().all(|node| node.evaluate(facts)),
            ConditionNode::Any { any } => any.iter().any(|node| node.evaluate(facts)),
            ConditionNode::Leaf(condition) => condition.evaluate(facts),
        }
    }

    /// Structural validation run at rule-load time.
    ///
    /// Checks the constraints serde cannot express: membership operators
    /// need array values, `dayOfWeek` needs weekday integers, `timeRange`
    /// needs parseable `HH:MM` bounds.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            ConditionNode::All { all } => all.iter().try_for_each(ConditionNode::validate),
            ConditionNode::Any { any } => any.iter().try_for_each(ConditionNode::validate),
            ConditionNode::Leaf(condition) => condition.validate(),
        }
    }
}

impl Condition {
    fn evaluate(&self, facts: &FactViews) -> bool {
        let resolved = match resolve_path(facts.root(self.fact), &self.path) {
            Some(value) => value,
            None => return false,
        };

        match self.operator {
            Operator::Equal => json_eq(resolved, &self.value),
            Operator::NotEqual => !json_eq(resolved, &self.value),
            Operator::GreaterThan => compare(resolved, &self.value, |ord| ord.is_gt()),
            Operator::GreaterThanInclusive => compare(resolved, &self.value, |ord| ord.is_ge()),
            Operator::LessThan => compare(resolved, &self.value, |ord| ord.is_lt()),
            Operator::LessThanInclusive => compare(resolved, &self.value, |ord| ord.is_le()),
            Operator::In => membership(resolved, &self.value),
            Operator::NotIn => !membership(resolved, &self.value),
            Operator::DayOfWeek => self.day_of_week_matches(resolved),
            Operator::TimeRange => self.time_range_matches(resolved),
        }
    }

    fn validate(&self) -> Result<(), String> {
        match self.operator {
            Operator::In | Operator::NotIn => {
                if !self.value.is_array() {
                    return Err(format!(
                        "operator '{:?}' requires an array value at path '{}'",
                        self.operator, self.path
                    ));
                }
            }
            Operator::DayOfWeek => {
                let days = self
                    .value
                    .as_array()
                    .ok_or_else(|| "dayOfWeek requires an array of weekdays".to_string())?;
                for day in days {
                    match day.as_u64() {
                        Some(0..=6) => {}
                        _ => return Err(format!("invalid weekday {day} (expected 0..=6)")),
                    }
                }
            }
            Operator::TimeRange => {
                parse_time_window(&self.value)?;
            }
            _ => {}
        }
        Ok(())
    }

    fn day_of_week_matches(&self, resolved: &Value) -> bool {
        let timestamp = match parse_timestamp(resolved) {
            Some(ts) => ts,
            None => return false,
        };
        let weekday = timestamp.weekday().num_days_from_sunday() as u64;
        self.value
            .as_array()
            .map(|days| days.iter().any(|d| d.as_u64() == Some(weekday)))
            .unwrap_or(false)
    }

    fn time_range_matches(&self, resolved: &Value) -> bool {
        let timestamp = match parse_timestamp(resolved) {
            Some(ts) => ts,
            None => return false,
        };
        let (start, end) = match parse_time_window(&self.value) {
            Ok(window) => window,
            Err(_) => return false,
        };
        let hour = timestamp.hour();
        hour >= start && hour < end
    }
}

/// Resolves a dotted path against a fact root.
///
/// Accepts the repository's `$.`-prefixed paths as well as plain dotted
/// paths. A missing segment resolves to nothing, never an error.
fn resolve_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let trimmed = path.strip_prefix("$.").unwrap_or(path);
    let mut current = root;
    for segment in trimmed.split('.') {
        if segment.is_empty() {
            return None;
        }
        current = current.get(segment)?;
    }
    Some(current)
}

/// Extracts a decimal from a JSON number or numeric string.
///
/// Decimal-valued facts serialize as strings, so both forms must compare
/// as numbers.
fn decimal_of(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        Value::String(s) => Decimal::from_str(s).ok(),
        _ => None,
    }
}

/// Equality with numeric awareness: values that both read as decimals are
/// compared as decimals, everything else by JSON equality.
fn json_eq(left: &Value, right: &Value) -> bool {
    match (decimal_of(left), decimal_of(right)) {
        (Some(a), Some(b)) => a == b,
        _ => left == right,
    }
}

fn compare(left: &Value, right: &Value, check: impl Fn(std::cmp::Ordering) -> bool) -> bool {
    match (decimal_of(left), decimal_of(right)) {
        (Some(a), Some(b)) => check(a.cmp(&b)),
        _ => false,
    }
}

fn membership(needle: &Value, haystack: &Value) -> bool {
    haystack
        .as_array()
        .map(|values| values.iter().any(|candidate| json_eq(needle, candidate)))
        .unwrap_or(false)
}

fn parse_timestamp(value: &Value) -> Option<DateTime<chrono::FixedOffset>> {
    DateTime::parse_from_rfc3339(value.as_str()?).ok()
}

/// Parses a `{start: "HH:MM", end: "HH:MM"}` window into hour bounds
fn parse_time_window(value: &Value) -> Result<(u32, u32), String> {
    let start = hour_of(value.get("start"))?;
    let end = hour_of(value.get("end"))?;
    Ok((start, end))
}

fn hour_of(value: Option<&Value>) -> Result<u32, String> {
    let text = value
        .and_then(Value::as_str)
        .ok_or_else(|| "timeRange requires 'start' and 'end' as HH:MM strings".to_string())?;
    let hour_part = text
        .split(':')
        .next()
        .ok_or_else(|| format!("invalid time '{text}'"))?;
    let hour: u32 = hour_part
        .parse()
        .map_err(|_| format!("invalid hour in '{text}'"))?;
    if hour > 23 {
        return Err(format!("hour out of range in '{text}'"));
    }
    Ok(hour)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn views(transaction: Value, client: Value) -> FactViews {
        FactViews {
            transaction,
            client,
        }
    }

    fn leaf(fact: FactRoot, path: &str, operator: Operator, value: Value) -> ConditionNode {
        ConditionNode::Leaf(Condition {
            fact,
            path: path.to_string(),
            operator,
            value,
        })
    }

    #[test]
    fn test_equal_on_type() {
        let facts = views(json!({"type": "POS", "amount": 75}), json!({}));
        let node = leaf(
            FactRoot::Transaction,
            "$.type",
            Operator::Equal,
            json!("POS"),
        );
        assert!(node.evaluate(&facts));
    }

    #[test]
    fn test_numeric_comparison_against_string_amount() {
        // Decimal fact values serialize as strings
        let facts = views(json!({"amount": "250.00"}), json!({}));
        let node = leaf(
            FactRoot::Transaction,
            "amount",
            Operator::GreaterThan,
            json!(100),
        );
        assert!(node.evaluate(&facts));
    }

    #[test]
    fn test_less_than_inclusive_boundary() {
        let facts = views(json!({"amount": 100}), json!({}));
        let node = leaf(
            FactRoot::Transaction,
            "amount",
            Operator::LessThanInclusive,
            json!(100),
        );
        assert!(node.evaluate(&facts));
    }

    #[test]
    fn test_unresolved_path_is_false_not_fatal() {
        let facts = views(json!({"amount": 10}), json!({}));
        let node = leaf(
            FactRoot::Transaction,
            "$.missing.deep",
            Operator::Equal,
            json!(1),
        );
        assert!(!node.evaluate(&facts));
    }

    #[test]
    fn test_all_short_circuits_and_any_matches() {
        let facts = views(json!({"type": "POS"}), json!({"creditScore": 500}));
        let all = ConditionNode::All {
            all: vec![
                leaf(FactRoot::Transaction, "type", Operator::Equal, json!("POS")),
                leaf(
                    FactRoot::Client,
                    "creditScore",
                    Operator::GreaterThan,
                    json!(400),
                ),
            ],
        };
        assert!(all.evaluate(&facts));

        let any = ConditionNode::Any {
            any: vec![
                leaf(FactRoot::Transaction, "type", Operator::Equal, json!("ATM")),
                leaf(
                    FactRoot::Client,
                    "creditScore",
                    Operator::GreaterThan,
                    json!(400),
                ),
            ],
        };
        assert!(any.evaluate(&facts));
    }

    #[test]
    fn test_empty_conjunctions() {
        let facts = views(json!({}), json!({}));
        assert!(ConditionNode::All { all: vec![] }.evaluate(&facts));
        assert!(!ConditionNode::Any { any: vec![] }.evaluate(&facts));
    }

    #[test]
    fn test_membership_operators() {
        let facts = views(json!({"type": "ATM"}), json!({}));
        let includes = leaf(
            FactRoot::Transaction,
            "type",
            Operator::In,
            json!(["POS", "ATM"]),
        );
        assert!(includes.evaluate(&facts));

        let excludes = leaf(
            FactRoot::Transaction,
            "type",
            Operator::NotIn,
            json!(["POS", "ATM"]),
        );
        assert!(!excludes.evaluate(&facts));
    }

    #[test]
    fn test_day_of_week_membership() {
        // 2024-06-15 is a Saturday (weekday 6)
        let facts = views(json!({"createdAt": "2024-06-15T10:30:00Z"}), json!({}));
        let weekend = leaf(
            FactRoot::Transaction,
            "createdAt",
            Operator::DayOfWeek,
            json!([0, 6]),
        );
        assert!(weekend.evaluate(&facts));

        let weekdays = leaf(
            FactRoot::Transaction,
            "createdAt",
            Operator::DayOfWeek,
            json!([1, 2, 3, 4, 5]),
        );
        assert!(!weekdays.evaluate(&facts));
    }

    #[test]
    fn test_time_range_is_half_open_by_hour() {
        let in_range = views(json!({"createdAt": "2024-06-14T09:59:00Z"}), json!({}));
        let at_end = views(json!({"createdAt": "2024-06-14T17:00:00Z"}), json!({}));
        let node = leaf(
            FactRoot::Transaction,
            "createdAt",
            Operator::TimeRange,
            json!({"start": "09:00", "end": "17:00"}),
        );
        assert!(node.evaluate(&in_range));
        assert!(!node.evaluate(&at_end));
    }

    #[test]
    fn test_missing_timestamp_is_false() {
        let facts = views(json!({"createdAt": "not-a-date"}), json!({}));
        let node = leaf(
            FactRoot::Transaction,
            "createdAt",
            Operator::DayOfWeek,
            json!([1]),
        );
        assert!(!node.evaluate(&facts));
    }

    #[test]
    fn test_unknown_operator_fails_deserialization() {
        let raw = json!({
            "fact": "transaction",
            "path": "$.amount",
            "operator": "approximately",
            "value": 10
        });
        assert!(serde_json::from_value::<ConditionNode>(raw).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_time_window() {
        let node = leaf(
            FactRoot::Transaction,
            "createdAt",
            Operator::TimeRange,
            json!({"start": "25:00", "end": "17:00"}),
        );
        assert!(node.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_weekday() {
        let node = leaf(
            FactRoot::Transaction,
            "createdAt",
            Operator::DayOfWeek,
            json!([7]),
        );
        assert!(node.validate().is_err());
    }

    #[test]
    fn test_nested_tree_deserializes() {
        let raw = json!({
            "all": [
                {"fact": "transaction", "path": "$.type", "operator": "equal", "value": "POS"},
                {"any": [
                    {"fact": "client", "path": "$.creditScore", "operator": "greaterThan", "value": 400},
                    {"fact": "transaction", "path": "$.amount", "operator": "lessThan", "value": 10}
                ]}
            ]
        });
        let node: ConditionNode = serde_json::from_value(raw).unwrap();
        assert!(node.validate().is_ok());
        let facts = views(json!({"type": "POS", "amount": 50}), json!({"creditScore": 500}));
        assert!(node.evaluate(&facts));
    }
}
