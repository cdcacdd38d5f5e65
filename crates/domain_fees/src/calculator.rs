//! Input validation and per-event fee derivation

use rust_decimal::Decimal;

use core_kernel::{ClientRecord, TransactionRecord};
use domain_rules::{FeeFormula, FeeParams};

use crate::error::FeeError;

/// Validates calculation inputs, failing fast rather than defaulting.
///
/// The typed records already guarantee the presence of a transaction, a
/// client, and a transaction type; what remains are the numeric invariants:
/// a strictly positive amount and a credit score within 0..=1000.
pub fn validate_inputs(
    transaction: &TransactionRecord,
    client: &ClientRecord,
) -> Result<(), FeeError> {
    if transaction.amount <= Decimal::ZERO {
        return Err(FeeError::InvalidAmount);
    }
    if client.credit_score < Decimal::ZERO || client.credit_score > Decimal::from(1000) {
        return Err(FeeError::InvalidCreditScore);
    }
    Ok(())
}

/// Derives one matched event's fee contribution from its formula.
///
/// Contributions are returned unrounded; the caller sums all contributions
/// and rounds the total once. An unknown fee type contributes zero and is
/// logged, never fatal.
pub fn fee_for_event(params: &FeeParams, amount: Decimal) -> Decimal {
    match &params.formula {
        FeeFormula::Fixed { amount: fixed } => *fixed,
        FeeFormula::Percentage { percentage } => amount * *percentage,
        FeeFormula::PercentagePlusFixed {
            percentage,
            fixed_amount,
            cap,
        } => {
            let fee = amount * *percentage + *fixed_amount;
            match cap {
                Some(cap) => fee.min(*cap),
                None => fee,
            }
        }
        FeeFormula::Conditional {
            condition,
            fixed_fee,
            percentage_fee,
        } => {
            if amount <= condition.value {
                *fixed_fee
            } else {
                amount * *percentage_fee
            }
        }
        FeeFormula::Unknown { fee_type } => {
            tracing::warn!(fee_type = %fee_type, "unknown fee type, contributing zero");
            Decimal::ZERO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use core_kernel::{ClientId, Currency, TransactionId, TransactionType};
    use domain_rules::AmountCondition;
    use rust_decimal_macros::dec;

    fn transaction(amount: Decimal) -> TransactionRecord {
        TransactionRecord {
            id: TransactionId::new(),
            transaction_type: TransactionType::Pos,
            amount,
            currency: Currency::Eur,
            client_id: ClientId::new(),
            created_at: Utc::now(),
        }
    }

    fn client(credit_score: Decimal) -> ClientRecord {
        ClientRecord {
            id: ClientId::new(),
            name: "Client".to_string(),
            credit_score,
            segment: None,
            email: None,
        }
    }

    fn params(formula: FeeFormula) -> FeeParams {
        FeeParams {
            rule_id: None,
            rule_name: None,
            description: None,
            formula,
        }
    }

    #[test]
    fn test_validation_rejects_non_positive_amount() {
        assert!(matches!(
            validate_inputs(&transaction(dec!(0)), &client(dec!(500))),
            Err(FeeError::InvalidAmount)
        ));
        assert!(matches!(
            validate_inputs(&transaction(dec!(-10)), &client(dec!(500))),
            Err(FeeError::InvalidAmount)
        ));
    }

    #[test]
    fn test_validation_rejects_out_of_range_credit_score() {
        assert!(matches!(
            validate_inputs(&transaction(dec!(10)), &client(dec!(-1))),
            Err(FeeError::InvalidCreditScore)
        ));
        assert!(matches!(
            validate_inputs(&transaction(dec!(10)), &client(dec!(1001))),
            Err(FeeError::InvalidCreditScore)
        ));
        assert!(validate_inputs(&transaction(dec!(10)), &client(dec!(1000))).is_ok());
    }

    #[test]
    fn test_fixed_fee() {
        let p = params(FeeFormula::Fixed { amount: dec!(0.35) });
        assert_eq!(fee_for_event(&p, dec!(500)), dec!(0.35));
    }

    #[test]
    fn test_percentage_fee_can_be_negative() {
        let p = params(FeeFormula::Percentage {
            percentage: dec!(-0.01),
        });
        assert_eq!(fee_for_event(&p, dec!(250)), dec!(-2.50));
    }

    #[test]
    fn test_percentage_plus_fixed_below_cap() {
        let p = params(FeeFormula::PercentagePlusFixed {
            percentage: dec!(0.018),
            fixed_amount: dec!(0.15),
            cap: Some(dec!(120)),
        });
        assert_eq!(fee_for_event(&p, dec!(1000)), dec!(18.15));
    }

    #[test]
    fn test_percentage_plus_fixed_clamps_to_cap() {
        let p = params(FeeFormula::PercentagePlusFixed {
            percentage: dec!(0.018),
            fixed_amount: dec!(0.15),
            cap: Some(dec!(120)),
        });
        assert_eq!(fee_for_event(&p, dec!(10000)), dec!(120));
    }

    #[test]
    fn test_percentage_plus_fixed_without_cap() {
        let p = params(FeeFormula::PercentagePlusFixed {
            percentage: dec!(0.018),
            fixed_amount: dec!(0.15),
            cap: None,
        });
        assert_eq!(fee_for_event(&p, dec!(10000)), dec!(180.15));
    }

    #[test]
    fn test_conditional_at_and_above_threshold() {
        let p = params(FeeFormula::Conditional {
            condition: AmountCondition {
                field: "amount".to_string(),
                operator: Some("lessThanInclusive".to_string()),
                value: dec!(100),
            },
            fixed_fee: dec!(0.2),
            percentage_fee: dec!(0.002),
        });
        assert_eq!(fee_for_event(&p, dec!(100)), dec!(0.2));
        assert_eq!(fee_for_event(&p, dec!(250)), dec!(0.500));
    }

    #[test]
    fn test_unknown_fee_type_contributes_zero() {
        let p = params(FeeFormula::Unknown {
            fee_type: "mystery".to_string(),
        });
        assert_eq!(fee_for_event(&p, dec!(100)), Decimal::ZERO);
    }
}
