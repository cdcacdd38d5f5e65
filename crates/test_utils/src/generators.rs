//! Property-Based Test Generators
//!
//! Proptest strategies and fake-data helpers producing inputs that hold the
//! domain invariants (positive amounts, credit scores in range).

use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;
use proptest::prelude::*;
use rust_decimal::Decimal;

use core_kernel::{ClientDraft, TransactionDraft, TransactionType};

/// Strategy for the transaction type set
pub fn transaction_type_strategy() -> impl Strategy<Value = TransactionType> {
    prop_oneof![
        Just(TransactionType::Pos),
        Just(TransactionType::Ecommerce),
        Just(TransactionType::Transfer),
        Just(TransactionType::Atm),
        Just(TransactionType::Online),
    ]
}

/// Strategy for valid transaction amounts: positive, at most 2 decimal places
pub fn positive_amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for valid credit scores (0 to 1000 inclusive)
pub fn credit_score_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..=1000i64).prop_map(Decimal::from)
}

/// Strategy for valid transaction drafts
pub fn transaction_draft_strategy() -> impl Strategy<Value = TransactionDraft> {
    (transaction_type_strategy(), positive_amount_strategy()).prop_map(
        |(transaction_type, amount)| TransactionDraft {
            transaction_type,
            amount,
            currency: None,
        },
    )
}

/// Strategy for valid client drafts; names and emails come from fake data
pub fn client_draft_strategy() -> impl Strategy<Value = ClientDraft> {
    credit_score_strategy().prop_map(|credit_score| fake_client(credit_score))
}

/// A client draft with fake identity data and the given score
pub fn fake_client(credit_score: Decimal) -> ClientDraft {
    ClientDraft {
        name: Name().fake(),
        credit_score,
        segment: None,
        email: Some(SafeEmail().fake()),
    }
}
