//! Property-based tests for document invariants.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::types::{JournalLineInput, PurchaseOrderLineInput};
use super::validation::{
    compute_totals, validate_balance, ValidationError, AMOUNT_LIMIT, BALANCE_TOLERANCE,
};

/// Strategy to generate a positive amount from 0.01 to 1,000,000.00.
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate a tax rate from 0.00 to 1.00.
fn tax_rate() -> impl Strategy<Value = Decimal> {
    (0i64..=100i64).prop_map(|pct| Decimal::new(pct, 2))
}

fn debit(amount: Decimal) -> JournalLineInput {
    JournalLineInput {
        account_code: "1000".to_string(),
        debit: amount,
        credit: Decimal::ZERO,
        description: None,
    }
}

fn credit(amount: Decimal) -> JournalLineInput {
    JournalLineInput {
        account_code: "2000".to_string(),
        debit: Decimal::ZERO,
        credit: amount,
        description: None,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // =========================================================================
    // Balance invariant
    // =========================================================================

    /// Mirrored debit and credit lines always balance.
    #[test]
    fn prop_mirrored_lines_balance(amounts in prop::collection::vec(positive_amount(), 1..10)) {
        let mut lines: Vec<JournalLineInput> = amounts.iter().copied().map(debit).collect();
        lines.extend(amounts.iter().copied().map(credit));

        let totals = validate_balance(&lines);
        prop_assert!(totals.is_ok());
        let totals = totals.unwrap();
        prop_assert_eq!(totals.total_debit, totals.total_credit);
    }

    /// Any difference above the tolerance is rejected and reported.
    #[test]
    fn prop_difference_above_tolerance_rejected(
        amount in positive_amount(),
        extra_cents in 2i64..1_000_000i64,
    ) {
        let extra = Decimal::new(extra_cents, 2);
        let lines = vec![debit(amount + extra), credit(amount)];

        let result = validate_balance(&lines);
        match result {
            Err(ValidationError::Unbalanced { difference, .. }) => {
                prop_assert!(difference > BALANCE_TOLERANCE);
                prop_assert_eq!(difference, extra);
            }
            other => prop_assert!(false, "expected Unbalanced, got {:?}", other),
        }
    }

    // =========================================================================
    // Derived totals
    // =========================================================================

    /// Totals follow subtotal = Σ qty×price, tax = subtotal×rate, total = subtotal+tax−discount.
    #[test]
    fn prop_totals_are_derived(
        items in prop::collection::vec((1i64..1_000i64, positive_amount()), 1..8),
        rate in tax_rate(),
        discount_cents in 0i64..10_000i64,
    ) {
        let lines: Vec<PurchaseOrderLineInput> = items
            .iter()
            .map(|(qty, price)| PurchaseOrderLineInput {
                product_code: None,
                description: "Item".to_string(),
                quantity: Decimal::from(*qty),
                unit_price: *price,
            })
            .collect();
        let discount = Decimal::new(discount_cents, 2);

        let totals = compute_totals(&lines, rate, discount).unwrap();

        let expected_subtotal: Decimal = items
            .iter()
            .map(|(qty, price)| Decimal::from(*qty) * *price)
            .sum();
        prop_assert_eq!(totals.subtotal, expected_subtotal);
        prop_assert_eq!(totals.tax, expected_subtotal * rate);
        prop_assert_eq!(totals.total, totals.subtotal + totals.tax - discount);
    }

    // =========================================================================
    // Money range
    // =========================================================================

    /// Oversized amounts are reported, never summed past the decimal range.
    #[test]
    fn prop_oversized_debits_rejected(
        count in 2usize..6,
        huge in prop_oneof![
            Just(Decimal::MAX),
            (1i64..1_000i64).prop_map(|n| AMOUNT_LIMIT * Decimal::from(n)),
        ],
    ) {
        let lines: Vec<JournalLineInput> = (0..count).map(|_| debit(huge)).collect();

        prop_assert_eq!(
            validate_balance(&lines),
            Err(ValidationError::AmountOutOfRange("total debit"))
        );
    }
}
