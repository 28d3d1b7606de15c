//! Property-based tests for reversing entries.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::reversal::{ReversalInput, ReversalService};
use crate::ledger::types::JournalLineInput;
use crate::ledger::validation::validate_journal_entry;

/// Strategy to generate a positive amount from 0.01 to 1,000,000.00.
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate balanced journal lines.
fn balanced_lines() -> impl Strategy<Value = Vec<JournalLineInput>> {
    prop::collection::vec(positive_amount(), 1..6).prop_map(|amounts| {
        let mut lines: Vec<JournalLineInput> = amounts
            .iter()
            .enumerate()
            .map(|(i, amount)| JournalLineInput {
                account_code: format!("6{i:03}"),
                debit: *amount,
                credit: Decimal::ZERO,
                description: None,
            })
            .collect();
        let total: Decimal = amounts.iter().sum();
        lines.push(JournalLineInput {
            account_code: "1100".to_string(),
            debit: Decimal::ZERO,
            credit: total,
            description: None,
        });
        lines
    })
}

fn reverse(lines: &[JournalLineInput]) -> Vec<JournalLineInput> {
    ReversalService::create_reversing_entry(&ReversalInput {
        original_number: "JE000001",
        original_lines: lines,
        reversal_date: NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
        reason: "test",
    })
    .lines
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A reversing entry of a balanced entry is itself a valid, balanced entry.
    #[test]
    fn prop_reversal_stays_balanced(lines in balanced_lines()) {
        let reversal = ReversalService::create_reversing_entry(&ReversalInput {
            original_number: "JE000001",
            original_lines: &lines,
            reversal_date: NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
            reason: "test",
        });
        let totals = validate_journal_entry(&reversal);
        prop_assert!(totals.is_ok(), "{:?}", totals);
    }

    /// Per account, original plus reversal nets to zero.
    #[test]
    fn prop_reversal_nets_to_zero(lines in balanced_lines()) {
        let reversed = reverse(&lines);
        prop_assert_eq!(reversed.len(), lines.len());
        for (original, mirror) in lines.iter().zip(&reversed) {
            prop_assert_eq!(&original.account_code, &mirror.account_code);
            prop_assert_eq!(original.debit - original.credit + mirror.debit - mirror.credit, Decimal::ZERO);
        }
    }

    /// Reversing twice restores the original amounts.
    #[test]
    fn prop_double_reversal_restores_amounts(lines in balanced_lines()) {
        let twice = reverse(&reverse(&lines));
        for (original, restored) in lines.iter().zip(&twice) {
            prop_assert_eq!(original.debit, restored.debit);
            prop_assert_eq!(original.credit, restored.credit);
        }
    }
}
