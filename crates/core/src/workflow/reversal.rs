//! Reversing entries for posted journal entries.
//!
//! A reversal is a new journal entry whose lines mirror the original: every
//! debit becomes a credit of the same amount on the same account and vice
//! versa. Both entries stay in the ledger.

use chrono::NaiveDate;

use crate::ledger::types::{JournalEntryInput, JournalLineInput};

/// Input for creating a reversing entry.
#[derive(Debug, Clone)]
pub struct ReversalInput<'a> {
    /// Number of the entry being reversed.
    pub original_number: &'a str,
    /// Lines of the entry being reversed, in line order.
    pub original_lines: &'a [JournalLineInput],
    /// Accounting date of the reversing entry.
    pub reversal_date: NaiveDate,
    /// Why the entry is reversed.
    pub reason: &'a str,
}

/// Stateless service for creating reversing entries.
pub struct ReversalService;

impl ReversalService {
    /// Create the reversing entry by swapping debits and credits.
    ///
    /// Line order and accounts are preserved. Line memos are prefixed with
    /// "Reversal: ".
    #[must_use]
    pub fn create_reversing_entry(input: &ReversalInput<'_>) -> JournalEntryInput {
        let lines = input
            .original_lines
            .iter()
            .map(|line| JournalLineInput {
                account_code: line.account_code.clone(),
                debit: line.credit,
                credit: line.debit,
                description: Some(format!(
                    "Reversal: {}",
                    line.description.clone().unwrap_or_default()
                )),
            })
            .collect();

        JournalEntryInput {
            entry_date: input.reversal_date,
            description: format!(
                "Reversal of {}. Reason: {}",
                input.original_number, input.reason
            ),
            reference: Some(input.original_number.to_string()),
            lines,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn line(account: &str, debit: Decimal, credit: Decimal) -> JournalLineInput {
        JournalLineInput {
            account_code: account.to_string(),
            debit,
            credit,
            description: Some("Rent".to_string()),
        }
    }

    #[test]
    fn test_reversal_swaps_sides() {
        let original = vec![
            line("6100", dec!(100000), Decimal::ZERO),
            line("1100", Decimal::ZERO, dec!(100000)),
        ];
        let reversal = ReversalService::create_reversing_entry(&ReversalInput {
            original_number: "JE000001",
            original_lines: &original,
            reversal_date: NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
            reason: "Duplicate booking",
        });

        assert_eq!(reversal.lines.len(), 2);
        assert_eq!(reversal.lines[0].account_code, "6100");
        assert_eq!(reversal.lines[0].debit, Decimal::ZERO);
        assert_eq!(reversal.lines[0].credit, dec!(100000));
        assert_eq!(reversal.lines[1].debit, dec!(100000));
        assert_eq!(reversal.lines[1].description.as_deref(), Some("Reversal: Rent"));
        assert_eq!(reversal.reference.as_deref(), Some("JE000001"));
        assert_eq!(
            reversal.description,
            "Reversal of JE000001. Reason: Duplicate booking"
        );
    }
}
