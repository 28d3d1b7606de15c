//! Document kinds handled by the ledger.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kinds of multi-line documents the ledger creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Balanced debit/credit entry.
    JournalEntry,
    /// Order placed with a supplier.
    PurchaseOrder,
    /// Generic financial transaction awaiting approval.
    FinancialTransaction,
}

impl DocumentKind {
    /// Returns the numbering series prefix for this kind.
    #[must_use]
    pub const fn series(self) -> &'static str {
        match self {
            Self::JournalEntry => "JE",
            Self::PurchaseOrder => "PO",
            Self::FinancialTransaction => "TXN",
        }
    }

    /// Returns a human-readable label used in messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::JournalEntry => "journal entry",
            Self::PurchaseOrder => "purchase order",
            Self::FinancialTransaction => "financial transaction",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
