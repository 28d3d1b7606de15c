//! Lifecycle statuses of each document kind.
//!
//! Statuses are persisted as their upper-case names (`DRAFT`, `POSTED`, ...).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Common behaviour of the per-document status enums.
pub trait DocumentStatus: Copy + Eq + fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// Status a newly created document starts in.
    const INITIAL: Self;

    /// Returns the persisted representation.
    fn as_str(self) -> &'static str;

    /// Parses a persisted status, case-insensitively.
    fn parse(s: &str) -> Option<Self>;

    /// Returns true if no transition leaves this status.
    fn is_terminal(self) -> bool;
}

/// Journal entry status: `DRAFT → POSTED → REVERSED`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JournalEntryStatus {
    /// Entry is being prepared.
    Draft,
    /// Entry is recorded in the ledger.
    Posted,
    /// Entry has been cancelled out by a reversing entry.
    Reversed,
}

impl DocumentStatus for JournalEntryStatus {
    const INITIAL: Self = Self::Draft;

    fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Posted => "POSTED",
            Self::Reversed => "REVERSED",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "DRAFT" => Some(Self::Draft),
            "POSTED" => Some(Self::Posted),
            "REVERSED" => Some(Self::Reversed),
            _ => None,
        }
    }

    fn is_terminal(self) -> bool {
        matches!(self, Self::Reversed)
    }
}

/// Purchase order status.
///
/// `DRAFT → PENDING → APPROVED → RECEIVED`, and `DRAFT | PENDING → CANCELLED`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PurchaseOrderStatus {
    /// Order is being prepared.
    Draft,
    /// Order awaits approval.
    Pending,
    /// Order may be sent to the supplier.
    Approved,
    /// Goods have arrived.
    Received,
    /// Order was withdrawn.
    Cancelled,
}

impl DocumentStatus for PurchaseOrderStatus {
    const INITIAL: Self = Self::Draft;

    fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Received => "RECEIVED",
            Self::Cancelled => "CANCELLED",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "DRAFT" => Some(Self::Draft),
            "PENDING" => Some(Self::Pending),
            "APPROVED" => Some(Self::Approved),
            "RECEIVED" => Some(Self::Received),
            "CANCELLED" => Some(Self::Cancelled),
            _ => None,
        }
    }

    fn is_terminal(self) -> bool {
        matches!(self, Self::Received | Self::Cancelled)
    }
}

/// Financial transaction status: `PENDING → APPROVED | REJECTED`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FinancialTransactionStatus {
    /// Awaiting a decision.
    Pending,
    /// Accepted.
    Approved,
    /// Declined with a reason.
    Rejected,
}

impl DocumentStatus for FinancialTransactionStatus {
    const INITIAL: Self = Self::Pending;

    fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "PENDING" => Some(Self::Pending),
            "APPROVED" => Some(Self::Approved),
            "REJECTED" => Some(Self::Rejected),
            _ => None,
        }
    }

    fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for JournalEntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for PurchaseOrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for FinancialTransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
