//! Status transitions of each document lifecycle.
//!
//! A transition names the statuses it may start from and the status it ends
//! in. Storage applies it as a single conditional update, so the `from` set is
//! both the rule and the write predicate.

use std::fmt;

use crate::document::DocumentKind;
use crate::workflow::error::WorkflowError;
use crate::workflow::policy::Action;
use crate::workflow::types::{
    DocumentStatus, FinancialTransactionStatus, JournalEntryStatus, PurchaseOrderStatus,
};

/// A guarded status change.
pub trait Transition: Copy + fmt::Debug + Send + Sync + 'static {
    /// Status type of the document.
    type Status: DocumentStatus;

    /// Kind of document this transition applies to.
    const KIND: DocumentKind;

    /// Verb used in messages, e.g. `approve`.
    fn verb(self) -> &'static str;

    /// Statuses the transition may start from.
    fn from_statuses(self) -> &'static [Self::Status];

    /// Status the transition ends in.
    fn to_status(self) -> Self::Status;

    /// Policy action gating the transition.
    fn action(self) -> Action;

    /// Returns true if the transition needs a non-blank reason.
    fn requires_reason(self) -> bool {
        false
    }
}

/// Journal entry transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JournalEntryTransition {
    /// `DRAFT → POSTED`.
    Post,
    /// `POSTED → REVERSED`.
    Reverse,
}

impl Transition for JournalEntryTransition {
    type Status = JournalEntryStatus;
    const KIND: DocumentKind = DocumentKind::JournalEntry;

    fn verb(self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::Reverse => "reverse",
        }
    }

    fn from_statuses(self) -> &'static [JournalEntryStatus] {
        match self {
            Self::Post => &[JournalEntryStatus::Draft],
            Self::Reverse => &[JournalEntryStatus::Posted],
        }
    }

    fn to_status(self) -> JournalEntryStatus {
        match self {
            Self::Post => JournalEntryStatus::Posted,
            Self::Reverse => JournalEntryStatus::Reversed,
        }
    }

    fn action(self) -> Action {
        match self {
            Self::Post => Action::PostJournalEntry,
            Self::Reverse => Action::ReverseJournalEntry,
        }
    }

    fn requires_reason(self) -> bool {
        matches!(self, Self::Reverse)
    }
}

/// Purchase order transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseOrderTransition {
    /// `DRAFT → PENDING`.
    Submit,
    /// `PENDING → APPROVED`.
    Approve,
    /// `APPROVED → RECEIVED`.
    Receive,
    /// `DRAFT | PENDING → CANCELLED`.
    Cancel,
}

impl Transition for PurchaseOrderTransition {
    type Status = PurchaseOrderStatus;
    const KIND: DocumentKind = DocumentKind::PurchaseOrder;

    fn verb(self) -> &'static str {
        match self {
            Self::Submit => "submit",
            Self::Approve => "approve",
            Self::Receive => "receive",
            Self::Cancel => "cancel",
        }
    }

    fn from_statuses(self) -> &'static [PurchaseOrderStatus] {
        match self {
            Self::Submit => &[PurchaseOrderStatus::Draft],
            Self::Approve => &[PurchaseOrderStatus::Pending],
            Self::Receive => &[PurchaseOrderStatus::Approved],
            Self::Cancel => &[PurchaseOrderStatus::Draft, PurchaseOrderStatus::Pending],
        }
    }

    fn to_status(self) -> PurchaseOrderStatus {
        match self {
            Self::Submit => PurchaseOrderStatus::Pending,
            Self::Approve => PurchaseOrderStatus::Approved,
            Self::Receive => PurchaseOrderStatus::Received,
            Self::Cancel => PurchaseOrderStatus::Cancelled,
        }
    }

    fn action(self) -> Action {
        match self {
            Self::Submit => Action::SubmitPurchaseOrder,
            Self::Approve => Action::ApprovePurchaseOrder,
            Self::Receive => Action::ReceivePurchaseOrder,
            Self::Cancel => Action::CancelPurchaseOrder,
        }
    }
}

/// Financial transaction transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinancialTransactionTransition {
    /// `PENDING → APPROVED`.
    Approve,
    /// `PENDING → REJECTED`.
    Reject,
}

impl Transition for FinancialTransactionTransition {
    type Status = FinancialTransactionStatus;
    const KIND: DocumentKind = DocumentKind::FinancialTransaction;

    fn verb(self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
        }
    }

    fn from_statuses(self) -> &'static [FinancialTransactionStatus] {
        &[FinancialTransactionStatus::Pending]
    }

    fn to_status(self) -> FinancialTransactionStatus {
        match self {
            Self::Approve => FinancialTransactionStatus::Approved,
            Self::Reject => FinancialTransactionStatus::Rejected,
        }
    }

    fn action(self) -> Action {
        match self {
            Self::Approve => Action::ApproveFinancialTransaction,
            Self::Reject => Action::RejectFinancialTransaction,
        }
    }

    fn requires_reason(self) -> bool {
        matches!(self, Self::Reject)
    }
}

/// Stateless service for lifecycle checks.
pub struct WorkflowService;

impl WorkflowService {
    /// Checks `transition` against the `current` status and returns the target.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::NotEligible` if `current` is not a start status.
    pub fn check<T: Transition>(
        transition: T,
        number: &str,
        current: T::Status,
    ) -> Result<T::Status, WorkflowError> {
        if transition.from_statuses().contains(&current) {
            Ok(transition.to_status())
        } else {
            Err(Self::not_eligible(transition, number, current.as_str()))
        }
    }

    /// Builds the error for a document found in `current` status.
    #[must_use]
    pub fn not_eligible<T: Transition>(transition: T, number: &str, current: &str) -> WorkflowError {
        let required = transition
            .from_statuses()
            .iter()
            .map(|status| status.as_str())
            .collect::<Vec<_>>()
            .join(" or ");
        WorkflowError::NotEligible {
            action: transition.verb(),
            document: T::KIND.label(),
            number: number.to_string(),
            current: current.to_string(),
            required,
        }
    }

    /// Returns the trimmed reason, enforcing it where the transition needs one.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::ReasonRequired` if a required reason is blank.
    pub fn reason<T: Transition>(
        transition: T,
        reason: Option<&str>,
    ) -> Result<Option<String>, WorkflowError> {
        let reason = reason.map(str::trim).filter(|r| !r.is_empty());
        if reason.is_none() && transition.requires_reason() {
            return Err(WorkflowError::ReasonRequired(transition.verb()));
        }
        Ok(reason.map(str::to_string))
    }
}
