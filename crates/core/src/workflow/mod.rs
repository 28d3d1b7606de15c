//! Document lifecycle management.
//!
//! This module implements the lifecycle state machines, the role policy
//! that gates every write, and journal entry reversals.
//!
//! # Modules
//!
//! - `types` - Status enums per document kind
//! - `error` - Workflow-specific error types
//! - `service` - Transition tables and checks
//! - `policy` - Role policy table
//! - `reversal` - Reversing entry creation

pub mod error;
pub mod policy;
pub mod reversal;
pub mod service;
pub mod types;

#[cfg(test)]
mod policy_props;
#[cfg(test)]
mod reversal_props;
#[cfg(test)]
mod service_props;

pub use error::WorkflowError;
pub use policy::{Action, Actor, Policy, PolicyRule, Precondition, Role, DEFAULT_RULES};
pub use reversal::{ReversalInput, ReversalService};
pub use service::{
    FinancialTransactionTransition, JournalEntryTransition, PurchaseOrderTransition, Transition,
    WorkflowService,
};
pub use types::{
    DocumentStatus, FinancialTransactionStatus, JournalEntryStatus, PurchaseOrderStatus,
};
