//! Role policy for document actions.
//!
//! Every creation and transition is checked against one table of
//! `(action, minimum role, precondition)` rules before anything is written.
//! An action without a rule is denied.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::workflow::error::WorkflowError;

/// Caller role, ordered from lowest to highest privilege.
///
/// Higher roles can perform all actions of lower roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Read-only access.
    Viewer = 0,
    /// Creates operational documents.
    Staff = 1,
    /// Keeps the books.
    Accountant = 2,
    /// Approves and reverses.
    Manager = 3,
    /// Full access.
    Admin = 4,
}

impl Role {
    /// Parse a role from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "viewer" => Some(Self::Viewer),
            "staff" => Some(Self::Staff),
            "accountant" => Some(Self::Accountant),
            "manager" => Some(Self::Manager),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Viewer => "viewer",
            Self::Staff => "staff",
            Self::Accountant => "accountant",
            Self::Manager => "manager",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who is performing an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    /// User identifier, recorded in `created_by` / `approved_by` columns.
    pub id: Uuid,
    /// Role resolved upstream.
    pub role: Role,
}

impl Actor {
    /// Creates an actor.
    #[must_use]
    pub const fn new(id: Uuid, role: Role) -> Self {
        Self { id, role }
    }
}

/// Actions gated by the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Create a journal entry.
    CreateJournalEntry,
    /// Post a draft journal entry.
    PostJournalEntry,
    /// Reverse a posted journal entry.
    ReverseJournalEntry,
    /// Create a purchase order.
    CreatePurchaseOrder,
    /// Submit a draft purchase order for approval.
    SubmitPurchaseOrder,
    /// Approve a pending purchase order.
    ApprovePurchaseOrder,
    /// Mark an approved purchase order as received.
    ReceivePurchaseOrder,
    /// Cancel a draft or pending purchase order.
    CancelPurchaseOrder,
    /// Create a financial transaction.
    CreateFinancialTransaction,
    /// Approve a pending financial transaction.
    ApproveFinancialTransaction,
    /// Reject a pending financial transaction.
    RejectFinancialTransaction,
    /// Create suppliers or change whether they are active.
    ManageSuppliers,
}

impl Action {
    /// Returns a short description used in messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreateJournalEntry => "create journal entries",
            Self::PostJournalEntry => "post journal entries",
            Self::ReverseJournalEntry => "reverse journal entries",
            Self::CreatePurchaseOrder => "create purchase orders",
            Self::SubmitPurchaseOrder => "submit purchase orders",
            Self::ApprovePurchaseOrder => "approve purchase orders",
            Self::ReceivePurchaseOrder => "receive purchase orders",
            Self::CancelPurchaseOrder => "cancel purchase orders",
            Self::CreateFinancialTransaction => "create financial transactions",
            Self::ApproveFinancialTransaction => "approve financial transactions",
            Self::RejectFinancialTransaction => "reject financial transactions",
            Self::ManageSuppliers => "manage suppliers",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extra condition a rule places on the actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    /// No extra condition.
    Always,
    /// The actor must not be the document's creator.
    NotCreator,
}

/// One row of the policy table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyRule {
    /// Gated action.
    pub action: Action,
    /// Lowest role allowed to perform it.
    pub min_role: Role,
    /// Extra condition.
    pub precondition: Precondition,
}

impl PolicyRule {
    /// Creates a rule.
    #[must_use]
    pub const fn new(action: Action, min_role: Role, precondition: Precondition) -> Self {
        Self {
            action,
            min_role,
            precondition,
        }
    }
}

/// Default policy table.
pub const DEFAULT_RULES: &[PolicyRule] = &[
    PolicyRule::new(Action::CreateJournalEntry, Role::Accountant, Precondition::Always),
    PolicyRule::new(Action::PostJournalEntry, Role::Accountant, Precondition::Always),
    PolicyRule::new(Action::ReverseJournalEntry, Role::Manager, Precondition::Always),
    PolicyRule::new(Action::CreatePurchaseOrder, Role::Staff, Precondition::Always),
    PolicyRule::new(Action::SubmitPurchaseOrder, Role::Staff, Precondition::Always),
    PolicyRule::new(Action::ApprovePurchaseOrder, Role::Manager, Precondition::NotCreator),
    PolicyRule::new(Action::ReceivePurchaseOrder, Role::Staff, Precondition::Always),
    PolicyRule::new(Action::CancelPurchaseOrder, Role::Manager, Precondition::Always),
    PolicyRule::new(Action::CreateFinancialTransaction, Role::Staff, Precondition::Always),
    PolicyRule::new(
        Action::ApproveFinancialTransaction,
        Role::Manager,
        Precondition::NotCreator,
    ),
    PolicyRule::new(
        Action::RejectFinancialTransaction,
        Role::Manager,
        Precondition::NotCreator,
    ),
    PolicyRule::new(Action::ManageSuppliers, Role::Manager, Precondition::Always),
];

/// Policy table evaluated before every write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    rules: Vec<PolicyRule>,
}

impl Default for Policy {
    fn default() -> Self {
        Self::new(DEFAULT_RULES.to_vec())
    }
}

impl Policy {
    /// Creates a policy from an explicit rule table.
    #[must_use]
    pub const fn new(rules: Vec<PolicyRule>) -> Self {
        Self { rules }
    }

    /// Returns the rule for `action`, if any.
    #[must_use]
    pub fn rule_for(&self, action: Action) -> Option<&PolicyRule> {
        self.rules.iter().find(|rule| rule.action == action)
    }

    /// Checks whether `actor` may perform `action`.
    ///
    /// `created_by` is the creator of the document acted on, or `None` for
    /// creations.
    ///
    /// # Errors
    ///
    /// Returns `NoRule`, `InsufficientRole` or `CreatorCannotAct`.
    pub fn authorize(
        &self,
        actor: &Actor,
        action: Action,
        created_by: Option<Uuid>,
    ) -> Result<(), WorkflowError> {
        let rule = self.rule_for(action).ok_or(WorkflowError::NoRule(action))?;

        if actor.role < rule.min_role {
            return Err(WorkflowError::InsufficientRole {
                role: actor.role,
                action,
                required: rule.min_role,
            });
        }

        match rule.precondition {
            Precondition::Always => Ok(()),
            Precondition::NotCreator if created_by == Some(actor.id) => {
                Err(WorkflowError::CreatorCannotAct(action))
            }
            Precondition::NotCreator => Ok(()),
        }
    }
}
