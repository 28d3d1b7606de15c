//! Workflow error types for document lifecycles.
//!
//! This module defines the errors raised by status transitions and by the
//! role policy that gates them.

use thiserror::Error;

use docledger_shared::AppError;

use crate::workflow::policy::{Action, Role};

/// Errors that can occur during workflow operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    /// The document is not in a status the transition starts from.
    #[error("Cannot {action} {document} {number}: status is {current}, required {required}")]
    NotEligible {
        /// Verb of the attempted transition.
        action: &'static str,
        /// Document label.
        document: &'static str,
        /// Document number.
        number: String,
        /// Status found in storage.
        current: String,
        /// Statuses the transition accepts.
        required: String,
    },

    /// A transition that needs a reason was given none.
    #[error("A reason is required to {0}")]
    ReasonRequired(&'static str),

    /// The actor's role is below the rule's minimum.
    #[error("Role {role} cannot {action}; requires {required} or above")]
    InsufficientRole {
        /// Acting role.
        role: Role,
        /// Attempted action.
        action: Action,
        /// Minimum role of the rule.
        required: Role,
    },

    /// The actor created the document and may not also decide on it.
    #[error("Creators cannot {0} they created")]
    CreatorCannotAct(Action),

    /// No policy rule covers the action.
    #[error("No policy rule allows {0}")]
    NoRule(Action),
}

impl WorkflowError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotEligible { .. } => 409,
            Self::ReasonRequired(_) => 400,
            Self::InsufficientRole { .. } | Self::CreatorCannotAct(_) | Self::NoRule(_) => 403,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotEligible { .. } => "NOT_ELIGIBLE",
            Self::ReasonRequired(_) => "VALIDATION_ERROR",
            Self::InsufficientRole { .. } | Self::CreatorCannotAct(_) | Self::NoRule(_) => {
                "FORBIDDEN"
            }
        }
    }
}

impl From<WorkflowError> for AppError {
    fn from(err: WorkflowError) -> Self {
        let message = err.to_string();
        match err {
            WorkflowError::NotEligible { .. } => Self::NotEligible(message),
            WorkflowError::ReasonRequired(_) => Self::Validation(message),
            WorkflowError::InsufficientRole { .. }
            | WorkflowError::CreatorCannotAct(_)
            | WorkflowError::NoRule(_) => Self::Forbidden(message),
        }
    }
}
