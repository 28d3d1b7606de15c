//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
///
/// `Validation`, `NotEligible`, `NotFound` and `Forbidden` are caller-side
/// problems. The storage variants describe the store itself: reads absorb them
/// into a fallback, writes propagate them unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    /// A domain invariant was violated before any write.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A guarded transition did not match the document's current state.
    #[error("Not eligible: {0}")]
    NotEligible(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The role policy denied the action.
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// The store did not answer in time.
    #[error("Storage timeout: {0}")]
    StorageTimeout(String),

    /// The store could not be reached.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// The store rejected or failed the statement.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::NotEligible(_) => 409,
            Self::StorageUnavailable(_) => 503,
            Self::StorageTimeout(_) => 504,
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotEligible(_) => "NOT_ELIGIBLE",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::StorageTimeout(_) => "STORAGE_TIMEOUT",
            Self::StorageUnavailable(_) => "STORAGE_UNAVAILABLE",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true if the error originates in the store rather than the request.
    #[must_use]
    pub const fn is_storage(&self) -> bool {
        matches!(
            self,
            Self::StorageTimeout(_) | Self::StorageUnavailable(_) | Self::Database(_)
        )
    }

    /// Returns the message without the category prefix.
    #[must_use]
    pub fn detail(&self) -> &str {
        match self {
            Self::Validation(msg)
            | Self::NotEligible(msg)
            | Self::NotFound(msg)
            | Self::Forbidden(msg)
            | Self::StorageTimeout(msg)
            | Self::StorageUnavailable(msg)
            | Self::Database(msg)
            | Self::Internal(msg) => msg,
        }
    }
}
