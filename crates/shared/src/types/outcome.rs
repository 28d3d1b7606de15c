//! Provenance-tagged result of a read.

use crate::error::AppError;

/// Result of a read that may have been served from fallback data.
///
/// Only the read path produces this type; writes return `AppResult` so a
/// degraded value can never stand in for persisted state.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadOutcome<T> {
    /// Authoritative data from the store.
    Fresh(T),
    /// Placeholder with the same shape as real data.
    Degraded {
        /// The placeholder value.
        data: T,
        /// Why the store could not answer.
        reason: String,
    },
    /// The read failed for a reason a fallback cannot cover.
    Failed(AppError),
}

impl<T> ReadOutcome<T> {
    /// Returns true if the data came from the fallback.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }

    /// Returns the data regardless of provenance.
    ///
    /// # Errors
    ///
    /// Returns the error of a `Failed` outcome.
    pub fn into_data(self) -> Result<T, AppError> {
        match self {
            Self::Fresh(data) | Self::Degraded { data, .. } => Ok(data),
            Self::Failed(err) => Err(err),
        }
    }
}
