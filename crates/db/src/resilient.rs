//! Deadline-bounded reads with labeled fallback data.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use docledger_shared::{AppResult, types::ReadOutcome};

/// Runs reads against the store under a deadline.
///
/// Storage failures and deadline expiry turn into
/// [`ReadOutcome::Degraded`] carrying the caller's placeholder. Domain errors
/// such as `NotFound` stay `Failed`. On expiry the query future is dropped,
/// which cancels it and hands its pooled connection back.
#[derive(Debug, Clone, Copy)]
pub struct ResilientReader {
    deadline: Duration,
}

impl ResilientReader {
    /// Creates a reader with the given deadline.
    #[must_use]
    pub const fn new(deadline: Duration) -> Self {
        Self { deadline }
    }

    /// Runs `query`, substituting `fallback()` if the store cannot answer.
    pub async fn read<T, Q, F>(&self, label: &str, query: Q, fallback: F) -> ReadOutcome<T>
    where
        Q: Future<Output = AppResult<T>>,
        F: FnOnce() -> T,
    {
        match tokio::time::timeout(self.deadline, query).await {
            Ok(Ok(data)) => ReadOutcome::Fresh(data),
            Ok(Err(err)) if err.is_storage() => {
                warn!(read = label, error = %err, "read degraded to fallback data");
                ReadOutcome::Degraded {
                    data: fallback(),
                    reason: format!(
                        "{label} is temporarily unavailable, showing fallback data: {}",
                        err.detail()
                    ),
                }
            }
            Ok(Err(err)) => ReadOutcome::Failed(err),
            Err(_) => {
                let millis = self.deadline.as_millis();
                warn!(read = label, deadline_ms = %millis, "read timed out, using fallback data");
                ReadOutcome::Degraded {
                    data: fallback(),
                    reason: format!(
                        "{label} did not respond within {millis}ms, showing fallback data"
                    ),
                }
            }
        }
    }
}
