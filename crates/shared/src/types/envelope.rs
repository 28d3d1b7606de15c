//! Uniform response envelope for every repository operation.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::outcome::ReadOutcome;
use crate::error::AppError;

/// `{ success, data?, error?, message?, fromFallback?, timestamp }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    /// Whether the operation succeeded.
    pub success: bool,
    /// Payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Machine-readable error code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Human-readable explanation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Set when `data` is placeholder data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_fallback: Option<bool>,
    /// RFC 3339 creation time of the response.
    pub timestamp: String,
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl<T> ApiResponse<T> {
    /// Successful response carrying `data`.
    #[must_use]
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: None,
            from_fallback: None,
            timestamp: now(),
        }
    }

    /// Successful response carrying placeholder `data`.
    #[must_use]
    pub fn degraded(data: T, reason: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: Some(reason.into()),
            from_fallback: Some(true),
            timestamp: now(),
        }
    }

    /// Failed response describing `err`.
    #[must_use]
    pub fn failure(err: &AppError) -> Self {
        Self::error(err.error_code(), err.detail())
    }

    /// Failed response with an explicit error code.
    #[must_use]
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(code.into()),
            message: Some(message.into()),
            from_fallback: None,
            timestamp: now(),
        }
    }
}

impl<T> From<ReadOutcome<T>> for ApiResponse<T> {
    fn from(outcome: ReadOutcome<T>) -> Self {
        match outcome {
            ReadOutcome::Fresh(data) => Self::ok(data),
            ReadOutcome::Degraded { data, reason } => Self::degraded(data, reason),
            ReadOutcome::Failed(err) => Self::failure(&err),
        }
    }
}
