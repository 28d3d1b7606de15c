//! Envelope rendering.
//!
//! Reads answer 200 even when degraded; writes answer with the status of
//! their error.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use docledger_shared::types::{ApiResponse, ReadOutcome};
use docledger_shared::{AppError, AppResult};

fn status(err: &AppError) -> StatusCode {
    StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

fn failure(err: &AppError) -> Response {
    (status(err), Json(ApiResponse::<()>::failure(err))).into_response()
}

/// Renders a read, degraded or not.
pub fn read<T: Serialize>(outcome: ReadOutcome<T>) -> Response {
    match outcome {
        ReadOutcome::Failed(err) => failure(&err),
        outcome => (StatusCode::OK, Json(ApiResponse::from(outcome))).into_response(),
    }
}

/// Renders a write with `success` as the status on success.
pub fn write<T: Serialize>(result: AppResult<T>, success: StatusCode) -> Response {
    match result {
        Ok(data) => (success, Json(ApiResponse::ok(data))).into_response(),
        Err(err) => {
            if err.is_storage() {
                error!(error = %err, "write failed in storage");
            }
            failure(&err)
        }
    }
}

/// Renders a creation.
pub fn created<T: Serialize>(result: AppResult<T>) -> Response {
    write(result, StatusCode::CREATED)
}

/// Renders a transition or update.
pub fn updated<T: Serialize>(result: AppResult<T>) -> Response {
    write(result, StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(AppError::Validation("v".into()), StatusCode::BAD_REQUEST)]
    #[case(AppError::Forbidden("f".into()), StatusCode::FORBIDDEN)]
    #[case(AppError::NotFound("n".into()), StatusCode::NOT_FOUND)]
    #[case(AppError::NotEligible("e".into()), StatusCode::CONFLICT)]
    #[case(AppError::StorageUnavailable("u".into()), StatusCode::SERVICE_UNAVAILABLE)]
    #[case(AppError::StorageTimeout("t".into()), StatusCode::GATEWAY_TIMEOUT)]
    #[case(AppError::Database("d".into()), StatusCode::INTERNAL_SERVER_ERROR)]
    fn test_write_error_status(#[case] err: AppError, #[case] expected: StatusCode) {
        let response = updated::<()>(Err(err));
        assert_eq!(response.status(), expected);
    }

    #[test]
    fn test_degraded_read_is_ok() {
        let response = read(ReadOutcome::Degraded {
            data: Vec::<u8>::new(),
            reason: "down".to_string(),
        });
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_failed_read_uses_error_status() {
        let response = read::<()>(ReadOutcome::Failed(AppError::NotFound("x".into())));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_created_status() {
        assert_eq!(created(Ok(1)).status(), StatusCode::CREATED);
    }
}
