//! Liveness endpoint.

use axum::{Json, Router, routing::get};
use serde::Serialize;

use docledger_shared::types::ApiResponse;

use crate::AppState;

/// Liveness payload.
#[derive(Debug, Serialize)]
pub struct Health {
    /// Always `"ok"` while the process serves requests.
    pub status: &'static str,
    /// Crate version.
    pub version: &'static str,
}

/// The store is not consulted.
async fn health() -> Json<ApiResponse<Health>> {
    Json(ApiResponse::ok(Health {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    }))
}

/// Creates the health route.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
