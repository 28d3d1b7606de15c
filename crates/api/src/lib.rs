//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes for every document kind
//! - The acting-user extractor
//! - Envelope rendering for reads and writes

pub mod extractors;
pub mod response;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use docledger_db::Repositories;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Document repositories over the shared pool.
    pub repos: Arc<Repositories>,
}

impl AppState {
    /// Wraps the repositories for sharing across handlers.
    #[must_use]
    pub fn new(repos: Repositories) -> Self {
        Self {
            repos: Arc::new(repos),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
