//! API route definitions.

use axum::Router;
use serde::Deserialize;

use docledger_shared::types::PageRequest;

use crate::{AppState, extractors::ApiJson};

pub mod financial_transactions;
pub mod health;
pub mod journal_entries;
pub mod purchase_orders;
pub mod suppliers;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(journal_entries::routes())
        .merge(purchase_orders::routes())
        .merge(financial_transactions::routes())
        .merge(suppliers::routes())
}

/// Page parameters shared by every list query.
fn page_request(page: Option<u32>, limit: Option<u32>) -> PageRequest {
    let defaults = PageRequest::default();
    PageRequest::new(page.unwrap_or(defaults.page), limit.unwrap_or(defaults.limit))
}

/// Body of transitions that take a reason.
#[derive(Debug, Default, Deserialize)]
pub struct ReasonRequest {
    /// Why the transition is made.
    #[serde(default)]
    pub reason: Option<String>,
}

/// Reason carried by an optional transition body.
fn transition_reason(payload: Option<ApiJson<ReasonRequest>>) -> Option<String> {
    payload.and_then(|ApiJson(body)| body.reason)
}
