//! Supplier routes.

use axum::{
    Router,
    extract::State,
    response::Response,
    routing::{get, post},
};
use serde::Deserialize;
use uuid::Uuid;

use docledger_core::ledger::SupplierInput;
use docledger_db::repositories::SupplierFilter;

use super::page_request;
use crate::{AppState, extractors::{ApiJson, ApiPath, ApiQuery, CurrentActor}, response};

/// Creates the supplier routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/suppliers", get(list_suppliers).post(create_supplier))
        .route("/suppliers/{id}", get(get_supplier))
        .route("/suppliers/{id}/activate", post(activate_supplier))
        .route("/suppliers/{id}/deactivate", post(deactivate_supplier))
}

/// Query parameters for listing suppliers.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSuppliersQuery {
    /// Only active suppliers.
    #[serde(default)]
    pub active_only: bool,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Page size (max 100).
    pub limit: Option<u32>,
}

/// GET `/suppliers`
async fn list_suppliers(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListSuppliersQuery>,
) -> Response {
    let filter = SupplierFilter {
        active_only: query.active_only,
    };
    let page = page_request(query.page, query.limit);
    response::read(state.repos.suppliers.list(filter, page).await)
}

/// GET `/suppliers/{id}`
async fn get_supplier(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> Response {
    response::read(state.repos.suppliers.get(id).await)
}

/// POST `/suppliers`
async fn create_supplier(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    ApiJson(payload): ApiJson<SupplierInput>,
) -> Response {
    response::created(state.repos.suppliers.create(&actor, &payload).await)
}

/// POST `/suppliers/{id}/activate`
async fn activate_supplier(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    ApiPath(id): ApiPath<Uuid>,
) -> Response {
    response::updated(state.repos.suppliers.set_active(&actor, id, true).await)
}

/// POST `/suppliers/{id}/deactivate`
async fn deactivate_supplier(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    ApiPath(id): ApiPath<Uuid>,
) -> Response {
    response::updated(state.repos.suppliers.set_active(&actor, id, false).await)
}
