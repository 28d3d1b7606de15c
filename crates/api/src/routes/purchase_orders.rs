//! Purchase order routes.

use axum::{
    Router,
    extract::State,
    response::Response,
    routing::{get, post},
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use docledger_core::ledger::PurchaseOrderInput;
use docledger_core::workflow::PurchaseOrderStatus;
use docledger_db::repositories::PurchaseOrderFilter;

use super::{ReasonRequest, page_request, transition_reason};
use crate::{AppState, extractors::{ApiJson, ApiPath, ApiQuery, CurrentActor}, response};

/// Creates the purchase order routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/purchase-orders", get(list_orders).post(create_order))
        .route("/purchase-orders/{id}", get(get_order))
        .route("/purchase-orders/{id}/submit", post(submit_order))
        .route("/purchase-orders/{id}/approve", post(approve_order))
        .route("/purchase-orders/{id}/receive", post(receive_order))
        .route("/purchase-orders/{id}/cancel", post(cancel_order))
}

/// Query parameters for listing purchase orders.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListOrdersQuery {
    /// Filter by status.
    pub status: Option<PurchaseOrderStatus>,
    /// Filter by supplier.
    pub supplier_id: Option<Uuid>,
    /// Orders dated on or after (YYYY-MM-DD).
    pub date_from: Option<NaiveDate>,
    /// Orders dated on or before (YYYY-MM-DD).
    pub date_to: Option<NaiveDate>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Page size (max 100).
    pub limit: Option<u32>,
}

/// GET `/purchase-orders`
async fn list_orders(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListOrdersQuery>,
) -> Response {
    let filter = PurchaseOrderFilter {
        status: query.status,
        supplier_id: query.supplier_id,
        date_from: query.date_from,
        date_to: query.date_to,
    };
    let page = page_request(query.page, query.limit);
    response::read(state.repos.purchase_orders.list(&filter, page).await)
}

/// GET `/purchase-orders/{id}`
async fn get_order(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> Response {
    response::read(state.repos.purchase_orders.get(id).await)
}

/// POST `/purchase-orders` - Totals are always computed server-side.
async fn create_order(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    ApiJson(payload): ApiJson<PurchaseOrderInput>,
) -> Response {
    response::created(state.repos.purchase_orders.create(&actor, &payload).await)
}

/// POST `/purchase-orders/{id}/submit`
async fn submit_order(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    ApiPath(id): ApiPath<Uuid>,
) -> Response {
    response::updated(state.repos.purchase_orders.submit(&actor, id).await)
}

/// POST `/purchase-orders/{id}/approve`
async fn approve_order(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    ApiPath(id): ApiPath<Uuid>,
) -> Response {
    response::updated(state.repos.purchase_orders.approve(&actor, id).await)
}

/// POST `/purchase-orders/{id}/receive`
async fn receive_order(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    ApiPath(id): ApiPath<Uuid>,
) -> Response {
    response::updated(state.repos.purchase_orders.receive(&actor, id).await)
}

/// POST `/purchase-orders/{id}/cancel`
async fn cancel_order(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    ApiPath(id): ApiPath<Uuid>,
    payload: Option<ApiJson<ReasonRequest>>,
) -> Response {
    let reason = transition_reason(payload);
    response::updated(
        state
            .repos
            .purchase_orders
            .cancel(&actor, id, reason.as_deref())
            .await,
    )
}
