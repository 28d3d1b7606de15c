//! Financial transaction routes.

use axum::{
    Router,
    extract::State,
    response::Response,
    routing::{get, post},
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use docledger_core::ledger::{FinancialTransactionInput, TransactionType};
use docledger_core::workflow::FinancialTransactionStatus;
use docledger_db::repositories::FinancialTransactionFilter;

use super::{ReasonRequest, page_request, transition_reason};
use crate::{AppState, extractors::{ApiJson, ApiPath, ApiQuery, CurrentActor}, response};

/// Creates the financial transaction routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/financial-transactions",
            get(list_transactions).post(create_transaction),
        )
        .route("/financial-transactions/{id}", get(get_transaction))
        .route("/financial-transactions/{id}/approve", post(approve_transaction))
        .route("/financial-transactions/{id}/reject", post(reject_transaction))
}

/// Query parameters for listing financial transactions.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTransactionsQuery {
    /// Filter by status.
    pub status: Option<FinancialTransactionStatus>,
    /// Filter by transaction type.
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionType>,
    /// Transactions dated on or after (YYYY-MM-DD).
    pub date_from: Option<NaiveDate>,
    /// Transactions dated on or before (YYYY-MM-DD).
    pub date_to: Option<NaiveDate>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Page size (max 100).
    pub limit: Option<u32>,
}

/// GET `/financial-transactions`
async fn list_transactions(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListTransactionsQuery>,
) -> Response {
    let filter = FinancialTransactionFilter {
        status: query.status,
        transaction_type: query.transaction_type,
        date_from: query.date_from,
        date_to: query.date_to,
    };
    let page = page_request(query.page, query.limit);
    response::read(state.repos.financial_transactions.list(&filter, page).await)
}

/// GET `/financial-transactions/{id}`
async fn get_transaction(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> Response {
    response::read(state.repos.financial_transactions.get(id).await)
}

/// POST `/financial-transactions`
async fn create_transaction(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    ApiJson(payload): ApiJson<FinancialTransactionInput>,
) -> Response {
    response::created(
        state
            .repos
            .financial_transactions
            .create(&actor, &payload)
            .await,
    )
}

/// POST `/financial-transactions/{id}/approve`
async fn approve_transaction(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    ApiPath(id): ApiPath<Uuid>,
) -> Response {
    response::updated(state.repos.financial_transactions.approve(&actor, id).await)
}

/// POST `/financial-transactions/{id}/reject`
async fn reject_transaction(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    ApiPath(id): ApiPath<Uuid>,
    payload: Option<ApiJson<ReasonRequest>>,
) -> Response {
    let reason = transition_reason(payload).unwrap_or_default();
    response::updated(
        state
            .repos
            .financial_transactions
            .reject(&actor, id, &reason)
            .await,
    )
}
