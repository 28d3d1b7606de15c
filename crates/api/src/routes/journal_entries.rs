//! Journal entry routes.

use axum::{
    Router,
    extract::State,
    response::Response,
    routing::{get, post},
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use docledger_core::ledger::JournalEntryInput;
use docledger_core::workflow::JournalEntryStatus;
use docledger_db::repositories::JournalEntryFilter;

use super::{ReasonRequest, page_request, transition_reason};
use crate::{AppState, extractors::{ApiJson, ApiPath, ApiQuery, CurrentActor}, response};

/// Creates the journal entry routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/journal-entries", get(list_entries).post(create_entry))
        .route("/journal-entries/{id}", get(get_entry))
        .route("/journal-entries/{id}/post", post(post_entry))
        .route("/journal-entries/{id}/reverse", post(reverse_entry))
}

/// Query parameters for listing journal entries.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEntriesQuery {
    /// Filter by status.
    pub status: Option<JournalEntryStatus>,
    /// Entries dated on or after (YYYY-MM-DD).
    pub date_from: Option<NaiveDate>,
    /// Entries dated on or before (YYYY-MM-DD).
    pub date_to: Option<NaiveDate>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Page size (max 100).
    pub limit: Option<u32>,
}

/// GET `/journal-entries`
async fn list_entries(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListEntriesQuery>,
) -> Response {
    let filter = JournalEntryFilter {
        status: query.status,
        date_from: query.date_from,
        date_to: query.date_to,
    };
    let page = page_request(query.page, query.limit);
    response::read(state.repos.journal_entries.list(&filter, page).await)
}

/// GET `/journal-entries/{id}`
async fn get_entry(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> Response {
    response::read(state.repos.journal_entries.get(id).await)
}

/// POST `/journal-entries`
async fn create_entry(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    ApiJson(payload): ApiJson<JournalEntryInput>,
) -> Response {
    response::created(state.repos.journal_entries.create(&actor, &payload).await)
}

/// POST `/journal-entries/{id}/post`
async fn post_entry(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    ApiPath(id): ApiPath<Uuid>,
) -> Response {
    response::updated(state.repos.journal_entries.post(&actor, id).await)
}

/// POST `/journal-entries/{id}/reverse` - Marks the entry reversed and books the mirror entry.
async fn reverse_entry(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    ApiPath(id): ApiPath<Uuid>,
    payload: Option<ApiJson<ReasonRequest>>,
) -> Response {
    let reason = transition_reason(payload).unwrap_or_default();
    response::created(state.repos.journal_entries.reverse(&actor, id, &reason).await)
}
