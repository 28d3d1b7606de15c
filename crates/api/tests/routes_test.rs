//! HTTP tests driving the full router against in-memory SQLite.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header::CONTENT_TYPE},
};
use http_body_util::BodyExt;
use sea_orm::{
    ConnectOptions, Database, DatabaseBackend, DbErr, MockDatabase, RuntimeErr,
};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use docledger_api::{AppState, create_router};
use docledger_db::Repositories;
use docledger_db::migration::{Migrator, MigratorTrait};
use docledger_shared::LedgerConfig;

async fn app() -> Router {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    create_router(AppState::new(Repositories::new(db, &LedgerConfig::default())))
}

fn unreachable_app() -> Router {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_errors([DbErr::Conn(RuntimeErr::Internal(
            "connection refused".to_string(),
        ))])
        .into_connection();
    create_router(AppState::new(Repositories::new(db, &LedgerConfig::default())))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post(uri: &str, actor: Option<(Uuid, &str)>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some((id, role)) = actor {
        builder = builder
            .header("x-actor-id", id.to_string())
            .header("x-actor-role", role);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn post_without_body(uri: &str, actor: (Uuid, &str)) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("x-actor-id", actor.0.to_string())
        .header("x-actor-role", actor.1)
        .body(Body::empty())
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

fn balanced_entry() -> Value {
    json!({
        "entryDate": "2026-10-01",
        "description": "Owner capital",
        "lines": [
            { "accountCode": "1000", "debit": "100000", "credit": "0" },
            { "accountCode": "3000", "debit": "0", "credit": "100000" }
        ]
    })
}

#[tokio::test]
async fn test_health() {
    let app = app().await;

    let (status, json) = send(&app, get("/api/v1/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["status"], "ok");
}

#[tokio::test]
async fn test_create_journal_entry() {
    let app = app().await;
    let accountant = (Uuid::new_v4(), "accountant");

    let (status, json) = send(
        &app,
        post("/api/v1/journal-entries", Some(accountant), &balanced_entry()),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["number"], "JE000001");
    assert_eq!(json["data"]["status"], "DRAFT");
    assert_eq!(json["data"]["lines"].as_array().unwrap().len(), 2);
    assert_eq!(json["data"]["lines"][0]["lineNumber"], 1);
}

#[tokio::test]
async fn test_unbalanced_entry_is_bad_request() {
    let app = app().await;
    let mut body = balanced_entry();
    body["lines"][1]["credit"] = json!("90000");

    let (status, json) = send(
        &app,
        post(
            "/api/v1/journal-entries",
            Some((Uuid::new_v4(), "accountant")),
            &body,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "VALIDATION_ERROR");
    assert!(json["message"].as_str().unwrap().contains("not balanced"));

    let (_, list) = send(&app, get("/api/v1/journal-entries")).await;
    assert_eq!(list["data"]["pagination"]["total"], 0);
}

#[tokio::test]
async fn test_write_without_actor_is_unauthorized() {
    let app = app().await;

    let (status, json) = send(&app, post("/api/v1/journal-entries", None, &balanced_entry())).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_unknown_role_is_unauthorized() {
    let app = app().await;

    let (status, _) = send(
        &app,
        post(
            "/api/v1/journal-entries",
            Some((Uuid::new_v4(), "superuser")),
            &balanced_entry(),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_insufficient_role_is_forbidden() {
    let app = app().await;

    let (status, json) = send(
        &app,
        post(
            "/api/v1/journal-entries",
            Some((Uuid::new_v4(), "viewer")),
            &balanced_entry(),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["error"], "FORBIDDEN");
}

#[tokio::test]
async fn test_purchase_order_flow() {
    let app = app().await;
    let manager = (Uuid::new_v4(), "manager");
    let staff = (Uuid::new_v4(), "staff");

    let (status, supplier) = send(
        &app,
        post(
            "/api/v1/suppliers",
            Some(manager),
            &json!({ "code": "SUP-1", "name": "Paper Co" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let supplier_id = supplier["data"]["id"].as_str().unwrap().to_string();

    let (status, order) = send(
        &app,
        post(
            "/api/v1/purchase-orders",
            Some(staff),
            &json!({
                "supplierId": supplier_id,
                "orderDate": "2026-10-03",
                "taxRate": "0.11",
                "lines": [
                    { "description": "Paper", "quantity": "10", "unitPrice": "5000" },
                    { "description": "Toner", "quantity": "3", "unitPrice": "20000" }
                ],
                "total": "1"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(order["data"]["number"], "PO000001");
    let id = order["data"]["id"].as_str().unwrap().to_string();

    let approve = format!("/api/v1/purchase-orders/{id}/approve");
    let (status, json) = send(&app, post(&approve, Some(manager), &json!({}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], "NOT_ELIGIBLE");

    let submit = format!("/api/v1/purchase-orders/{id}/submit");
    let (status, _) = send(&app, post(&submit, Some(staff), &json!({}))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = send(&app, post(&approve, Some(manager), &json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "APPROVED");

    let (status, json) = send(&app, get(&format!("/api/v1/purchase-orders/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "APPROVED");
    assert_eq!(json["data"]["lines"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_get_missing_document_is_not_found() {
    let app = app().await;

    let (status, json) = send(
        &app,
        get(&format!("/api/v1/financial-transactions/{}", Uuid::new_v4())),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_reject_without_reason_is_bad_request() {
    let app = app().await;
    let (_, created) = send(
        &app,
        post(
            "/api/v1/financial-transactions",
            Some((Uuid::new_v4(), "staff")),
            &json!({
                "transactionDate": "2026-10-05",
                "transactionType": "expense",
                "description": "Electricity",
                "lines": [{ "accountCode": "6200", "amount": "350000" }]
            }),
        ),
    )
    .await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let (status, json) = send(
        &app,
        post(
            &format!("/api/v1/financial-transactions/{id}/reject"),
            Some((Uuid::new_v4(), "manager")),
            &json!({}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_malformed_body_is_enveloped_bad_request() {
    let app = app().await;

    let (status, json) = send(
        &app,
        post(
            "/api/v1/journal-entries",
            Some((Uuid::new_v4(), "staff")),
            &json!({ "entryDate": "2026-10-01" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "VALIDATION_ERROR");
    assert!(json["message"].is_string());
}

#[tokio::test]
async fn test_malformed_path_and_query_are_enveloped_bad_request() {
    let app = app().await;

    let (status, json) = send(&app, get("/api/v1/purchase-orders/not-a-uuid")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "VALIDATION_ERROR");

    let (status, json) = send(&app, get("/api/v1/journal-entries?page=first")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_cancel_without_body_reaches_lookup() {
    let app = app().await;

    let (status, json) = send(
        &app,
        post_without_body(
            &format!("/api/v1/purchase-orders/{}/cancel", Uuid::new_v4()),
            (Uuid::new_v4(), "manager"),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_cancel_draft_order_without_body() {
    let app = app().await;
    let (_, created) = send(
        &app,
        post(
            "/api/v1/suppliers",
            Some((Uuid::new_v4(), "manager")),
            &json!({ "code": "SUP-9", "name": "Acme Paper" }),
        ),
    )
    .await;
    let supplier_id = created["data"]["id"].as_str().unwrap().to_string();

    let (_, created) = send(
        &app,
        post(
            "/api/v1/purchase-orders",
            Some((Uuid::new_v4(), "staff")),
            &json!({
                "supplierId": supplier_id,
                "orderDate": "2026-10-03",
                "lines": [{ "description": "A4 paper", "quantity": "2", "unitPrice": "50000" }]
            }),
        ),
    )
    .await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let (status, json) = send(
        &app,
        post_without_body(
            &format!("/api/v1/purchase-orders/{id}/cancel"),
            (Uuid::new_v4(), "manager"),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "CANCELLED");
}

#[tokio::test]
async fn test_degraded_list_is_ok_with_fallback_flag() {
    let app = unreachable_app();

    let (status, json) = send(&app, get("/api/v1/journal-entries?page=1&limit=5")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["fromFallback"], true);
    assert_eq!(json["data"]["items"], json!([]));
    assert_eq!(json["data"]["pagination"]["limit"], 5);
}

#[tokio::test]
async fn test_write_on_unreachable_store_is_unavailable() {
    let app = unreachable_app();

    let (status, json) = send(
        &app,
        post(
            &format!("/api/v1/journal-entries/{}/post", Uuid::new_v4()),
            Some((Uuid::new_v4(), "accountant")),
            &json!({}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["error"], "STORAGE_UNAVAILABLE");
    assert!(json.get("fromFallback").is_none());
}
