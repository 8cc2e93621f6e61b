//! Integration tests for the ledger HTTP API.
//!
//! Drives the full router (auth middleware, handlers, service, in-memory
//! store) with `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use warikan_ledger::adapters::http::api_router;
use warikan_ledger::adapters::{InMemoryLedgerStore, MockSessionValidator};
use warikan_ledger::application::{LedgerService, LedgerSettings};

// =============================================================================
// Test Infrastructure
// =============================================================================

const ALICE: &str = "alice-token";
const BOB: &str = "bob-token";
const MALLORY: &str = "mallory-token";

fn app() -> Router {
    let store = Arc::new(InMemoryLedgerStore::new());
    let service = Arc::new(LedgerService::new(store, LedgerSettings::default()));
    let validator = MockSessionValidator::new()
        .with_test_user(ALICE, "U-alice", Some("Alice"))
        .with_test_user(BOB, "U-bob", Some("Bob"))
        .with_test_user(MALLORY, "U-mallory", None);
    api_router(service, Arc::new(validator))
}

async fn send(
    app: &Router,
    method: &str,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(format!("/api/warikan{}", path));
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// Creates a project owned by Alice with Bob as a linked member.
async fn project_with_bob(app: &Router) -> String {
    let (status, project) = send(
        app,
        "POST",
        "/projects",
        Some(ALICE),
        Some(json!({ "name": "Ski trip" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let project_id = project["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        app,
        "POST",
        &format!("/projects/{}/members", project_id),
        Some(ALICE),
        Some(json!({ "display_name": "Bob", "external_user_id": "U-bob" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    project_id
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn health_needs_no_token() {
    let app = app();
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn requests_without_token_are_unauthorized() {
    let app = app();

    let (status, body) = send(&app, "GET", "/projects", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHENTICATED");
}

#[tokio::test]
async fn new_project_has_nothing_to_settle() {
    let app = app();
    let project_id = project_with_bob(&app).await;

    let (status, report) = send(
        &app,
        "GET",
        &format!("/projects/{}/settlements", project_id),
        Some(BOB),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["total_amount"], 0);
    assert_eq!(report["nothing_to_settle"], true);
    assert_eq!(report["transfers"], json!([]));
}

#[tokio::test]
async fn payment_flows_into_settlement() {
    let app = app();
    let project_id = project_with_bob(&app).await;

    let (status, created) = send(
        &app,
        "POST",
        &format!("/projects/{}/payments", project_id),
        Some(BOB),
        Some(json!({ "payer": "U-bob", "amount": 3000, "description": "Lift passes" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(created["id"].is_string());

    let (_, report) = send(
        &app,
        "GET",
        &format!("/projects/{}/settlements", project_id),
        Some(ALICE),
        None,
    )
    .await;

    assert_eq!(report["total_amount"], 3000);
    assert_eq!(
        report["transfers"],
        json!([{
            "from": "U-alice",
            "from_name": "Alice",
            "to": "U-bob",
            "to_name": "Bob",
            "amount": 1500,
        }])
    );
}

#[tokio::test]
async fn non_member_cannot_record_payment() {
    let app = app();
    let project_id = project_with_bob(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/projects/{}/payments", project_id),
        Some(MALLORY),
        Some(json!({ "payer": "U-alice", "amount": 1000 })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");

    let (_, payments) = send(
        &app,
        "GET",
        &format!("/projects/{}/payments", project_id),
        Some(ALICE),
        None,
    )
    .await;
    assert_eq!(payments, json!([]));

    let (_, project) = send(
        &app,
        "GET",
        &format!("/projects/{}", project_id),
        Some(ALICE),
        None,
    )
    .await;
    assert_eq!(project["project"]["total_amount"], 0);
}

#[tokio::test]
async fn remove_payment_restores_total() {
    let app = app();
    let project_id = project_with_bob(&app).await;
    let (_, created) = send(
        &app,
        "POST",
        &format!("/projects/{}/payments", project_id),
        Some(ALICE),
        Some(json!({ "payer": "U-alice", "amount": 800 })),
    )
    .await;
    let payment_id = created["id"].as_str().unwrap();

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/projects/{}/payments/{}", project_id, payment_id),
        Some(ALICE),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, project) = send(
        &app,
        "GET",
        &format!("/projects/{}", project_id),
        Some(BOB),
        None,
    )
    .await;
    assert_eq!(project["project"]["total_amount"], 0);
}

#[tokio::test]
async fn settling_twice_conflicts() {
    let app = app();
    let project_id = project_with_bob(&app).await;
    let path = format!("/projects/{}/settle", project_id);

    let (status, project) = send(&app, "POST", &path, Some(ALICE), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(project["status"], "settled");

    let (status, _) = send(&app, "POST", &path, Some(ALICE), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &app,
        "POST",
        &format!("/projects/{}/payments", project_id),
        Some(ALICE),
        Some(json!({ "payer": "U-alice", "amount": 100 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn unknown_and_malformed_project_ids() {
    let app = app();

    let (status, body) = send(
        &app,
        "GET",
        "/projects/00000000-0000-0000-0000-000000000000",
        Some(ALICE),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "PROJECT_NOT_FOUND");

    let (status, _) = send(&app, "GET", "/projects/not-a-uuid", Some(ALICE), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn invalid_amount_reports_field() {
    let app = app();
    let project_id = project_with_bob(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/projects/{}/payments", project_id),
        Some(ALICE),
        Some(json!({ "payer": "U-alice", "amount": 0 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "amount");
}

#[tokio::test]
async fn project_listing_is_scoped_to_caller() {
    let app = app();
    project_with_bob(&app).await;

    let (status, page) = send(&app, "GET", "/projects?limit=10", Some(BOB), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["projects"].as_array().unwrap().len(), 1);

    let (_, page) = send(&app, "GET", "/projects", Some(MALLORY), None).await;
    assert_eq!(page["projects"], json!([]));
}
