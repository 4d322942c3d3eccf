use axum::http::StatusCode;
use axum_test::TestServer;
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};
use uuid::Uuid;

use compost_auth_types::identity::AccessTokenSecret;
use compost_hub::router::build_router;
use compost_hub::state::AppState;
use compost_testing::auth::{MockAuth, TEST_JWT_SECRET};

/// Router without a database. Requests rejected before any repository call
/// never notice.
fn server() -> TestServer {
    let state = AppState {
        db: DatabaseConnection::Disconnected,
        jwt_secret: AccessTokenSecret::new(TEST_JWT_SECRET),
    };
    TestServer::new(build_router(state)).unwrap()
}

#[tokio::test]
async fn healthz_returns_200_with_request_id() {
    let resp = server().get("/healthz").await;

    resp.assert_status(StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn readyz_returns_503_without_database() {
    server()
        .get("/readyz")
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn every_api_route_requires_bearer_token() {
    let server = server();
    let id = Uuid::new_v4();

    let gets = [
        "/profiles/@me".to_owned(),
        "/bins".to_owned(),
        format!("/bins/{id}"),
        format!("/bins/{id}/members"),
        format!("/bins/{id}/logs"),
        "/tasks".to_owned(),
        "/forum/posts".to_owned(),
        format!("/forum/posts/{id}"),
        "/tips".to_owned(),
    ];
    for path in gets {
        let resp = server.get(&path).await;
        resp.assert_status(StatusCode::UNAUTHORIZED);
        let body: Value = resp.json();
        assert_eq!(body["kind"], "UNAUTHORIZED", "{path}");
    }

    let posts = [
        "/bins".to_owned(),
        format!("/bins/{id}/join"),
        format!("/bins/{id}/logs"),
        "/tasks".to_owned(),
        format!("/tasks/{id}/accept"),
        format!("/tasks/{id}/complete"),
        "/forum/posts".to_owned(),
        format!("/forum/posts/{id}/replies"),
        "/tips".to_owned(),
    ];
    for path in posts {
        server
            .post(&path)
            .json(&json!({}))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    server
        .delete(&format!("/tasks/{id}"))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    server
        .delete(&format!("/bins/{id}"))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn rejects_malformed_bearer_token() {
    let resp = server()
        .get("/bins")
        .add_header(
            axum::http::header::AUTHORIZATION,
            axum::http::HeaderValue::from_static("Bearer not.a.jwt"),
        )
        .await;
    resp.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn blank_display_name_returns_400() {
    let (name, value) = MockAuth::random().header();
    let resp = server()
        .put("/profiles/@me")
        .add_header(name, value)
        .json(&json!({ "display_name": "   " }))
        .await;

    resp.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = resp.json();
    assert_eq!(body["kind"], "VALIDATION");
    assert_eq!(body["message"], "display_name is required");
}

#[tokio::test]
async fn blank_bin_name_returns_400() {
    let (name, value) = MockAuth::random().header();
    let resp = server()
        .post("/bins")
        .add_header(name, value)
        .json(&json!({ "location": "Void deck" }))
        .await;

    resp.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = resp.json();
    assert_eq!(body["message"], "name is required");
}

#[tokio::test]
async fn unknown_log_kind_returns_400() {
    let (name, value) = MockAuth::random().header();
    let resp = server()
        .post(&format!("/bins/{}/logs", Uuid::new_v4()))
        .add_header(name, value)
        .json(&json!({ "kind": "dance" }))
        .await;

    resp.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = resp.json();
    assert_eq!(body["kind"], "VALIDATION");
    assert_eq!(body["message"], "unknown log kind: dance");
}

#[tokio::test]
async fn task_without_bin_id_returns_400() {
    let (name, value) = MockAuth::random().header();
    let resp = server()
        .post("/tasks")
        .add_header(name, value)
        .json(&json!({ "title": "Turn the pile" }))
        .await;

    resp.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = resp.json();
    assert_eq!(body["message"], "bin_id must be a UUID");
}

#[tokio::test]
async fn unknown_task_status_filter_returns_400() {
    let (name, value) = MockAuth::random().header();
    let resp = server()
        .get("/tasks")
        .add_query_param("status", "done")
        .add_header(name, value)
        .await;

    resp.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = resp.json();
    assert_eq!(body["message"], "unknown task status: done");
}

#[tokio::test]
async fn blank_post_returns_400() {
    let (name, value) = MockAuth::random().header();
    let resp = server()
        .post("/forum/posts")
        .add_header(name, value)
        .json(&json!({ "title": "", "content": "hello" }))
        .await;

    resp.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = resp.json();
    assert_eq!(body["message"], "title is required");
}

#[tokio::test]
async fn blank_tip_returns_400() {
    let (name, value) = MockAuth::random().header();
    let resp = server()
        .post("/tips")
        .add_header(name, value)
        .json(&json!({ "title": "Layering", "content": "" }))
        .await;

    resp.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = resp.json();
    assert_eq!(body["message"], "content is required");
}
