//! Shared helpers for HTTP-level integration tests.
//!
//! Uses Axum's `tower::ServiceExt` to send requests directly to the router
//! without a TCP listener. The router comes from the same
//! [`build_app_router`] the production binary uses, so tests exercise the
//! full middleware stack.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use mural_api::auth::jwt::{issue_token, JwtConfig};
use mural_api::auth::provider::StubIdentity;
use mural_api::config::ServerConfig;
use mural_api::producer::StubProducer;
use mural_api::router::build_app_router;
use mural_api::state::AppState;
use mural_api::storage::FsStore;
use mural_db::models::user::User;
use mural_db::repositories::UserRepo;

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        producer_base_url: None,
        storage_root: std::env::temp_dir()
            .join("mural-api-tests")
            .to_string_lossy()
            .into_owned(),
        storage_public_url: "http://localhost:3000/images".to_string(),
        dispatcher_poll_ms: 1000,
        jwt: JwtConfig {
            secret: "test-secret".to_string(),
            expiry_secs: 3600,
        },
    }
}

/// Build the full application router with stub collaborators and the given
/// database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        identity: Arc::new(StubIdentity),
        producer: Arc::new(StubProducer),
        store: Arc::new(FsStore::new(
            config.storage_root.clone(),
            config.storage_public_url.clone(),
        )),
    };
    build_app_router(state, &config)
}

/// Provision a user row and mint a session token for it.
pub async fn seed_session(pool: &PgPool, subject: &str) -> (User, String) {
    let user = UserRepo::find_or_create(pool, subject, "Test User")
        .await
        .unwrap();
    let token = issue_token(user.id, &test_config().jwt).unwrap();
    (user, token)
}

pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .header("authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .header("authorization", format!("Bearer {token}"))
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert a response is an error with the given status and `code` field.
pub async fn assert_error(response: Response, status: StatusCode, code: &str) {
    assert_eq!(response.status(), status);
    let json = body_json(response).await;
    assert_eq!(json["code"], code, "unexpected error body: {json}");
}
