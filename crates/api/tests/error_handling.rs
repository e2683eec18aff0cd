//! Cross-cutting error shape tests.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use sqlx::PgPool;
use tower::ServiceExt;

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_route_is_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = common::get(app, "/api/v1/nope").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn malformed_json_is_a_client_error(pool: PgPool) {
    let (_, token) = common::seed_session(&pool, "err-json").await;

    let app = common::build_test_app(pool);
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/generations")
                .header("content-type", "application/json")
                .header("authorization", format!("Bearer {token}"))
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn error_bodies_carry_code_and_message(pool: PgPool) {
    let (_, token) = common::seed_session(&pool, "err-shape").await;

    let app = common::build_test_app(pool);
    let response = common::get_auth(app, "/api/v1/generations/999999", &token).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = common::body_json(response).await;
    assert!(json["error"].is_string());
    assert!(json["code"].is_string());
}
