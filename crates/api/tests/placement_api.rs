//! Slot placement and grid read endpoint tests.

mod common;

use axum::http::StatusCode;
use mural_core::types::DbId;
use mural_db::services::lifecycle::GenerationLifecycle;
use sqlx::PgPool;

/// Create a generation for `user_id` and drive it to `approved` directly
/// through the lifecycle service, bypassing the dispatcher.
async fn approved_generation(pool: &PgPool, user_id: DbId, tag: &str) -> DbId {
    let generation =
        GenerationLifecycle::create(pool, user_id, "a mural tile", "flux-schnell", "512x512")
            .await
            .unwrap();
    GenerationLifecycle::mark_generating(pool, generation.id)
        .await
        .unwrap();
    GenerationLifecycle::mark_approved(
        pool,
        generation.id,
        &format!("https://img.example/{tag}.png"),
    )
    .await
    .unwrap();
    generation.id
}

// ---------------------------------------------------------------------------
// Placement
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn placing_an_approved_generation_claims_the_slot(pool: PgPool) {
    let (user, token) = common::seed_session(&pool, "pl-happy").await;
    let generation_id = approved_generation(&pool, user.id, "happy").await;

    let app = common::build_test_app(pool);
    let response = common::post_json_auth(
        app,
        "/api/v1/slots/5/10/10/placements",
        &token,
        serde_json::json!({"generation_id": generation_id}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = common::body_json(response).await;
    assert_eq!(json["data"]["slot"]["version"], 1);
    assert_eq!(
        json["data"]["slot"]["current_placement_id"],
        json["data"]["placement"]["id"]
    );
    assert_eq!(
        json["data"]["placement"]["image_url"],
        "https://img.example/happy.png"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn queued_generation_cannot_be_placed(pool: PgPool) {
    let (user, token) = common::seed_session(&pool, "pl-queued").await;
    let generation =
        GenerationLifecycle::create(&pool, user.id, "still queued", "flux-schnell", "512x512")
            .await
            .unwrap();

    let app = common::build_test_app(pool.clone());
    let response = common::post_json_auth(
        app,
        "/api/v1/slots/5/10/10/placements",
        &token,
        serde_json::json!({"generation_id": generation.id}),
    )
    .await;
    common::assert_error(response, StatusCode::CONFLICT, "GENERATION_NOT_APPROVED").await;

    // Refused before the slot table was touched.
    let app = common::build_test_app(pool);
    let response = common::get(app, "/api/v1/slots/5/10/10").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn placing_someone_elses_generation_is_forbidden(pool: PgPool) {
    let (owner, _) = common::seed_session(&pool, "pl-owner").await;
    let (_, thief_token) = common::seed_session(&pool, "pl-thief").await;
    let generation_id = approved_generation(&pool, owner.id, "owned").await;

    let app = common::build_test_app(pool);
    let response = common::post_json_auth(
        app,
        "/api/v1/slots/5/10/10/placements",
        &thief_token,
        serde_json::json!({"generation_id": generation_id}),
    )
    .await;
    common::assert_error(response, StatusCode::FORBIDDEN, "FORBIDDEN").await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn out_of_range_zoom_is_a_validation_error(pool: PgPool) {
    let (user, token) = common::seed_session(&pool, "pl-zoom").await;
    let generation_id = approved_generation(&pool, user.id, "zoom").await;

    let app = common::build_test_app(pool);
    let response = common::post_json_auth(
        app,
        "/api/v1/slots/40/0/0/placements",
        &token,
        serde_json::json!({"generation_id": generation_id}),
    )
    .await;
    common::assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_positive_generation_id_is_rejected(pool: PgPool) {
    let (_, token) = common::seed_session(&pool, "pl-zero").await;

    let app = common::build_test_app(pool);
    let response = common::post_json_auth(
        app,
        "/api/v1/slots/5/10/10/placements",
        &token,
        serde_json::json!({"generation_id": 0}),
    )
    .await;
    common::assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn replacement_supersedes_and_bumps_version(pool: PgPool) {
    let (user, token) = common::seed_session(&pool, "pl-super").await;
    let first = approved_generation(&pool, user.id, "first").await;
    let second = approved_generation(&pool, user.id, "second").await;

    let app = common::build_test_app(pool.clone());
    common::post_json_auth(
        app,
        "/api/v1/slots/3/7/7/placements",
        &token,
        serde_json::json!({"generation_id": first}),
    )
    .await;

    let app = common::build_test_app(pool);
    let response = common::post_json_auth(
        app,
        "/api/v1/slots/3/7/7/placements",
        &token,
        serde_json::json!({"generation_id": second}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = common::body_json(response).await;
    assert_eq!(json["data"]["slot"]["version"], 2);
    assert_eq!(
        json["data"]["placement"]["image_url"],
        "https://img.example/second.png"
    );
}

// ---------------------------------------------------------------------------
// Grid reads
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn get_slot_returns_current_placement(pool: PgPool) {
    let (user, token) = common::seed_session(&pool, "pl-read").await;
    let generation_id = approved_generation(&pool, user.id, "read").await;

    let app = common::build_test_app(pool.clone());
    common::post_json_auth(
        app,
        "/api/v1/slots/2/-3/4/placements",
        &token,
        serde_json::json!({"generation_id": generation_id}),
    )
    .await;

    let app = common::build_test_app(pool);
    let response = common::get(app, "/api/v1/slots/2/-3/4").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = common::body_json(response).await;
    assert_eq!(json["data"]["slot"]["z"], 2);
    assert_eq!(
        json["data"]["placement"]["image_url"],
        "https://img.example/read.png"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unclaimed_coordinate_is_not_found(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = common::get(app, "/api/v1/slots/5/99/99").await;
    common::assert_error(response, StatusCode::NOT_FOUND, "NOT_FOUND").await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn viewport_lists_claimed_cells(pool: PgPool) {
    let (user, token) = common::seed_session(&pool, "pl-viewport").await;
    let generation_id = approved_generation(&pool, user.id, "viewport").await;

    let app = common::build_test_app(pool.clone());
    common::post_json_auth(
        app,
        "/api/v1/slots/6/1/2/placements",
        &token,
        serde_json::json!({"generation_id": generation_id}),
    )
    .await;

    let app = common::build_test_app(pool);
    let response = common::get(
        app,
        "/api/v1/slots?z=6&min_x=0&max_x=10&min_y=0&max_y=10",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = common::body_json(response).await;
    let cells = json["data"].as_array().unwrap();
    assert_eq!(cells.len(), 1);
    assert_eq!(cells[0]["x"], 1);
    assert_eq!(cells[0]["y"], 2);
    assert_eq!(cells[0]["image_url"], "https://img.example/viewport.png");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn oversized_viewport_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = common::get(
        app,
        "/api/v1/slots?z=6&min_x=0&max_x=100&min_y=0&max_y=100",
    )
    .await;
    common::assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;
}
