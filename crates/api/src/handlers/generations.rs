//! Generation request handlers: reserve-and-queue plus read access.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use mural_core::error::CoreError;
use mural_core::types::DbId;
use mural_core::{generation, pricing};
use mural_db::models::generation::Generation;
use mural_db::models::user::TokenState;
use mural_db::repositories::GenerationRepo;
use mural_db::services::ledger::TokenLedger;
use mural_db::services::lifecycle::GenerationLifecycle;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateGenerationRequest {
    #[validate(length(min = 1, max = 1000, message = "prompt must be 1-1000 characters"))]
    pub prompt: String,
    pub model: String,
    pub size: String,
}

#[derive(Debug, Serialize)]
pub struct CreateGenerationResponse {
    pub generation: Generation,
    /// Ledger state after the reservation.
    pub tokens: TokenState,
}

/// POST /api/v1/generations
///
/// Reserve the model's token cost, then queue the generation. The charge
/// happens up front; a failed or rejected generation is not refunded.
pub async fn create_generation(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateGenerationRequest>,
) -> AppResult<impl IntoResponse> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;
    // Model and size are pure checks: refuse before the ledger is touched.
    pricing::require_cost(&input.model)?;
    generation::validate_size(&input.size)?;

    let user = TokenLedger::reserve(&state.pool, auth.user_id, &input.model).await?;

    let generation = GenerationLifecycle::create(
        &state.pool,
        auth.user_id,
        &input.prompt,
        &input.model,
        &input.size,
    )
    .await?;

    tracing::info!(
        user_id = auth.user_id,
        generation_id = generation.id,
        model = %generation.model,
        "Generation requested"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: CreateGenerationResponse {
                generation,
                tokens: user.token_state(),
            },
        }),
    ))
}

/// GET /api/v1/generations
///
/// The caller's generations, newest first.
pub async fn list_generations(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let generations = GenerationRepo::list_by_user(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: generations }))
}

/// GET /api/v1/generations/{id}
///
/// A single generation; callers can only read their own.
pub async fn get_generation(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let generation = GenerationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Generation",
            id,
        }))?;

    if generation.user_id != auth.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "generation belongs to another user".into(),
        )));
    }

    Ok(Json(DataResponse { data: generation }))
}
