//! Session creation and the caller's ledger view.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use mural_core::error::CoreError;
use mural_db::models::user::User;
use mural_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::issue_token;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SessionRequest {
    /// Token issued by the external identity provider.
    pub provider_token: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    /// Session JWT for subsequent requests.
    pub token: String,
    pub user: User,
}

/// POST /api/v1/auth/session
///
/// Exchange a provider token for a session. The ledger row is provisioned
/// on first authentication and reused afterwards.
pub async fn create_session(
    State(state): State<AppState>,
    Json(input): Json<SessionRequest>,
) -> AppResult<impl IntoResponse> {
    let identity = state.identity.resolve(&input.provider_token).await?;

    let user =
        UserRepo::find_or_create(&state.pool, &identity.subject, &identity.display_name).await?;

    let token = issue_token(user.id, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("issuing session token: {e}")))?;

    tracing::info!(user_id = user.id, "Session created");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: SessionResponse { token, user },
        }),
    ))
}

/// GET /api/v1/me
///
/// The caller's current token ledger state.
pub async fn get_me(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;

    Ok(Json(DataResponse {
        data: user.token_state(),
    }))
}
