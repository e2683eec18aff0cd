//! Slot handlers: placement plus public grid reads.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use mural_core::error::CoreError;
use mural_core::grid;
use mural_core::types::DbId;
use mural_db::models::placement::Placement;
use mural_db::models::slot::Slot;
use mural_db::repositories::{PlacementRepo, SlotRepo};
use mural_db::services::placement::SlotPlacement;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PlaceRequest {
    pub generation_id: DbId,
}

#[derive(Debug, Serialize)]
pub struct PlaceResponse {
    pub placement: Placement,
    pub slot: Slot,
}

/// POST /api/v1/slots/{z}/{x}/{y}/placements
///
/// Bind the caller's approved generation to a grid cell. Loses to a
/// concurrent claim with `SLOT_CONFLICT`; whether to retry is the client's
/// call (typically it re-renders "slot taken" instead).
pub async fn place(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((z, x, y)): Path<(i32, i32, i32)>,
    Json(input): Json<PlaceRequest>,
) -> AppResult<impl IntoResponse> {
    if input.generation_id <= 0 {
        return Err(AppError::Core(CoreError::Validation(
            "generation_id must be positive".into(),
        )));
    }

    let outcome =
        SlotPlacement::place(&state.pool, auth.user_id, input.generation_id, z, x, y).await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: PlaceResponse {
                placement: outcome.placement,
                slot: outcome.slot,
            },
        }),
    ))
}

#[derive(Debug, Serialize)]
pub struct SlotResponse {
    pub slot: Slot,
    /// The placement `current_placement_id` points at, if any.
    pub placement: Option<Placement>,
}

/// GET /api/v1/slots/{z}/{x}/{y}
///
/// One slot with its current placement. 404 until the coordinate has seen
/// its first placement attempt — slots are created lazily.
pub async fn get_slot(
    State(state): State<AppState>,
    Path((z, x, y)): Path<(i32, i32, i32)>,
) -> AppResult<impl IntoResponse> {
    grid::validate_coords(z, x, y)?;

    let slot = SlotRepo::find_by_coords(&state.pool, z, x, y)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("no slot at ({z}, {x}, {y})")))?;

    let placement = match slot.current_placement_id {
        Some(placement_id) => PlacementRepo::find_by_id(&state.pool, placement_id).await?,
        None => None,
    };

    Ok(Json(DataResponse {
        data: SlotResponse { slot, placement },
    }))
}

#[derive(Debug, Deserialize)]
pub struct ViewportQuery {
    pub z: i32,
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

/// GET /api/v1/slots?z=&min_x=&max_x=&min_y=&max_y=
///
/// Claimed slots inside a viewport rectangle. Unclaimed cells are omitted;
/// the rectangle is capped to keep reads bounded.
pub async fn list_slots(
    State(state): State<AppState>,
    Query(viewport): Query<ViewportQuery>,
) -> AppResult<impl IntoResponse> {
    grid::validate_viewport(
        viewport.z,
        viewport.min_x,
        viewport.max_x,
        viewport.min_y,
        viewport.max_y,
    )?;

    let slots = SlotRepo::find_in_viewport(
        &state.pool,
        viewport.z,
        viewport.min_x,
        viewport.max_x,
        viewport.min_y,
        viewport.max_y,
    )
    .await?;

    Ok(Json(DataResponse { data: slots }))
}
