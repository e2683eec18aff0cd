//! Grid routes, nested under `/slots`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::slots;
use crate::state::AppState;

/// ```text
/// GET    /                           list_slots (viewport query)
/// GET    /{z}/{x}/{y}                get_slot
/// POST   /{z}/{x}/{y}/placements     place
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(slots::list_slots))
        .route("/{z}/{x}/{y}", get(slots::get_slot))
        .route("/{z}/{x}/{y}/placements", post(slots::place))
}
