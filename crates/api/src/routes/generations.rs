//! Generation request routes, nested under `/generations`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::generations;
use crate::state::AppState;

/// ```text
/// POST   /               create_generation
/// GET    /               list_generations
/// GET    /{id}           get_generation
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(generations::create_generation).get(generations::list_generations),
        )
        .route("/{id}", get(generations::get_generation))
}
