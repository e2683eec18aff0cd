//! Session and account routes.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// ```text
/// POST   /auth/session   create_session
/// GET    /me             get_me
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/session", post(auth::create_session))
        .route("/me", get(auth::get_me))
}
