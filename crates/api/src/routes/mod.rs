pub mod auth;
pub mod generations;
pub mod health;
pub mod slots;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/session                      create session (public)
/// /me                                ledger state (auth)
///
/// /generations                       create (auth), list mine (auth)
/// /generations/{id}                  get (auth, owner only)
///
/// /slots                             viewport query (public)
/// /slots/{z}/{x}/{y}                 get one slot (public)
/// /slots/{z}/{x}/{y}/placements      place (auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .nest("/generations", generations::router())
        .nest("/slots", slots::router())
}
