//! Placement entity model — one immutable historical claim on a slot.

use mural_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full placement row from the `placements` table.
///
/// Immutable once created; deleted only as rollback compensation when the
/// slot version CAS loses. At most one placement per slot is "current" at
/// any instant (the one `slots.current_placement_id` points at).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Placement {
    pub id: DbId,
    pub slot_id: DbId,
    pub user_id: DbId,
    pub generation_id: DbId,
    /// Copied from the generation at bind time.
    pub image_url: String,
    pub created_at: Timestamp,
}

/// Input for inserting a new placement.
#[derive(Debug, Clone)]
pub struct CreatePlacement {
    pub slot_id: DbId,
    pub user_id: DbId,
    pub generation_id: DbId,
    pub image_url: String,
}
