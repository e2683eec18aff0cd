//! Slot entity model — the durable record of what is shown at one
//! grid coordinate.

use mural_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full slot row from the `slots` table.
///
/// `version` starts at 0 and increments by exactly 1 on every successful
/// redirect of `current_placement_id`; it is the optimistic-concurrency
/// token for [`crate::services::placement::SlotPlacement`].
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Slot {
    pub id: DbId,
    pub z: i32,
    pub x: i32,
    pub y: i32,
    pub current_placement_id: Option<DbId>,
    pub version: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A slot joined with its current placement, for viewport reads.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ClaimedSlot {
    pub slot_id: DbId,
    pub z: i32,
    pub x: i32,
    pub y: i32,
    pub version: i32,
    pub placement_id: DbId,
    pub placed_by: DbId,
    pub image_url: String,
    pub placed_at: Timestamp,
}
