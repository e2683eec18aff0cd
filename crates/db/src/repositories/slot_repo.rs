//! Repository for the `slots` table.

use mural_core::types::DbId;
use sqlx::PgPool;

use crate::models::slot::{ClaimedSlot, Slot};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, z, x, y, current_placement_id, version, created_at, updated_at";

/// Columns for the slot + current-placement join used by viewport reads.
const CLAIMED_COLUMNS: &str = "s.id AS slot_id, s.z, s.x, s.y, s.version, \
                                p.id AS placement_id, p.user_id AS placed_by, \
                                p.image_url, p.created_at AS placed_at";

/// Provides lookup, lazy creation, and the current-pointer CAS for slots.
pub struct SlotRepo;

impl SlotRepo {
    /// Find a slot by its coordinate key.
    pub async fn find_by_coords(
        pool: &PgPool,
        z: i32,
        x: i32,
        y: i32,
    ) -> Result<Option<Slot>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM slots WHERE z = $1 AND x = $2 AND y = $3");
        sqlx::query_as::<_, Slot>(&query)
            .bind(z)
            .bind(x)
            .bind(y)
            .fetch_optional(pool)
            .await
    }

    /// Insert a fresh slot at `version = 0`. A concurrent first placement at
    /// the same coordinate surfaces as a unique violation on
    /// `uq_slots_coords`; the caller re-reads and proceeds with the winner's
    /// row.
    pub async fn insert(pool: &PgPool, z: i32, x: i32, y: i32) -> Result<Slot, sqlx::Error> {
        let query = format!(
            "INSERT INTO slots (z, x, y)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Slot>(&query)
            .bind(z)
            .bind(x)
            .bind(y)
            .fetch_one(pool)
            .await
    }

    /// Redirect the slot's current pointer, conditioned on `version` still
    /// being the value observed when the slot was resolved.
    ///
    /// Returns `None` when a concurrent placement won the race — the caller
    /// compensates by deleting its tentative placement row.
    pub async fn try_set_current(
        pool: &PgPool,
        id: DbId,
        placement_id: DbId,
        expected_version: i32,
    ) -> Result<Option<Slot>, sqlx::Error> {
        let query = format!(
            "UPDATE slots
             SET current_placement_id = $2, version = version + 1, updated_at = NOW()
             WHERE id = $1 AND version = $3
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Slot>(&query)
            .bind(id)
            .bind(placement_id)
            .bind(expected_version)
            .fetch_optional(pool)
            .await
    }

    /// Claimed slots inside a viewport rectangle at one zoom level.
    /// Unclaimed slots (no current placement) are omitted.
    pub async fn find_in_viewport(
        pool: &PgPool,
        z: i32,
        min_x: i32,
        max_x: i32,
        min_y: i32,
        max_y: i32,
    ) -> Result<Vec<ClaimedSlot>, sqlx::Error> {
        let query = format!(
            "SELECT {CLAIMED_COLUMNS}
             FROM slots s
             JOIN placements p ON p.id = s.current_placement_id
             WHERE s.z = $1 AND s.x BETWEEN $2 AND $3 AND s.y BETWEEN $4 AND $5
             ORDER BY s.y, s.x"
        );
        sqlx::query_as::<_, ClaimedSlot>(&query)
            .bind(z)
            .bind(min_x)
            .bind(max_x)
            .bind(min_y)
            .bind(max_y)
            .fetch_all(pool)
            .await
    }
}
