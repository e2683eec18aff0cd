//! Repository for the `placements` table.

use mural_core::types::DbId;
use sqlx::PgPool;

use crate::models::placement::{CreatePlacement, Placement};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, slot_id, user_id, generation_id, image_url, created_at";

/// Provides insert, lookup, and compensation delete for placements.
pub struct PlacementRepo;

impl PlacementRepo {
    /// Insert a placement. Always valid history even if it never becomes
    /// current — the slot CAS decides that afterwards.
    pub async fn create(
        pool: &PgPool,
        input: &CreatePlacement,
    ) -> Result<Placement, sqlx::Error> {
        let query = format!(
            "INSERT INTO placements (slot_id, user_id, generation_id, image_url)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Placement>(&query)
            .bind(input.slot_id)
            .bind(input.user_id)
            .bind(input.generation_id)
            .bind(input.image_url.as_str())
            .fetch_one(pool)
            .await
    }

    /// Find a placement by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Placement>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM placements WHERE id = $1");
        sqlx::query_as::<_, Placement>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Placement history for a slot, newest first. Superseded placements are
    /// retained; only CAS-loss compensation removes rows.
    pub async fn list_by_slot(
        pool: &PgPool,
        slot_id: DbId,
    ) -> Result<Vec<Placement>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM placements
             WHERE slot_id = $1
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Placement>(&query)
            .bind(slot_id)
            .fetch_all(pool)
            .await
    }

    /// Hard-delete a placement. Compensation path only: removes the
    /// tentative row inserted by a placement attempt that lost the slot
    /// version CAS. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM placements WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
