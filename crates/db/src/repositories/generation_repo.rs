//! Repository for the `generations` table.
//!
//! Status transitions are expressed as conditional UPDATEs whose WHERE
//! clause encodes the legal prior states, so a terminal row is never
//! mutated — the affected-row count is the verdict, not a prior read.

use mural_core::types::DbId;
use sqlx::PgPool;

use crate::models::generation::{CreateGeneration, Generation};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, prompt, model, size, status, token_cost, \
                        image_url, rejection_reason, error_message, created_at, updated_at";

/// Provides CRUD and lifecycle operations for generation requests.
pub struct GenerationRepo;

impl GenerationRepo {
    /// Insert a new generation request in `queued`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateGeneration,
    ) -> Result<Generation, sqlx::Error> {
        let query = format!(
            "INSERT INTO generations (user_id, prompt, model, size, token_cost)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Generation>(&query)
            .bind(input.user_id)
            .bind(&input.prompt)
            .bind(&input.model)
            .bind(&input.size)
            .bind(input.token_cost)
            .fetch_one(pool)
            .await
    }

    /// Find a generation by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Generation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM generations WHERE id = $1");
        sqlx::query_as::<_, Generation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's generations, newest first.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<Generation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM generations
             WHERE user_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Generation>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Claim the oldest queued generation and mark it `generating`, skipping
    /// rows another dispatcher already has locked. Returns `None` when the
    /// queue is empty.
    pub async fn claim_next_queued(pool: &PgPool) -> Result<Option<Generation>, sqlx::Error> {
        let query = format!(
            "UPDATE generations \
             SET status = 'generating', updated_at = NOW() \
             WHERE id = ( \
                 SELECT id FROM generations \
                 WHERE status = 'queued' \
                 ORDER BY created_at ASC, id ASC \
                 LIMIT 1 \
                 FOR UPDATE SKIP LOCKED \
             ) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Generation>(&query)
            .fetch_optional(pool)
            .await
    }

    /// `queued -> generating`. Returns `None` if the row is missing or not
    /// in `queued`.
    pub async fn mark_generating(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Generation>, sqlx::Error> {
        let query = format!(
            "UPDATE generations
             SET status = 'generating', updated_at = NOW()
             WHERE id = $1 AND status = 'queued'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Generation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Terminal transition to `approved`: sets `image_url`, clears the other
    /// terminal payload fields. Returns `None` if the row is missing or
    /// already terminal.
    pub async fn mark_approved(
        pool: &PgPool,
        id: DbId,
        image_url: &str,
    ) -> Result<Option<Generation>, sqlx::Error> {
        let query = format!(
            "UPDATE generations
             SET status = 'approved', image_url = $2,
                 rejection_reason = NULL, error_message = NULL,
                 updated_at = NOW()
             WHERE id = $1 AND status IN ('queued', 'generating')
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Generation>(&query)
            .bind(id)
            .bind(image_url)
            .fetch_optional(pool)
            .await
    }

    /// Terminal transition to `rejected`: sets `rejection_reason`, clears
    /// the other terminal payload fields.
    pub async fn mark_rejected(
        pool: &PgPool,
        id: DbId,
        reason: &str,
    ) -> Result<Option<Generation>, sqlx::Error> {
        let query = format!(
            "UPDATE generations
             SET status = 'rejected', rejection_reason = $2,
                 image_url = NULL, error_message = NULL,
                 updated_at = NOW()
             WHERE id = $1 AND status IN ('queued', 'generating')
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Generation>(&query)
            .bind(id)
            .bind(reason)
            .fetch_optional(pool)
            .await
    }

    /// Terminal transition to `failed`: sets `error_message`, clears the
    /// other terminal payload fields.
    pub async fn mark_failed(
        pool: &PgPool,
        id: DbId,
        message: &str,
    ) -> Result<Option<Generation>, sqlx::Error> {
        let query = format!(
            "UPDATE generations
             SET status = 'failed', error_message = $2,
                 image_url = NULL, rejection_reason = NULL,
                 updated_at = NOW()
             WHERE id = $1 AND status IN ('queued', 'generating')
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Generation>(&query)
            .bind(id)
            .bind(message)
            .fetch_optional(pool)
            .await
    }
}
