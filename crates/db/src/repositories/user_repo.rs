//! Repository for the `users` table (the token ledger).

use mural_core::ledger::{LedgerSnapshot, ReservationPlan};
use mural_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::User;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, subject, display_name, tokens_current, tokens_max, \
                        cooldown_until, total_generations, created_at, updated_at";

/// Provides lookup, provisioning, and the reservation CAS for users.
pub struct UserRepo;

impl UserRepo {
    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by the authentication provider's opaque subject.
    pub async fn find_by_subject(
        pool: &PgPool,
        subject: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE subject = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(subject)
            .fetch_optional(pool)
            .await
    }

    /// Provision the ledger row on first authentication, or return the
    /// existing row. Single statement, so concurrent first sessions for the
    /// same subject cannot create two rows.
    pub async fn find_or_create(
        pool: &PgPool,
        subject: &str,
        display_name: &str,
    ) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (subject, display_name)
             VALUES ($1, $2)
             ON CONFLICT ON CONSTRAINT uq_users_subject
                 DO UPDATE SET updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(subject)
            .bind(display_name)
            .fetch_one(pool)
            .await
    }

    /// Apply a reservation, conditioned on every ledger field read when the
    /// snapshot was taken still matching the row (compound compare-and-swap;
    /// `IS NOT DISTINCT FROM` treats null-vs-null as a match).
    ///
    /// Returns `None` when a concurrent reservation mutated the row first —
    /// the caller re-reads and re-decides, it must not blindly re-apply.
    pub async fn try_reserve(
        pool: &PgPool,
        id: DbId,
        snapshot: &LedgerSnapshot,
        plan: &ReservationPlan,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                tokens_current = $2,
                cooldown_until = $3,
                total_generations = $4,
                updated_at = NOW()
             WHERE id = $1
               AND tokens_current = $5
               AND cooldown_until IS NOT DISTINCT FROM $6
               AND total_generations = $7
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(plan.tokens_current)
            .bind(plan.cooldown_until)
            .bind(plan.total_generations)
            .bind(snapshot.tokens_current)
            .bind(snapshot.cooldown_until)
            .bind(snapshot.total_generations)
            .fetch_optional(pool)
            .await
    }
}
