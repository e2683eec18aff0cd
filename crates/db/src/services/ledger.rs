//! Token ledger service: atomically decide whether a reservation may
//! proceed and, if so, apply it.
//!
//! Two concurrent reservations can never both succeed against the same
//! starting balance: the update is conditioned on every ledger field the
//! decision read. A lost CAS means another reservation landed in between —
//! the loop re-reads and re-decides against the fresh row, up to
//! [`MAX_RESERVE_ATTEMPTS`] times. Cooldown and balance refusals are final
//! for a given snapshot and are never retried.

use chrono::Utc;
use mural_core::error::CoreError;
use mural_core::ledger::{plan_reservation, MAX_RESERVE_ATTEMPTS};
use mural_core::pricing;
use mural_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::User;
use crate::repositories::UserRepo;
use crate::services::ServiceError;

pub struct TokenLedger;

impl TokenLedger {
    /// Reserve the cost of one `model` generation from `user_id`'s balance
    /// and arm the cooldown. Returns the updated ledger row.
    pub async fn reserve(
        pool: &PgPool,
        user_id: DbId,
        model: &str,
    ) -> Result<User, ServiceError> {
        let cost = pricing::require_cost(model)?;

        for attempt in 1..=MAX_RESERVE_ATTEMPTS {
            let user = UserRepo::find_by_id(pool, user_id)
                .await?
                .ok_or(CoreError::NotFound {
                    entity: "User",
                    id: user_id,
                })?;

            let snapshot = user.ledger_snapshot();
            let plan = plan_reservation(&snapshot, cost, Utc::now())?;

            if let Some(updated) = UserRepo::try_reserve(pool, user_id, &snapshot, &plan).await? {
                tracing::info!(
                    user_id,
                    model,
                    cost,
                    tokens_remaining = updated.tokens_current,
                    "Reservation granted"
                );
                return Ok(updated);
            }

            tracing::debug!(user_id, attempt, "Ledger CAS lost, re-reading");
        }

        Err(CoreError::Contention {
            attempts: MAX_RESERVE_ATTEMPTS,
        }
        .into())
    }
}
