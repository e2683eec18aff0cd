//! Reservation decision logic for the token ledger.
//!
//! A reservation atomically deducts the model cost and arms the cooldown.
//! The decision itself is pure: given a snapshot of the ledger row and the
//! current instant, either refuse with a business-rule error or produce the
//! replacement values. Applying the plan is the database layer's job — a
//! single conditional UPDATE matching every snapshot field, retried a
//! bounded number of times by `mural_db::services::ledger`.

use chrono::Duration;

use crate::error::CoreError;
use crate::types::Timestamp;

/// Lockout after each successful reservation, independent of model.
pub const COOLDOWN_SECS: i64 = 15;

/// Upper bound on ledger CAS attempts before surfacing [`CoreError::Contention`].
pub const MAX_RESERVE_ATTEMPTS: u32 = 3;

/// The ledger fields a reservation reads and conditions its update on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerSnapshot {
    pub tokens_current: i32,
    pub cooldown_until: Option<Timestamp>,
    pub total_generations: i32,
}

/// Replacement values for a granted reservation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationPlan {
    pub tokens_current: i32,
    pub cooldown_until: Timestamp,
    pub total_generations: i32,
}

/// Evaluate cooldown and balance against a snapshot.
///
/// Both failures are final answers for that snapshot — callers must not
/// retry them, only a lost CAS warrants re-reading.
pub fn check_reservation(
    snapshot: &LedgerSnapshot,
    cost: i32,
    now: Timestamp,
) -> Result<(), CoreError> {
    if let Some(until) = snapshot.cooldown_until {
        if until > now {
            return Err(CoreError::CooldownActive {
                remaining_secs: (until - now).num_seconds().max(1),
            });
        }
    }
    if snapshot.tokens_current < cost {
        return Err(CoreError::InsufficientTokens {
            required: cost,
            available: snapshot.tokens_current,
        });
    }
    Ok(())
}

/// Check the snapshot and compute the replacement row values.
pub fn plan_reservation(
    snapshot: &LedgerSnapshot,
    cost: i32,
    now: Timestamp,
) -> Result<ReservationPlan, CoreError> {
    check_reservation(snapshot, cost, now)?;
    Ok(ReservationPlan {
        tokens_current: snapshot.tokens_current - cost,
        cooldown_until: now + Duration::seconds(COOLDOWN_SECS),
        total_generations: snapshot.total_generations + 1,
    })
}
