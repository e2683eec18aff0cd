//! User entity model — one row per user, doubling as the token ledger.

use mural_core::ledger::LedgerSnapshot;
use mural_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// The ledger fields (`tokens_current`, `cooldown_until`,
/// `total_generations`) are only ever mutated through
/// [`crate::repositories::UserRepo::try_reserve`].
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    /// Opaque identity from the authentication provider.
    pub subject: String,
    pub display_name: String,
    pub tokens_current: i32,
    pub tokens_max: i32,
    pub cooldown_until: Option<Timestamp>,
    pub total_generations: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// The ledger fields a reservation reads and conditions its CAS on.
    pub fn ledger_snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            tokens_current: self.tokens_current,
            cooldown_until: self.cooldown_until,
            total_generations: self.total_generations,
        }
    }

    pub fn token_state(&self) -> TokenState {
        TokenState {
            tokens_current: self.tokens_current,
            tokens_max: self.tokens_max,
            cooldown_until: self.cooldown_until,
            total_generations: self.total_generations,
        }
    }
}

/// Ledger view returned alongside reservation results.
#[derive(Debug, Clone, Serialize)]
pub struct TokenState {
    pub tokens_current: i32,
    pub tokens_max: i32,
    pub cooldown_until: Option<Timestamp>,
    pub total_generations: i32,
}
