//! Concurrency-controlled state-transition services.
//!
//! The three multi-step protocols of the system live here, each coordinating
//! exclusively through single-statement conditional updates in the
//! repository layer — no in-process locks, no transactions held across
//! decisions:
//!
//! - [`ledger::TokenLedger`] — bounded compare-and-swap retry loop for
//!   token reservations.
//! - [`placement::SlotPlacement`] — resolve slot, insert placement, CAS the
//!   current pointer, compensate on loss.
//! - [`lifecycle::GenerationLifecycle`] — forward-only generation status
//!   transitions.

pub mod ledger;
pub mod lifecycle;
pub mod placement;

use mural_core::error::CoreError;

/// Error type for service operations: either a domain decision or a
/// database failure.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}
