//! Slot placement service: bind an approved generation's image to a grid
//! coordinate.
//!
//! Under concurrent attempts at the same coordinate exactly one placement
//! becomes current; every other attempt either fails cleanly with
//! [`CoreError::SlotConflict`] or is superseded later. The protocol is
//! tentative insert, conditional commit, compensate on loss:
//!
//! 1. resolve-or-create the slot (unique-violation race falls back to a
//!    re-read — creation is idempotent from the caller's perspective);
//! 2. insert the placement row unconditionally (always valid history);
//! 3. CAS the slot's current pointer on the version observed in step 1;
//! 4. on CAS loss, delete the placement from step 2 and surface the
//!    conflict. Whether to retry is the caller's decision — no internal
//!    retry here.

use mural_core::error::CoreError;
use mural_core::generation::GenerationStatus;
use mural_core::grid;
use mural_core::types::DbId;
use sqlx::PgPool;

use crate::is_unique_violation;
use crate::models::placement::{CreatePlacement, Placement};
use crate::models::slot::Slot;
use crate::repositories::{GenerationRepo, PlacementRepo, SlotRepo};
use crate::services::ServiceError;

/// A successful bind: the new placement and the slot now pointing at it.
#[derive(Debug)]
pub struct PlacementOutcome {
    pub placement: Placement,
    pub slot: Slot,
}

pub struct SlotPlacement;

impl SlotPlacement {
    /// Place `generation_id`'s image at `(z, x, y)` on behalf of `user_id`.
    ///
    /// Preconditions, checked in order before any slot access: the
    /// generation exists, belongs to the caller, is `approved`, and carries
    /// an image URL.
    pub async fn place(
        pool: &PgPool,
        user_id: DbId,
        generation_id: DbId,
        z: i32,
        x: i32,
        y: i32,
    ) -> Result<PlacementOutcome, ServiceError> {
        grid::validate_coords(z, x, y)?;

        let generation = GenerationRepo::find_by_id(pool, generation_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Generation",
                id: generation_id,
            })?;

        if generation.user_id != user_id {
            return Err(CoreError::Forbidden(
                "generation belongs to another user".to_string(),
            )
            .into());
        }

        let status = GenerationStatus::parse(&generation.status)?;
        if status != GenerationStatus::Approved {
            return Err(CoreError::GenerationNotApproved {
                status: generation.status.clone(),
            }
            .into());
        }

        let image_url = generation.image_url.clone().ok_or(CoreError::MissingImage)?;

        let slot = Self::resolve_slot(pool, z, x, y).await?;

        let placement = PlacementRepo::create(
            pool,
            &CreatePlacement {
                slot_id: slot.id,
                user_id,
                generation_id,
                image_url,
            },
        )
        .await?;

        match SlotRepo::try_set_current(pool, slot.id, placement.id, slot.version).await? {
            Some(updated) => {
                tracing::info!(
                    user_id,
                    generation_id,
                    slot_id = updated.id,
                    z,
                    x,
                    y,
                    version = updated.version,
                    "Placement committed"
                );
                Ok(PlacementOutcome {
                    placement,
                    slot: updated,
                })
            }
            None => {
                // Lost the version race. Remove the tentative row so no
                // placement exists that was never current and never will be.
                PlacementRepo::delete(pool, placement.id).await?;
                tracing::debug!(
                    user_id,
                    slot_id = slot.id,
                    z,
                    x,
                    y,
                    "Slot version moved, placement rolled back"
                );
                Err(CoreError::SlotConflict { z, x, y }.into())
            }
        }
    }

    /// Read the slot for `(z, x, y)`, creating it at `version = 0` if this
    /// is the first placement attempt there. Losing the insert race to a
    /// concurrent first placement falls back to the row that now exists.
    async fn resolve_slot(
        pool: &PgPool,
        z: i32,
        x: i32,
        y: i32,
    ) -> Result<Slot, ServiceError> {
        if let Some(slot) = SlotRepo::find_by_coords(pool, z, x, y).await? {
            return Ok(slot);
        }

        match SlotRepo::insert(pool, z, x, y).await {
            Ok(slot) => Ok(slot),
            Err(err) if is_unique_violation(&err, "uq_slots_coords") => {
                SlotRepo::find_by_coords(pool, z, x, y)
                    .await?
                    .ok_or_else(|| {
                        ServiceError::Core(CoreError::Internal(format!(
                            "slot ({z}, {x}, {y}) vanished after unique conflict"
                        )))
                    })
            }
            Err(err) => Err(err.into()),
        }
    }
}
