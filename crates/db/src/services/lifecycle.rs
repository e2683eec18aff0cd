//! Generation request lifecycle: creation and forward-only status
//! transitions.
//!
//! The repository encodes legal prior states in each transition's WHERE
//! clause; this service interprets an unaffected row — distinguishing a
//! missing generation from an illegal transition — and freezes `token_cost`
//! at creation.

use mural_core::error::CoreError;
use mural_core::generation::{validate_size, GenerationStatus};
use mural_core::pricing;
use mural_core::types::DbId;
use sqlx::PgPool;

use crate::models::generation::{CreateGeneration, Generation};
use crate::repositories::GenerationRepo;
use crate::services::ServiceError;

pub struct GenerationLifecycle;

impl GenerationLifecycle {
    /// Create a request in `queued` with `token_cost` fixed to the model's
    /// current price. Rejects unknown models and sizes before any insert.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        prompt: &str,
        model: &str,
        size: &str,
    ) -> Result<Generation, ServiceError> {
        let token_cost = pricing::require_cost(model)?;
        validate_size(size)?;

        let generation = GenerationRepo::create(
            pool,
            &CreateGeneration {
                user_id,
                prompt: prompt.to_string(),
                model: model.to_string(),
                size: size.to_string(),
                token_cost,
            },
        )
        .await?;

        tracing::info!(
            user_id,
            generation_id = generation.id,
            model,
            token_cost,
            "Generation queued"
        );
        Ok(generation)
    }

    /// `queued -> generating`.
    pub async fn mark_generating(pool: &PgPool, id: DbId) -> Result<Generation, ServiceError> {
        match GenerationRepo::mark_generating(pool, id).await? {
            Some(generation) => Ok(generation),
            None => Err(Self::refusal(pool, id, GenerationStatus::Generating).await),
        }
    }

    /// Terminal: `approved` with the stored artifact URL.
    pub async fn mark_approved(
        pool: &PgPool,
        id: DbId,
        image_url: &str,
    ) -> Result<Generation, ServiceError> {
        match GenerationRepo::mark_approved(pool, id, image_url).await? {
            Some(generation) => Ok(generation),
            None => Err(Self::refusal(pool, id, GenerationStatus::Approved).await),
        }
    }

    /// Terminal: `rejected` with a content-policy reason.
    pub async fn mark_rejected(
        pool: &PgPool,
        id: DbId,
        reason: &str,
    ) -> Result<Generation, ServiceError> {
        match GenerationRepo::mark_rejected(pool, id, reason).await? {
            Some(generation) => Ok(generation),
            None => Err(Self::refusal(pool, id, GenerationStatus::Rejected).await),
        }
    }

    /// Terminal: `failed` with the producer's error message.
    pub async fn mark_failed(
        pool: &PgPool,
        id: DbId,
        message: &str,
    ) -> Result<Generation, ServiceError> {
        match GenerationRepo::mark_failed(pool, id, message).await? {
            Some(generation) => Ok(generation),
            None => Err(Self::refusal(pool, id, GenerationStatus::Failed).await),
        }
    }

    /// Explain a transition that affected no row: either the generation does
    /// not exist, or its current status forbids the move.
    async fn refusal(pool: &PgPool, id: DbId, to: GenerationStatus) -> ServiceError {
        match GenerationRepo::find_by_id(pool, id).await {
            Ok(Some(generation)) => ServiceError::Core(CoreError::InvalidTransition {
                from: generation.status,
                to: to.as_str().to_string(),
            }),
            Ok(None) => ServiceError::Core(CoreError::NotFound {
                entity: "Generation",
                id,
            }),
            Err(err) => ServiceError::Database(err),
        }
    }
}
