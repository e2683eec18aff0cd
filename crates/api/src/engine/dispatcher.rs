//! Background generation dispatcher.
//!
//! Polls for queued generations every `poll_interval` and drives each one
//! to a terminal state. Claiming uses `FOR UPDATE SKIP LOCKED` via
//! [`GenerationRepo::claim_next_queued`], so multiple API instances can run
//! the loop without double-dispatch. Tokens were charged at reservation
//! time; neither rejection nor failure refunds them.

use std::sync::Arc;
use std::time::Duration;

use mural_db::models::generation::Generation;
use mural_db::repositories::GenerationRepo;
use mural_db::services::lifecycle::GenerationLifecycle;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::producer::{ArtifactProducer, ProducerOutcome};
use crate::storage::ObjectStore;

/// Default polling interval for the dispatcher loop.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Background generation dispatcher.
///
/// A single long-lived Tokio task that matches queued generations with the
/// producer and records their terminal outcome.
pub struct GenerationDispatcher {
    pool: PgPool,
    producer: Arc<dyn ArtifactProducer>,
    store: Arc<dyn ObjectStore>,
    poll_interval: Duration,
}

impl GenerationDispatcher {
    /// Create a new dispatcher with the default 1-second poll interval.
    pub fn new(
        pool: PgPool,
        producer: Arc<dyn ArtifactProducer>,
        store: Arc<dyn ObjectStore>,
    ) -> Self {
        Self {
            pool,
            producer,
            store,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Run the dispatcher loop until the cancellation token is triggered.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.poll_interval);
        tracing::info!(
            poll_interval_ms = self.poll_interval.as_millis() as u64,
            "Generation dispatcher started",
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Generation dispatcher shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    if let Err(e) = self.drain_queue().await {
                        tracing::error!(error = %e, "Dispatch cycle failed");
                    }
                }
            }
        }
    }

    /// Claim and process queued generations until the queue is empty.
    pub async fn drain_queue(&self) -> Result<(), sqlx::Error> {
        while let Some(generation) = GenerationRepo::claim_next_queued(&self.pool).await? {
            self.process(generation).await;
        }
        Ok(())
    }

    /// Drive one claimed generation to its terminal state.
    async fn process(&self, generation: Generation) {
        let id = generation.id;
        tracing::info!(
            generation_id = id,
            model = %generation.model,
            "Generation dispatched"
        );

        let outcome = self
            .producer
            .produce(&generation.prompt, &generation.model, &generation.size)
            .await;

        let result = match outcome {
            Ok(ProducerOutcome::Image(bytes)) => {
                let key = format!("generations/{id}-{}.png", Uuid::new_v4());
                match self.store.put(&key, bytes).await {
                    Ok(url) => GenerationLifecycle::mark_approved(&self.pool, id, &url).await,
                    Err(e) => {
                        GenerationLifecycle::mark_failed(
                            &self.pool,
                            id,
                            &format!("storing image failed: {e}"),
                        )
                        .await
                    }
                }
            }
            Ok(ProducerOutcome::Rejected { reason }) => {
                GenerationLifecycle::mark_rejected(&self.pool, id, &reason).await
            }
            Err(e) => GenerationLifecycle::mark_failed(&self.pool, id, &e.to_string()).await,
        };

        match result {
            Ok(terminal) => {
                tracing::info!(generation_id = id, status = %terminal.status, "Generation settled");
            }
            Err(e) => {
                // The row stays in `generating`; operators resolve it by hand.
                tracing::error!(generation_id = id, error = %e, "Recording terminal state failed");
            }
        }
    }
}
