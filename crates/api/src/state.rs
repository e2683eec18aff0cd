use std::sync::Arc;

use crate::auth::provider::IdentityProvider;
use crate::config::ServerConfig;
use crate::producer::ArtifactProducer;
use crate::storage::ObjectStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: mural_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// External identity provider (OAuth exchange in production).
    pub identity: Arc<dyn IdentityProvider>,
    /// External image-generation producer.
    pub producer: Arc<dyn ArtifactProducer>,
    /// Object storage for produced images.
    pub store: Arc<dyn ObjectStore>,
}
