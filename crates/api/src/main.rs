use std::net::SocketAddr;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mural_api::auth::provider::StubIdentity;
use mural_api::config::ServerConfig;
use mural_api::engine::GenerationDispatcher;
use mural_api::producer::{ArtifactProducer, HttpProducer, StubProducer};
use mural_api::router::build_app_router;
use mural_api::state::AppState;
use mural_api::storage::FsStore;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mural_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = mural_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    mural_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    mural_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- External collaborators ---
    let producer: Arc<dyn ArtifactProducer> = match &config.producer_base_url {
        Some(base_url) => {
            tracing::info!(%base_url, "Using HTTP producer");
            Arc::new(HttpProducer::new(base_url.clone()))
        }
        None => {
            tracing::warn!("PRODUCER_BASE_URL unset, using stub producer");
            Arc::new(StubProducer)
        }
    };
    let store = Arc::new(FsStore::new(
        config.storage_root.clone(),
        config.storage_public_url.clone(),
    ));
    let identity = Arc::new(StubIdentity);

    // --- Generation dispatcher ---
    let dispatcher_cancel = CancellationToken::new();
    let dispatcher = GenerationDispatcher::new(pool.clone(), producer.clone(), store.clone())
        .with_poll_interval(std::time::Duration::from_millis(config.dispatcher_poll_ms));
    let dispatcher_cancel_clone = dispatcher_cancel.clone();
    let dispatcher_handle = tokio::spawn(async move {
        dispatcher.run(dispatcher_cancel_clone).await;
    });

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        identity,
        producer,
        store,
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    dispatcher_cancel.cancel();
    let _ = dispatcher_handle.await;

    tracing::info!("Shutdown complete");
}

/// Resolve when SIGINT (Ctrl-C) or SIGTERM arrives.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
