use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Base URL of the image-generation producer; unset selects the stub.
    pub producer_base_url: Option<String>,
    /// Directory the filesystem object store writes into.
    pub storage_root: String,
    /// Public URL prefix under which stored objects resolve.
    pub storage_public_url: String,
    /// Dispatcher poll interval in milliseconds (default: `1000`).
    pub dispatcher_poll_ms: u64,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                       |
    /// |------------------------|-------------------------------|
    /// | `HOST`                 | `0.0.0.0`                     |
    /// | `PORT`                 | `3000`                        |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`       |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                          |
    /// | `PRODUCER_BASE_URL`    | unset (stub producer)         |
    /// | `STORAGE_ROOT`         | `./data/images`               |
    /// | `STORAGE_PUBLIC_URL`   | `http://localhost:3000/images`|
    /// | `DISPATCHER_POLL_MS`   | `1000`                        |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let producer_base_url = std::env::var("PRODUCER_BASE_URL").ok();

        let storage_root =
            std::env::var("STORAGE_ROOT").unwrap_or_else(|_| "./data/images".into());

        let storage_public_url = std::env::var("STORAGE_PUBLIC_URL")
            .unwrap_or_else(|_| "http://localhost:3000/images".into());

        let dispatcher_poll_ms: u64 = std::env::var("DISPATCHER_POLL_MS")
            .unwrap_or_else(|_| "1000".into())
            .parse()
            .expect("DISPATCHER_POLL_MS must be a valid u64");

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            producer_base_url,
            storage_root,
            storage_public_url,
            dispatcher_poll_ms,
            jwt,
        }
    }
}
