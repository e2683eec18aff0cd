//! Object storage contract.
//!
//! Given bytes and a key, a store returns a publicly resolvable URL. The
//! platform persists that URL as an opaque string and never parses it.

use std::path::PathBuf;

use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
#[error("object store error: {0}")]
pub struct StoreError(pub String);

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` under `key` and return the public URL.
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<String, StoreError>;
}

/// Filesystem store for development: writes under a root directory that a
/// static file server (or the CDN mount in the reference deployment)
/// exposes at `public_url`.
pub struct FsStore {
    root: PathBuf,
    public_url: String,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>, public_url: String) -> Self {
        Self {
            root: root.into(),
            public_url,
        }
    }
}

#[async_trait]
impl ObjectStore for FsStore {
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<String, StoreError> {
        let path = self.root.join(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError(format!("creating {}: {e}", parent.display())))?;
        }
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| StoreError(format!("writing {}: {e}", path.display())))?;
        Ok(format!("{}/{key}", self.public_url))
    }
}
