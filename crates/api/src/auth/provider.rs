//! Delegated identity verification.
//!
//! The platform never checks credentials itself: an external provider
//! (OAuth in the reference deployment) exchanges whatever token the client
//! presents for a stable opaque subject. Everything downstream trusts that
//! subject once resolved.

use async_trait::async_trait;

/// A verified identity as reported by the provider.
#[derive(Debug, Clone)]
pub struct Identity {
    /// Stable opaque subject; the `users.subject` column.
    pub subject: String,
    pub display_name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("provider token was rejected")]
    InvalidToken,

    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
}

/// External identity provider contract.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Exchange a provider-issued token for a verified identity.
    async fn resolve(&self, provider_token: &str) -> Result<Identity, IdentityError>;
}

/// Development/test provider: accepts any non-empty token and derives a
/// deterministic subject from it, so repeated sessions map to one user row.
pub struct StubIdentity;

#[async_trait]
impl IdentityProvider for StubIdentity {
    async fn resolve(&self, provider_token: &str) -> Result<Identity, IdentityError> {
        if provider_token.is_empty() {
            return Err(IdentityError::InvalidToken);
        }
        Ok(Identity {
            subject: format!("stub:{provider_token}"),
            display_name: provider_token.to_string(),
        })
    }
}
