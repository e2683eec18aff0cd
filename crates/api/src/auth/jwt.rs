//! JWT session tokens.
//!
//! Tokens carry the user's internal id as `sub`; identity verification
//! itself is delegated to the [`crate::auth::provider::IdentityProvider`]
//! before a token is ever issued.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use mural_core::types::DbId;
use serde::{Deserialize, Serialize};

/// JWT signing configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    /// Session lifetime in seconds (default: 24 hours).
    pub expiry_secs: i64,
}

impl JwtConfig {
    /// Load from `JWT_SECRET` / `JWT_EXPIRY_SECS`.
    ///
    /// A missing secret gets a fixed development value; production
    /// deployments must set `JWT_SECRET`.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET")
            .unwrap_or_else(|_| "mural-dev-secret-do-not-deploy".into());
        let expiry_secs: i64 = std::env::var("JWT_EXPIRY_SECS")
            .unwrap_or_else(|_| "86400".into())
            .parse()
            .expect("JWT_EXPIRY_SECS must be a valid i64");
        Self { secret, expiry_secs }
    }
}

/// Claims carried by a session token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Internal user id.
    pub sub: DbId,
    /// Expiry as a Unix timestamp.
    pub exp: i64,
}

/// Issue a session token for a user.
pub fn issue_token(user_id: DbId, config: &JwtConfig) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims {
        sub: user_id,
        exp: (Utc::now() + Duration::seconds(config.expiry_secs)).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Validate a session token and return its claims.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret".into(),
            expiry_secs: 3600,
        }
    }

    #[test]
    fn issued_token_validates() {
        let config = test_config();
        let token = issue_token(42, &config).unwrap();
        let claims = validate_token(&token, &config).unwrap();
        assert_eq!(claims.sub, 42);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = issue_token(42, &test_config()).unwrap();
        let other = JwtConfig {
            secret: "different".into(),
            expiry_secs: 3600,
        };
        assert!(validate_token(&token, &other).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(validate_token("not-a-jwt", &test_config()).is_err());
    }
}
