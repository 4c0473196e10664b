use std::time::Duration;

use jsonwebtoken::Algorithm;

use crate::auth::claims::TokenKind;
use crate::config::settings::Settings;

/// Configuration for token signing and lifetimes.
///
/// Built once at startup and immutable thereafter; every mint/verify call
/// reads the same key material.
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// Secret key for signing and verifying tokens
    pub jwt_secret: Vec<u8>,
    /// Signing algorithm (HMAC family, defaults to HS256)
    pub algorithm: Algorithm,
    /// Access token lifetime
    pub access_ttl: Duration,
    /// Refresh token lifetime
    pub refresh_ttl: Duration,
}

impl SecurityConfig {
    /// Create a new SecurityConfig with the given secret and default lifetimes
    /// (15 minutes access, 7 days refresh).
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            algorithm: Algorithm::HS256,
            access_ttl: Duration::from_secs(15 * 60),
            refresh_ttl: Duration::from_secs(7 * 24 * 60 * 60),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            jwt_secret: settings.jwt_secret.as_bytes().to_vec(),
            algorithm: settings.jwt_algorithm,
            access_ttl: Duration::from_secs(settings.jwt_access_ttl_minutes * 60),
            refresh_ttl: Duration::from_secs(settings.jwt_refresh_ttl_days * 24 * 60 * 60),
        }
    }

    /// Lifetime applied when minting a token of the given kind.
    pub fn ttl_for(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        }
    }
}
