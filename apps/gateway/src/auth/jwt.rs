use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::auth::claims::{Claims, TokenKind};
use crate::error::AppError;
use crate::state::security_config::SecurityConfig;

/// Mint a signed token of the given kind.
///
/// The lifetime comes from the security config (`access_ttl` or
/// `refresh_ttl`); the signing key and algorithm are process-wide and fixed
/// at startup.
pub fn mint_token(
    sub: &str,
    email: &str,
    kind: TokenKind,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<String, AppError> {
    let iat = now
        .duration_since(UNIX_EPOCH)
        .map_err(|_| AppError::internal("Failed to get current time".to_string()))?
        .as_secs() as i64;

    let exp = iat + security.ttl_for(kind).as_secs() as i64;

    let claims = Claims {
        sub: sub.to_string(),
        email: email.to_string(),
        kind,
        iat,
        exp,
    };

    encode(
        &Header::new(security.algorithm),
        &claims,
        &EncodingKey::from_secret(&security.jwt_secret),
    )
    .map_err(|e| AppError::internal(format!("Failed to encode JWT: {e}")))
}

/// Verify a token's signature and expiry and return its claims.
///
/// Expiry is checked with zero leeway: a token is rejected the instant its
/// `exp` is reached. The token kind is deliberately NOT checked here; call
/// [`require_kind`] wherever the kind matters.
///
/// Errors:
/// - Expired token → `AppError::UnauthorizedExpiredToken`
/// - Signature mismatch → `AppError::UnauthorizedInvalidSignature`
/// - Any other decode failure → `AppError::UnauthorizedMalformedToken`
pub fn verify_token(token: &str, security: &SecurityConfig) -> Result<Claims, AppError> {
    let mut validation = Validation::new(security.algorithm);
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(&security.jwt_secret),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::UnauthorizedExpiredToken,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => {
            AppError::UnauthorizedInvalidSignature
        }
        _ => AppError::UnauthorizedMalformedToken,
    })
}

/// Reject claims whose kind does not match the expected one.
///
/// This is a caller obligation, not part of [`verify_token`]: the refresh
/// flow must reject access tokens presented as refresh tokens and vice
/// versa.
pub fn require_kind(claims: &Claims, expected: TokenKind) -> Result<(), AppError> {
    if claims.kind != expected {
        return Err(AppError::UnauthorizedWrongTokenKind);
    }
    Ok(())
}
