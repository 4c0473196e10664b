//! Claims embedded in gateway-issued tokens.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Which of the two token families a token belongs to.
///
/// Access and refresh tokens share the same signing scheme; only the kind
/// and lifetime differ. Verification never checks the kind by itself —
/// call sites that care must apply [`crate::auth::jwt::require_kind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Access => f.write_str("access"),
            TokenKind::Refresh => f.write_str("refresh"),
        }
    }
}

/// Claims included in gateway-issued access and refresh tokens.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// External user identifier (Appwrite account id)
    pub sub: String,
    pub email: String,
    /// Token kind (`access` | `refresh`)
    pub kind: TokenKind,
    /// Issued-at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
}
