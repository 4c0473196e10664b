//! Error codes for the gateway API.
//!
//! This module defines all error codes used throughout the application.
//! Add new codes here; never pass ad-hoc strings as error codes.
//!
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that appear in HTTP responses.

use core::fmt;

/// Centralized error codes for the gateway API.
///
/// Each variant maps to a canonical SCREAMING_SNAKE_CASE string that appears
/// in HTTP responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication & Authorization
    /// Authentication required
    Unauthorized,
    /// Missing or malformed Bearer token
    UnauthorizedMissingBearer,
    /// Token signature does not verify
    UnauthorizedInvalidSignature,
    /// Token has expired
    UnauthorizedExpiredToken,
    /// Token structure could not be parsed
    UnauthorizedMalformedToken,
    /// Token kind does not match the operation
    UnauthorizedWrongTokenKind,
    /// Email/password pair was rejected upstream
    InvalidCredentials,

    // Registration & Login
    /// An account with this email already exists
    UserAlreadyExists,
    /// Login failed for a reason other than bad credentials
    LoginFailed,

    // Resource Not Found
    /// User profile not found
    UserNotFound,

    // Request Validation
    /// Invalid email address
    InvalidEmail,
    /// Password does not meet the minimum length
    InvalidPassword,
    /// General validation error (malformed request body)
    ValidationError,

    // Infrastructure
    /// Per-client request budget exhausted
    RateLimitExceeded,
    /// Opaque upstream (Appwrite) failure
    ExternalServiceError,
    /// Startup configuration error
    ConfigError,
    /// Internal server error
    InternalError,
}

impl ErrorCode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::UnauthorizedMissingBearer => "UNAUTHORIZED_MISSING_BEARER",
            ErrorCode::UnauthorizedInvalidSignature => "UNAUTHORIZED_INVALID_SIGNATURE",
            ErrorCode::UnauthorizedExpiredToken => "UNAUTHORIZED_EXPIRED_TOKEN",
            ErrorCode::UnauthorizedMalformedToken => "UNAUTHORIZED_MALFORMED_TOKEN",
            ErrorCode::UnauthorizedWrongTokenKind => "UNAUTHORIZED_WRONG_TOKEN_KIND",
            ErrorCode::InvalidCredentials => "INVALID_CREDENTIALS",
            ErrorCode::UserAlreadyExists => "USER_ALREADY_EXISTS",
            ErrorCode::LoginFailed => "LOGIN_FAILED",
            ErrorCode::UserNotFound => "USER_NOT_FOUND",
            ErrorCode::InvalidEmail => "INVALID_EMAIL",
            ErrorCode::InvalidPassword => "INVALID_PASSWORD",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            ErrorCode::ExternalServiceError => "EXTERNAL_SERVICE_ERROR",
            ErrorCode::ConfigError => "CONFIG_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
