use actix_web::error::ResponseError;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;
use thiserror::Error;

use crate::errors::ErrorCode;
use crate::trace_ctx;

#[derive(Serialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub type_: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub code: String,
    pub trace_id: String,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {detail}")]
    Validation { code: ErrorCode, detail: String },
    #[error("Bad request: {detail}")]
    BadRequest { code: ErrorCode, detail: String },
    #[error("Not found: {detail}")]
    NotFound { code: ErrorCode, detail: String },
    #[error("Unauthorized")]
    Unauthorized,
    #[error("UnauthorizedMissingBearer")]
    UnauthorizedMissingBearer,
    #[error("UnauthorizedInvalidSignature")]
    UnauthorizedInvalidSignature,
    #[error("UnauthorizedExpiredToken")]
    UnauthorizedExpiredToken,
    #[error("UnauthorizedMalformedToken")]
    UnauthorizedMalformedToken,
    #[error("UnauthorizedWrongTokenKind")]
    UnauthorizedWrongTokenKind,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Rate limit exceeded, retry after {retry_after}s")]
    RateLimited { retry_after: u64 },
    #[error("Upstream service error: {detail}")]
    Upstream { detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
    #[error("Internal error: {detail}")]
    Internal { detail: String },
}

impl AppError {
    /// Helper method to extract the error code from any error variant
    fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation { code, .. } => *code,
            AppError::BadRequest { code, .. } => *code,
            AppError::NotFound { code, .. } => *code,
            AppError::Unauthorized => ErrorCode::Unauthorized,
            AppError::UnauthorizedMissingBearer => ErrorCode::UnauthorizedMissingBearer,
            AppError::UnauthorizedInvalidSignature => ErrorCode::UnauthorizedInvalidSignature,
            AppError::UnauthorizedExpiredToken => ErrorCode::UnauthorizedExpiredToken,
            AppError::UnauthorizedMalformedToken => ErrorCode::UnauthorizedMalformedToken,
            AppError::UnauthorizedWrongTokenKind => ErrorCode::UnauthorizedWrongTokenKind,
            AppError::InvalidCredentials => ErrorCode::InvalidCredentials,
            AppError::RateLimited { .. } => ErrorCode::RateLimitExceeded,
            AppError::Upstream { .. } => ErrorCode::ExternalServiceError,
            AppError::Config { .. } => ErrorCode::ConfigError,
            AppError::Internal { .. } => ErrorCode::InternalError,
        }
    }

    /// Helper method to extract the human-readable detail from any error variant
    fn detail(&self) -> String {
        match self {
            AppError::Validation { detail, .. } => detail.clone(),
            AppError::BadRequest { detail, .. } => detail.clone(),
            AppError::NotFound { detail, .. } => detail.clone(),
            AppError::Unauthorized => "Authentication required".to_string(),
            AppError::UnauthorizedMissingBearer => {
                "Missing or malformed Bearer token".to_string()
            }
            AppError::UnauthorizedInvalidSignature => "Invalid token signature".to_string(),
            AppError::UnauthorizedExpiredToken => "Token expired".to_string(),
            AppError::UnauthorizedMalformedToken => "Malformed token".to_string(),
            AppError::UnauthorizedWrongTokenKind => {
                "Wrong token type for this operation".to_string()
            }
            AppError::InvalidCredentials => "Invalid email or password".to_string(),
            AppError::RateLimited { .. } => "Too many requests".to_string(),
            AppError::Upstream { detail } => detail.clone(),
            AppError::Config { detail } => detail.clone(),
            AppError::Internal { detail } => detail.clone(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::UnauthorizedMissingBearer => StatusCode::UNAUTHORIZED,
            AppError::UnauthorizedInvalidSignature => StatusCode::UNAUTHORIZED,
            AppError::UnauthorizedExpiredToken => StatusCode::UNAUTHORIZED,
            AppError::UnauthorizedMalformedToken => StatusCode::UNAUTHORIZED,
            AppError::UnauthorizedWrongTokenKind => StatusCode::UNAUTHORIZED,
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::Upstream { .. } => StatusCode::BAD_REQUEST,
            AppError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn validation(code: ErrorCode, detail: String) -> Self {
        Self::Validation { code, detail }
    }

    pub fn bad_request(code: ErrorCode, detail: String) -> Self {
        Self::BadRequest { code, detail }
    }

    pub fn not_found(code: ErrorCode, detail: String) -> Self {
        Self::NotFound { code, detail }
    }

    pub fn unauthorized() -> Self {
        Self::Unauthorized
    }

    pub fn unauthorized_missing_bearer() -> Self {
        Self::UnauthorizedMissingBearer
    }

    pub fn duplicate_user() -> Self {
        Self::BadRequest {
            code: ErrorCode::UserAlreadyExists,
            detail: "User with this email already exists".to_string(),
        }
    }

    pub fn login_failed() -> Self {
        Self::BadRequest {
            code: ErrorCode::LoginFailed,
            detail: "Login failed".to_string(),
        }
    }

    pub fn user_not_found() -> Self {
        Self::NotFound {
            code: ErrorCode::UserNotFound,
            detail: "User not found".to_string(),
        }
    }

    pub fn rate_limited(retry_after: u64) -> Self {
        Self::RateLimited { retry_after }
    }

    pub fn upstream(detail: String) -> Self {
        Self::Upstream { detail }
    }

    pub fn config(detail: String) -> Self {
        Self::Config { detail }
    }

    pub fn internal(detail: String) -> Self {
        Self::Internal { detail }
    }

    fn humanize_code(code: &str) -> String {
        code.split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    None => String::new(),
                    Some(first) => first
                        .to_uppercase()
                        .chain(chars.flat_map(char::to_lowercase))
                        .collect(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();
        let code = self.code().as_str();
        let detail = self.detail();
        let trace_id = trace_ctx::trace_id();

        let problem_details = ProblemDetails {
            type_: format!("https://driftvault.app/errors/{code}"),
            title: Self::humanize_code(code),
            status: status.as_u16(),
            detail,
            code: code.to_string(),
            trace_id: trace_id.clone(),
        };

        let mut builder = HttpResponse::build(status);
        builder
            .content_type("application/problem+json")
            .insert_header(("x-request-id", trace_id));

        if let AppError::RateLimited { retry_after } = self {
            builder.insert_header(("retry-after", retry_after.to_string()));
        }

        builder.json(problem_details)
    }
}
