//! Environment-sourced application settings.
//!
//! Environment variables must be set by the runtime environment:
//! - Docker: via docker-compose env_file or docker run --env-file
//! - Local dev: source env files manually (e.g., set -a; . ./.env; set +a)
//!
//! Every variable is required; startup fails with a config error when one
//! is missing or unparseable.

use std::env;

use jsonwebtoken::Algorithm;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct Settings {
    // App
    pub app_name: String,
    pub app_env: String,
    pub debug: bool,
    pub api_version: String,
    pub frontend_url: String,

    // Tokens
    pub jwt_secret: String,
    pub jwt_algorithm: Algorithm,
    pub jwt_access_ttl_minutes: u64,
    pub jwt_refresh_ttl_days: u64,

    // Appwrite
    pub appwrite_endpoint: String,
    pub appwrite_project_id: String,
    pub appwrite_api_key: String,
    pub appwrite_database_id: String,
    pub collection_users: String,

    // CORS
    pub cors_origins: String,

    // Security. Password hashing is delegated to Appwrite; the cost factor
    // is accepted for deployment-env parity but never used directly.
    pub bcrypt_rounds: u32,
}

impl Settings {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            app_name: require("APP_NAME")?,
            app_env: require("APP_ENV")?,
            debug: parse_bool("DEBUG", &require("DEBUG")?)?,
            api_version: require("API_VERSION")?,
            frontend_url: require("FRONTEND_URL")?,
            jwt_secret: require("JWT_SECRET_KEY")?,
            jwt_algorithm: parse_algorithm(&require("JWT_ALGORITHM")?)?,
            jwt_access_ttl_minutes: parse_u64(
                "JWT_ACCESS_TOKEN_EXPIRE_MINUTES",
                &require("JWT_ACCESS_TOKEN_EXPIRE_MINUTES")?,
            )?,
            jwt_refresh_ttl_days: parse_u64(
                "JWT_REFRESH_TOKEN_EXPIRE_DAYS",
                &require("JWT_REFRESH_TOKEN_EXPIRE_DAYS")?,
            )?,
            appwrite_endpoint: require("APPWRITE_ENDPOINT")?,
            appwrite_project_id: require("APPWRITE_PROJECT_ID")?,
            appwrite_api_key: require("APPWRITE_API_KEY")?,
            appwrite_database_id: require("APPWRITE_DATABASE_ID")?,
            collection_users: require("COLLECTION_USERS")?,
            cors_origins: require("CORS_ORIGINS")?,
            bcrypt_rounds: parse_u64("BCRYPT_ROUNDS", &require("BCRYPT_ROUNDS")?)? as u32,
        })
    }

    /// Parse and lightly validate the comma-separated CORS origin list.
    /// Empty and "null" entries are ignored, as are non-http(s) schemes.
    pub fn cors_origins_list(&self) -> Vec<String> {
        self.cors_origins
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty() && *s != "null")
            .filter(|s| s.starts_with("http://") || s.starts_with("https://"))
            .map(|s| s.to_string())
            .collect()
    }
}

fn require(name: &'static str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::config(format!("{name} must be set")))
}

fn parse_bool(name: &'static str, raw: &str) -> Result<bool, AppError> {
    match raw {
        _ if raw.eq_ignore_ascii_case("true") || raw == "1" => Ok(true),
        _ if raw.eq_ignore_ascii_case("false") || raw == "0" => Ok(false),
        _ => Err(AppError::config(format!("{name} must be a boolean, got {raw:?}"))),
    }
}

fn parse_u64(name: &'static str, raw: &str) -> Result<u64, AppError> {
    raw.parse::<u64>()
        .map_err(|_| AppError::config(format!("{name} must be a positive integer, got {raw:?}")))
}

/// Only the HMAC family is supported: the gateway signs and verifies with a
/// single shared secret.
fn parse_algorithm(raw: &str) -> Result<Algorithm, AppError> {
    match raw {
        "HS256" => Ok(Algorithm::HS256),
        "HS384" => Ok(Algorithm::HS384),
        "HS512" => Ok(Algorithm::HS512),
        other => Err(AppError::config(format!(
            "JWT_ALGORITHM must be one of HS256, HS384, HS512, got {other:?}"
        ))),
    }
}
