//! Appwrite surface used by the gateway.
//!
//! Appwrite owns the account lifecycle, password storage, and the user
//! profile collection; this module defines the subset of its API the
//! gateway calls, plus the typed error it reports. The orchestrator only
//! ever talks to the [`AppwriteApi`] trait so tests can substitute an
//! in-memory implementation.

pub mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

pub use http::AppwriteClient;

/// Account object returned by Appwrite account creation.
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "$createdAt", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub email: String,
    pub name: String,
}

/// Session object returned by email/password session creation.
#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
}

/// User profile document stored in the users collection.
///
/// The document id is the account id; it is carried separately by callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub email: String,
    pub name: String,
    pub subscription_tier: String,
    pub subscription_status: String,
    pub storage_used: i64,
    pub storage_limit: i64,
    pub email_verified: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Storage quota (MB) granted to the free tier.
const FREE_TIER_STORAGE_LIMIT_MB: i64 = 500;

impl UserProfile {
    /// Profile for a freshly registered user: free tier, active, nothing
    /// stored yet, email not verified.
    pub fn new_free_tier(email: &str, name: &str, created_at: OffsetDateTime) -> Self {
        Self {
            email: email.to_string(),
            name: name.to_string(),
            subscription_tier: "free".to_string(),
            subscription_status: "active".to_string(),
            storage_used: 0,
            storage_limit: FREE_TIER_STORAGE_LIMIT_MB,
            email_verified: false,
            created_at,
        }
    }
}

/// Generate a document/account id client-side, the way the Appwrite SDKs'
/// `ID.unique()` does, so the account and its profile document share one id.
pub fn unique_id() -> String {
    Uuid::new_v4().simple().to_string()
}

#[derive(Debug, Error)]
pub enum AppwriteError {
    /// Error response decoded from the Appwrite API.
    #[error("appwrite error ({error_type}): {message}")]
    Api {
        code: u16,
        error_type: String,
        message: String,
    },
    /// Transport-level failure before any API response was decoded.
    #[error("appwrite transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl AppwriteError {
    /// True when Appwrite rejected account creation because the email is
    /// already registered.
    pub fn is_duplicate_user(&self) -> bool {
        matches!(self, AppwriteError::Api { error_type, .. } if error_type == "user_already_exists")
    }

    /// True when Appwrite rejected a session because the credentials were
    /// wrong or the user does not exist. Both collapse into one case so the
    /// caller cannot leak which of the two it was.
    pub fn is_invalid_credentials(&self) -> bool {
        matches!(
            self,
            AppwriteError::Api { error_type, .. }
                if error_type == "user_invalid_credentials" || error_type == "user_not_found"
        )
    }

    /// Upstream message safe to surface to API clients.
    pub fn message(&self) -> String {
        match self {
            AppwriteError::Api { message, .. } => message.clone(),
            AppwriteError::Transport(_) => "Upstream service unavailable".to_string(),
        }
    }
}

/// The Appwrite operations the gateway depends on.
#[async_trait]
pub trait AppwriteApi: Send + Sync {
    /// Create an account with the given id, email, password, and name.
    async fn create_account(
        &self,
        user_id: &str,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<Account, AppwriteError>;

    /// Create an email/password session. The returned session carries the
    /// authoritative user id.
    async fn create_email_session(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AppwriteError>;

    /// Fetch the profile document with the given id from the users
    /// collection.
    async fn get_document(&self, document_id: &str) -> Result<UserProfile, AppwriteError>;

    /// Create a profile document with the given id in the users collection.
    async fn create_document(
        &self,
        document_id: &str,
        profile: &UserProfile,
    ) -> Result<UserProfile, AppwriteError>;

    /// Trigger a verification email whose link points at `redirect_url`.
    async fn create_verification(&self, redirect_url: &str) -> Result<(), AppwriteError>;
}
