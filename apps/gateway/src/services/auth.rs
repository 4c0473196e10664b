//! Auth orchestration: sequences Appwrite calls, mints token pairs, and
//! classifies upstream failures into the API error taxonomy.
//!
//! Appwrite errors are mapped exactly once, here; handlers and extractors
//! never see an [`AppwriteError`].

use std::time::SystemTime;

use serde::Serialize;
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::appwrite::{self, UserProfile};
use crate::auth::claims::TokenKind;
use crate::auth::jwt::{mint_token, require_kind, verify_token};
use crate::error::AppError;
use crate::logging::pii::Redacted;
use crate::state::app_state::AppState;

/// User snapshot embedded in token responses.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub name: String,
    pub subscription_tier: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub email_verified: bool,
}

impl UserResponse {
    fn from_profile(id: &str, profile: UserProfile) -> Self {
        Self {
            id: id.to_string(),
            email: profile.email,
            name: profile.name,
            subscription_tier: profile.subscription_tier,
            created_at: profile.created_at,
            email_verified: profile.email_verified,
        }
    }
}

/// Access + refresh pair returned on register/login/refresh.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds
    pub expires_in: u64,
    pub user: UserResponse,
}

fn issue_pair(state: &AppState, sub: &str, email: &str) -> Result<(String, String), AppError> {
    let now = SystemTime::now();
    let access = mint_token(sub, email, TokenKind::Access, now, &state.security)?;
    let refresh = mint_token(sub, email, TokenKind::Refresh, now, &state.security)?;
    Ok((access, refresh))
}

fn token_response(
    state: &AppState,
    sub: &str,
    email: &str,
    user: UserResponse,
) -> Result<TokenResponse, AppError> {
    let (access_token, refresh_token) = issue_pair(state, sub, email)?;
    Ok(TokenResponse {
        access_token,
        refresh_token,
        expires_in: state.security.access_ttl.as_secs(),
        user,
    })
}

/// Register a new user.
///
/// Creates the Appwrite account, then the profile document with free-tier
/// defaults. There is no rollback: if the document write fails after the
/// account was created, the account is left orphaned and the upstream
/// error is surfaced.
pub async fn register(
    state: &AppState,
    email: &str,
    password: &str,
    name: &str,
) -> Result<TokenResponse, AppError> {
    let user_id = appwrite::unique_id();

    let account = state
        .appwrite
        .create_account(&user_id, email, password, name)
        .await
        .map_err(|e| {
            if e.is_duplicate_user() {
                AppError::duplicate_user()
            } else {
                AppError::upstream(e.message())
            }
        })?;

    let profile = UserProfile::new_free_tier(email, name, account.created_at);
    let profile = state
        .appwrite
        .create_document(&user_id, &profile)
        .await
        .map_err(|e| AppError::upstream(e.message()))?;

    // Verification email is best-effort: registration succeeds even if the
    // send fails.
    let verify_url = format!(
        "{}/verify-email",
        state.settings.frontend_url.trim_end_matches('/')
    );
    if let Err(e) = state.appwrite.create_verification(&verify_url).await {
        warn!(error = %e, user_id = %user_id, "verification email send failed");
    }

    info!(user_id = %user_id, email = %Redacted(email), "user registered");

    let user = UserResponse::from_profile(&user_id, profile);
    token_response(state, &user_id, email, user)
}

/// Log a user in with email and password.
///
/// The user id comes from the session Appwrite returns. Bad credentials and
/// unknown users collapse into one `InvalidCredentials` so responses carry
/// no enumeration hint; any other upstream failure is a generic
/// `LoginFailed`.
pub async fn login(state: &AppState, email: &str, password: &str) -> Result<TokenResponse, AppError> {
    let session = state
        .appwrite
        .create_email_session(email, password)
        .await
        .map_err(|e| {
            if e.is_invalid_credentials() {
                AppError::InvalidCredentials
            } else {
                AppError::login_failed()
            }
        })?;

    let user_id = session.user_id;

    let profile = state
        .appwrite
        .get_document(&user_id)
        .await
        .map_err(|e| {
            if e.is_invalid_credentials() {
                AppError::InvalidCredentials
            } else {
                AppError::login_failed()
            }
        })?;

    info!(user_id = %user_id, email = %Redacted(email), "user logged in");

    let user = UserResponse::from_profile(&user_id, profile);
    token_response(state, &user_id, email, user)
}

/// Fetch the profile for an already-authenticated user id.
pub async fn current_user(state: &AppState, user_id: &str) -> Result<UserResponse, AppError> {
    let profile = state
        .appwrite
        .get_document(user_id)
        .await
        .map_err(|_| AppError::user_not_found())?;

    Ok(UserResponse::from_profile(user_id, profile))
}

/// Mint a fresh access+refresh pair from a refresh token.
///
/// The presented token must verify, be of kind `refresh`, and name a user
/// whose profile still exists. The old refresh token is NOT invalidated:
/// it stays usable until its own expiry, which is the accepted trade-off
/// of keeping verification stateless.
pub async fn refresh(state: &AppState, refresh_token: &str) -> Result<TokenResponse, AppError> {
    let claims = verify_token(refresh_token, &state.security)?;
    require_kind(&claims, TokenKind::Refresh)?;

    if claims.sub.is_empty() {
        return Err(AppError::unauthorized());
    }

    let user = current_user(state, &claims.sub).await?;

    token_response(state, &claims.sub, &claims.email, user)
}

/// Logout performs no server-side invalidation: there is no session store
/// and no token blacklist. Clients discard their tokens locally; both
/// tokens remain technically valid until they expire.
pub fn logout() -> &'static str {
    "Successfully logged out"
}
