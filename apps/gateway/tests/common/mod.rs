//! Shared fixtures for the HTTP integration tests: an in-memory Appwrite
//! stand-in and builders for the test application.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App};
use async_trait::async_trait;
use jsonwebtoken::Algorithm;
use time::macros::datetime;

use gateway::appwrite::{Account, AppwriteApi, AppwriteError, Session, UserProfile};
use gateway::config::settings::Settings;
use gateway::middleware::request_trace::RequestTrace;
use gateway::routes;
use gateway::state::app_state::AppState;
use gateway::state::security_config::SecurityConfig;

struct StoredAccount {
    user_id: String,
    password: String,
}

/// In-memory Appwrite stand-in mirroring the error types the real service
/// reports, so orchestrator classification is exercised end to end.
#[derive(Default)]
pub struct MockAppwrite {
    accounts: Mutex<HashMap<String, StoredAccount>>,
    documents: Mutex<HashMap<String, UserProfile>>,
    pub fail_verification: AtomicBool,
}

impl MockAppwrite {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Drop a user's profile document, simulating deletion upstream.
    pub fn remove_document(&self, user_id: &str) {
        self.documents.lock().unwrap().remove(user_id);
    }

    fn api_error(code: u16, error_type: &str, message: &str) -> AppwriteError {
        AppwriteError::Api {
            code,
            error_type: error_type.to_string(),
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl AppwriteApi for MockAppwrite {
    async fn create_account(
        &self,
        user_id: &str,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<Account, AppwriteError> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.contains_key(email) {
            return Err(Self::api_error(
                409,
                "user_already_exists",
                "A user with the same email already exists in this project.",
            ));
        }
        accounts.insert(
            email.to_string(),
            StoredAccount {
                user_id: user_id.to_string(),
                password: password.to_string(),
            },
        );
        Ok(Account {
            id: user_id.to_string(),
            created_at: datetime!(2026-01-01 0:00 UTC),
            email: email.to_string(),
            name: name.to_string(),
        })
    }

    async fn create_email_session(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AppwriteError> {
        let accounts = self.accounts.lock().unwrap();
        match accounts.get(email) {
            Some(account) if account.password == password => Ok(Session {
                id: format!("session-{}", account.user_id),
                user_id: account.user_id.clone(),
            }),
            // Wrong password and unknown user must be indistinguishable to
            // API clients; return the same error type for both.
            _ => Err(Self::api_error(
                401,
                "user_invalid_credentials",
                "Invalid credentials. Please check the email and password.",
            )),
        }
    }

    async fn get_document(&self, document_id: &str) -> Result<UserProfile, AppwriteError> {
        self.documents
            .lock()
            .unwrap()
            .get(document_id)
            .cloned()
            .ok_or_else(|| {
                Self::api_error(
                    404,
                    "document_not_found",
                    "Document with the requested ID could not be found.",
                )
            })
    }

    async fn create_document(
        &self,
        document_id: &str,
        profile: &UserProfile,
    ) -> Result<UserProfile, AppwriteError> {
        self.documents
            .lock()
            .unwrap()
            .insert(document_id.to_string(), profile.clone());
        Ok(profile.clone())
    }

    async fn create_verification(&self, _redirect_url: &str) -> Result<(), AppwriteError> {
        if self.fail_verification.load(Ordering::SeqCst) {
            return Err(Self::api_error(
                503,
                "general_mail_error",
                "Failed to send the verification email.",
            ));
        }
        Ok(())
    }
}

pub fn test_settings() -> Settings {
    Settings {
        app_name: "DriftVault".to_string(),
        app_env: "test".to_string(),
        debug: true,
        api_version: "v1".to_string(),
        frontend_url: "http://localhost:3000".to_string(),
        jwt_secret: "integration-test-secret".to_string(),
        jwt_algorithm: Algorithm::HS256,
        jwt_access_ttl_minutes: 15,
        jwt_refresh_ttl_days: 7,
        appwrite_endpoint: "http://localhost/v1".to_string(),
        appwrite_project_id: "test-project".to_string(),
        appwrite_api_key: "test-key".to_string(),
        appwrite_database_id: "test-db".to_string(),
        collection_users: "users".to_string(),
        cors_origins: "http://localhost:3000".to_string(),
        bcrypt_rounds: 12,
    }
}

pub fn test_state(appwrite: Arc<dyn AppwriteApi>) -> AppState {
    let settings = test_settings();
    let security = SecurityConfig::new(settings.jwt_secret.as_bytes().to_vec());
    AppState::new(settings, security, appwrite)
}

/// Build the application the way `main.rs` does, minus the server socket:
/// versioned auth scope, root/health routes, request tracing.
pub async fn init_app(
    state: AppState,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
    test::init_service(
        App::new()
            .wrap(RequestTrace)
            .app_data(web::Data::new(state))
            .service(web::scope("/v1").configure(routes::configure))
            .configure(routes::health::configure_routes),
    )
    .await
}

/// POST /v1/auth/register and return the parsed response body.
pub async fn register_user<S>(
    app: &S,
    email: &str,
    password: &str,
    name: &str,
) -> (u16, serde_json::Value)
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let req = test::TestRequest::post()
        .uri("/v1/auth/register")
        .set_json(serde_json::json!({
            "email": email,
            "password": password,
            "name": name,
        }))
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status().as_u16();
    let body: serde_json::Value = test::read_body_json(resp).await;
    (status, body)
}
