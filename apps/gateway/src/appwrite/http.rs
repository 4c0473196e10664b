//! reqwest implementation of the Appwrite REST API subset.

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use serde_json::json;

use super::{Account, AppwriteApi, AppwriteError, Session, UserProfile};
use crate::config::settings::Settings;

/// Error body Appwrite returns for non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(default)]
    code: u16,
    #[serde(rename = "type", default)]
    error_type: String,
}

/// HTTP client for a single Appwrite project, holding the endpoint, project
/// and key headers, and the database/collection the user profiles live in.
/// Constructed once at startup and shared behind the app state.
#[derive(Debug, Clone)]
pub struct AppwriteClient {
    http: reqwest::Client,
    endpoint: String,
    project_id: String,
    api_key: String,
    database_id: String,
    collection_users: String,
}

impl AppwriteClient {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: settings.appwrite_endpoint.trim_end_matches('/').to_string(),
            project_id: settings.appwrite_project_id.clone(),
            api_key: settings.appwrite_api_key.clone(),
            database_id: settings.appwrite_database_id.clone(),
            collection_users: settings.collection_users.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.endpoint)
    }

    fn document_url(&self, document_id: &str) -> String {
        self.url(&format!(
            "/databases/{}/collections/{}/documents/{document_id}",
            self.database_id, self.collection_users
        ))
    }

    fn post(&self, url: String) -> reqwest::RequestBuilder {
        self.http
            .post(url)
            .header("x-appwrite-project", &self.project_id)
            .header("x-appwrite-key", &self.api_key)
    }

    fn get(&self, url: String) -> reqwest::RequestBuilder {
        self.http
            .get(url)
            .header("x-appwrite-project", &self.project_id)
            .header("x-appwrite-key", &self.api_key)
    }

    /// Decode a success body, or turn a non-2xx response into a typed
    /// [`AppwriteError::Api`].
    async fn decode<T: for<'de> Deserialize<'de>>(resp: Response) -> Result<T, AppwriteError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp.json::<T>().await?);
        }
        Err(Self::api_error(status, resp).await)
    }

    async fn check_status(resp: Response) -> Result<(), AppwriteError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        Err(Self::api_error(status, resp).await)
    }

    async fn api_error(status: StatusCode, resp: Response) -> AppwriteError {
        match resp.json::<ErrorBody>().await {
            Ok(body) => AppwriteError::Api {
                code: if body.code == 0 {
                    status.as_u16()
                } else {
                    body.code
                },
                error_type: body.error_type,
                message: body.message,
            },
            Err(_) => AppwriteError::Api {
                code: status.as_u16(),
                error_type: "unknown".to_string(),
                message: format!("Appwrite returned HTTP {status}"),
            },
        }
    }
}

#[async_trait]
impl AppwriteApi for AppwriteClient {
    async fn create_account(
        &self,
        user_id: &str,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<Account, AppwriteError> {
        let resp = self
            .post(self.url("/account"))
            .json(&json!({
                "userId": user_id,
                "email": email,
                "password": password,
                "name": name,
            }))
            .send()
            .await?;
        Self::decode(resp).await
    }

    async fn create_email_session(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AppwriteError> {
        let resp = self
            .post(self.url("/account/sessions/email"))
            .json(&json!({
                "email": email,
                "password": password,
            }))
            .send()
            .await?;
        Self::decode(resp).await
    }

    async fn get_document(&self, document_id: &str) -> Result<UserProfile, AppwriteError> {
        let resp = self.get(self.document_url(document_id)).send().await?;
        Self::decode(resp).await
    }

    async fn create_document(
        &self,
        document_id: &str,
        profile: &UserProfile,
    ) -> Result<UserProfile, AppwriteError> {
        let resp = self
            .post(self.url(&format!(
                "/databases/{}/collections/{}/documents",
                self.database_id, self.collection_users
            )))
            .json(&json!({
                "documentId": document_id,
                "data": profile,
            }))
            .send()
            .await?;
        Self::decode(resp).await
    }

    async fn create_verification(&self, redirect_url: &str) -> Result<(), AppwriteError> {
        let resp = self
            .post(self.url("/account/verification"))
            .json(&json!({ "url": redirect_url }))
            .send()
            .await?;
        Self::check_status(resp).await
    }
}
