use actix_web::{web, HttpResponse};
use lazy_regex::regex_is_match;
use serde::Deserialize;
use serde_json::json;

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::{CurrentUser, ValidatedJson};
use crate::middleware::rate_limit::{Quota, RateLimit};
use crate::services::auth as auth_service;
use crate::state::app_state::AppState;

const MIN_PASSWORD_LEN: usize = 8;

fn validate_email(email: &str) -> Result<(), AppError> {
    if !regex_is_match!(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$", email) {
        return Err(AppError::validation(
            ErrorCode::InvalidEmail,
            "Invalid email address".to_string(),
        ));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

impl RegisterRequest {
    fn validate(&self) -> Result<(), AppError> {
        validate_email(&self.email)?;
        if self.password.len() < MIN_PASSWORD_LEN {
            return Err(AppError::validation(
                ErrorCode::InvalidPassword,
                format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    fn validate(&self) -> Result<(), AppError> {
        validate_email(&self.email)
    }
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Register a new user and return a token pair.
async fn register(
    body: ValidatedJson<RegisterRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let req = body.into_inner();
    req.validate()?;

    let response =
        auth_service::register(&app_state, &req.email, &req.password, &req.name).await?;
    Ok(HttpResponse::Created().json(response))
}

/// Login with email and password; returns a token pair.
async fn login(
    body: ValidatedJson<LoginRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let req = body.into_inner();
    req.validate()?;

    let response = auth_service::login(&app_state, &req.email, &req.password).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Exchange a refresh token for a fresh token pair.
async fn refresh(
    body: ValidatedJson<RefreshRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let req = body.into_inner();

    let response = auth_service::refresh(&app_state, &req.refresh_token).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Current authenticated user's profile.
async fn me(
    user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let response = auth_service::current_user(&app_state, &user.sub).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Logout. Purely client-side: the server keeps no session state to tear
/// down, so this only acknowledges the request.
async fn logout(_user: CurrentUser) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(json!({ "message": auth_service::logout() })))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/register")
            .wrap(RateLimit::new("auth:register", Quota::per_minute(5)))
            .route(web::post().to(register)),
    )
    .service(
        web::resource("/login")
            .wrap(RateLimit::new("auth:login", Quota::per_minute(10)))
            .route(web::post().to(login)),
    )
    // Refresh is unlimited: it already requires a valid signed refresh token
    .service(web::resource("/refresh").route(web::post().to(refresh)))
    .service(
        web::resource("/me")
            .wrap(RateLimit::new("auth:me", Quota::per_minute(5)))
            .route(web::get().to(me)),
    )
    .service(
        web::resource("/logout")
            .wrap(RateLimit::new("auth:logout", Quota::per_minute(5)))
            .route(web::post().to(logout)),
    );
}
