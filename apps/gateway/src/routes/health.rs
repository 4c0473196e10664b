use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::state::app_state::AppState;

async fn root(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "message": format!("Welcome to {}", state.settings.app_name),
        "version": state.settings.api_version,
    }))
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "healthy" }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(root))
        .route("/health", web::get().to(health));
}
