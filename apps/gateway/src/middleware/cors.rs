use actix_cors::Cors;
use actix_web::http::header;

use crate::config::settings::Settings;

/// Build CORS middleware with a restrictive, explicit configuration:
/// - Origins come from the CORS_ORIGINS setting
/// - Only allow methods actually used by the API
/// - Empty / "null" / non-http(s) entries are ignored
pub fn cors_middleware(settings: &Settings) -> Cors {
    let allowed_origins = settings.cors_origins_list();

    // Fallback to localhost-only if nothing valid was configured
    let effective_origins: Vec<String> = if allowed_origins.is_empty() {
        vec![
            "http://localhost:3000".to_string(),
            "http://127.0.0.1:3000".to_string(),
        ]
    } else {
        allowed_origins
    };

    let mut cors = Cors::default()
        // Methods actually used by the API
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        // Headers the browser may send
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
        ])
        // Headers the browser is allowed to read from responses
        .expose_headers(vec![
            header::HeaderName::from_static("x-request-id"),
            header::RETRY_AFTER,
        ])
        .supports_credentials()
        .max_age(3600);

    for origin in effective_origins {
        cors = cors.allowed_origin(&origin);
    }

    cors
}
