use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use gateway::appwrite::AppwriteClient;
use gateway::config::settings::Settings;
use gateway::middleware::cors::cors_middleware;
use gateway::middleware::request_trace::RequestTrace;
use gateway::middleware::structured_logger::StructuredLogger;
use gateway::middleware::trace_span::TraceSpan;
use gateway::routes;
use gateway::state::app_state::AppState;
use gateway::state::security_config::SecurityConfig;
use gateway::telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment:
    // - Docker: Set via docker-compose env_file or docker run --env-file
    // - Local dev: Source env files manually (e.g., set -a; . ./.env; set +a)
    let host = std::env::var("GATEWAY_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("GATEWAY_PORT")
        .unwrap_or_else(|_| "8000".to_string())
        .parse::<u16>()
        .unwrap_or_else(|_| {
            eprintln!("GATEWAY_PORT must be a valid port number");
            std::process::exit(1);
        });

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load settings: {e}");
            std::process::exit(1);
        }
    };

    println!(
        "Starting {} ({}) on http://{}:{}",
        settings.app_name, settings.app_env, host, port
    );

    let security = SecurityConfig::from_settings(&settings);
    let appwrite = Arc::new(AppwriteClient::from_settings(&settings));

    let api_prefix = format!("/{}", settings.api_version.trim_matches('/'));

    // Wrap AppState with web::Data before passing to HttpServer
    let data = web::Data::new(AppState::new(settings, security, appwrite));

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware(&data.settings))
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .service(web::scope(&api_prefix).configure(routes::configure))
            .configure(routes::health::configure_routes)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
