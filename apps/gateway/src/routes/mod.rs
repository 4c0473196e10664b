use actix_web::web;

pub mod auth;
pub mod health;

/// Configure the versioned API routes.
///
/// In production, `main.rs` registers these under the `/{API_VERSION}`
/// scope; tests register the same paths directly so endpoint behavior can
/// be exercised without the full server.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Auth routes: /auth/**
    cfg.service(web::scope("/auth").configure(auth::configure_routes));
}
