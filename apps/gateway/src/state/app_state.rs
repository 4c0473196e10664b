use std::sync::Arc;

use crate::appwrite::AppwriteApi;
use crate::config::settings::Settings;
use crate::middleware::rate_limit::RateLimiter;
use crate::state::security_config::SecurityConfig;

/// Application state containing shared resources.
///
/// Built once at startup and handed to actix via `web::Data`; everything in
/// here is immutable after construction except the rate-limiter counters,
/// which handle their own synchronization.
pub struct AppState {
    pub settings: Settings,
    pub security: SecurityConfig,
    /// Appwrite handle, behind the trait so tests can swap in a mock
    pub appwrite: Arc<dyn AppwriteApi>,
    pub limiter: RateLimiter,
}

impl AppState {
    pub fn new(settings: Settings, security: SecurityConfig, appwrite: Arc<dyn AppwriteApi>) -> Self {
        Self {
            settings,
            security,
            appwrite,
            limiter: RateLimiter::new(),
        }
    }
}
