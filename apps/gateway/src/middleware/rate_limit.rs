//! Per-route, per-client request budgets.
//!
//! Quotas applied to the auth endpoints:
//! - registration: 5 requests per minute per IP
//! - login: 10 requests per minute per IP
//! - profile fetch / logout: 5 requests per minute per IP
//! - refresh: unlimited, a valid signed refresh token is already required
//!
//! Counters are fixed-window and live in process memory only. Running more
//! than one gateway instance needs a shared counter store for a global
//! budget; each instance currently enforces its own.

use std::time::{Duration, Instant};

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::error::ResponseError;
use actix_web::{web, Error};
use dashmap::DashMap;
use futures_util::future::{ready, LocalBoxFuture, Ready};

use crate::error::AppError;
use crate::state::app_state::AppState;

/// Request budget: `limit` requests per `period`.
#[derive(Debug, Clone, Copy)]
pub struct Quota {
    pub limit: u32,
    pub period: Duration,
}

impl Quota {
    pub const fn per_minute(limit: u32) -> Self {
        Self {
            limit,
            period: Duration::from_secs(60),
        }
    }
}

/// Outcome of consuming one unit of a client's budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Denied { retry_after: Duration },
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// Fixed-window counter table keyed by `(route, client)`.
#[derive(Debug, Default)]
pub struct RateLimiter {
    windows: DashMap<(String, String), Window>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one unit of `client`'s budget on `route`, resetting the
    /// window once `quota.period` has elapsed since it started.
    pub fn check_and_consume(&self, route: &str, client: &str, quota: Quota) -> Decision {
        self.check_and_consume_at(route, client, quota, Instant::now())
    }

    fn check_and_consume_at(
        &self,
        route: &str,
        client: &str,
        quota: Quota,
        now: Instant,
    ) -> Decision {
        let mut window = self
            .windows
            .entry((route.to_string(), client.to_string()))
            .or_insert(Window {
                started: now,
                count: 0,
            });

        let elapsed = now.saturating_duration_since(window.started);
        if elapsed >= quota.period {
            window.started = now;
            window.count = 0;
        }

        if window.count < quota.limit {
            window.count += 1;
            Decision::Allowed
        } else {
            let retry_after = quota
                .period
                .saturating_sub(now.saturating_duration_since(window.started));
            Decision::Denied { retry_after }
        }
    }
}

/// Middleware applying a [`Quota`] to one route, keyed by client IP.
/// A denied request becomes a 429 with a `Retry-After` header.
pub struct RateLimit {
    route: &'static str,
    quota: Quota,
}

impl RateLimit {
    pub fn new(route: &'static str, quota: Quota) -> Self {
        Self { route, quota }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service,
            route: self.route,
            quota: self.quota,
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: S,
    route: &'static str,
    quota: Quota,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let client = req
            .connection_info()
            .realip_remote_addr()
            .unwrap_or("unknown")
            .to_string();

        let app_state = match req.app_data::<web::Data<AppState>>() {
            Some(state) => state,
            None => {
                return Box::pin(async {
                    Err(actix_web::error::ErrorInternalServerError(
                        "AppState not available",
                    ))
                });
            }
        };

        match app_state
            .limiter
            .check_and_consume(self.route, &client, self.quota)
        {
            Decision::Allowed => {
                let fut = self.service.call(req);
                Box::pin(async move { Ok(fut.await?.map_into_left_body()) })
            }
            Decision::Denied { retry_after } => {
                let secs = retry_after.as_secs().max(1);
                // Built inside the future so the response picks up the
                // request's trace context.
                Box::pin(async move {
                    let response = AppError::rate_limited(secs)
                        .error_response()
                        .map_into_right_body();
                    Ok(req.into_response(response))
                })
            }
        }
    }
}
