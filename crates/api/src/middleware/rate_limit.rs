//! Rate limiting middleware.
//!
//! Provides per-client-IP rate limiting for the authentication endpoints.

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter as GovRateLimiter,
};
use serde_json::json;
use std::{
    collections::HashMap,
    net::SocketAddr,
    num::NonZeroU32,
    sync::{Arc, RwLock},
    time::{Duration, Instant},
};

use crate::app::AppState;

/// Type alias for the rate limiter used per client.
type ClientRateLimiter = GovRateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Maximum number of client IPs tracked before idle entries are evicted.
const MAX_TRACKED_CLIENTS: usize = 10_000;

/// Clients not seen for this long are eligible for eviction.
const IDLE_EVICTION_SECS: u64 = 300;

struct ClientEntry {
    limiter: Arc<ClientRateLimiter>,
    last_seen: Instant,
}

/// Rate limiter state shared across all requests.
///
/// Keyed by client IP address, with an individual limiter per client.
/// The map is bounded: once it holds [`MAX_TRACKED_CLIENTS`] entries,
/// inserting a new client first drops entries idle longer than
/// [`IDLE_EVICTION_SECS`], so an address-scanning client cannot grow it
/// without bound.
pub struct RateLimiterState {
    limiters: RwLock<HashMap<String, ClientEntry>>,
    rate_limit_per_minute: u32,
}

impl RateLimiterState {
    /// Create a new rate limiter state with the specified limit per minute.
    pub fn new(rate_limit_per_minute: u32) -> Self {
        Self {
            limiters: RwLock::new(HashMap::new()),
            rate_limit_per_minute,
        }
    }

    /// Get or create a rate limiter for the given client IP.
    fn get_or_create_limiter(&self, client_ip: &str) -> Arc<ClientRateLimiter> {
        let mut limiters = self.limiters.write().unwrap();

        if let Some(entry) = limiters.get_mut(client_ip) {
            entry.last_seen = Instant::now();
            return entry.limiter.clone();
        }

        if limiters.len() >= MAX_TRACKED_CLIENTS {
            let cutoff = Instant::now() - Duration::from_secs(IDLE_EVICTION_SECS);
            limiters.retain(|_, entry| entry.last_seen > cutoff);
        }

        let quota = Quota::per_minute(
            NonZeroU32::new(self.rate_limit_per_minute).unwrap_or(NonZeroU32::new(30).unwrap()),
        );
        let limiter = Arc::new(GovRateLimiter::direct(quota));
        limiters.insert(
            client_ip.to_string(),
            ClientEntry {
                limiter: limiter.clone(),
                last_seen: Instant::now(),
            },
        );
        limiter
    }

    #[cfg(test)]
    fn is_tracked(&self, client_ip: &str) -> bool {
        self.limiters.read().unwrap().contains_key(client_ip)
    }

    #[cfg(test)]
    fn age_client(&self, client_ip: &str, idle: Duration) {
        if let Some(entry) = self.limiters.write().unwrap().get_mut(client_ip) {
            entry.last_seen = Instant::now() - idle;
        }
    }

    /// Check if a request from the given client should be allowed.
    /// Returns Ok(()) if allowed, or Err with retry_after seconds if limited.
    pub fn check(&self, client_ip: &str) -> Result<(), u64> {
        let limiter = self.get_or_create_limiter(client_ip);

        match limiter.check() {
            Ok(_) => Ok(()),
            Err(not_until) => {
                let wait_time = not_until.wait_time_from(governor::clock::Clock::now(
                    &governor::clock::DefaultClock::default(),
                ));
                Err(wait_time.as_secs().max(1))
            }
        }
    }
}

impl std::fmt::Debug for RateLimiterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiterState")
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .field("active_limiters", &self.limiters.read().unwrap().len())
            .finish()
    }
}

/// Middleware that applies per-IP rate limiting.
///
/// Applied to the /auth route group to slow down credential stuffing.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let Some(ref rate_limiter) = state.rate_limiter else {
        return next.run(req).await;
    };

    let client_ip = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    if let Err(retry_after) = rate_limiter.check(&client_ip) {
        return rate_limited_response(
            state.config.security.auth_rate_limit_per_minute,
            retry_after,
        );
    }

    next.run(req).await
}

/// Create a rate limited response with proper headers and body.
fn rate_limited_response(limit: u32, retry_after: u64) -> Response {
    let body = json!({
        "error": "rate_limited",
        "message": format!("Rate limit of {} requests/minute exceeded", limit),
        "retryAfter": retry_after
    });

    let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();

    if let Ok(value) = retry_after.to_string().parse() {
        response.headers_mut().insert(header::RETRY_AFTER, value);
    }

    response
}
