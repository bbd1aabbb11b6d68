//! Per-client fixed-interval rate limiter.
//!
//! A client may make one accepted request per interval. Rejected requests do
//! not move the window, so a client that keeps retrying is let through as
//! soon as the interval since its last accepted request has passed.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use tracing::warn;

use crate::clock::Clock;
use crate::error::ApiError;
use crate::AppState;

pub const RATE_LIMIT_INTERVAL_SECS: i64 = 10;

/// Prune the map once it holds this many keys
const PRUNE_THRESHOLD: usize = 1024;

pub struct RateLimiter {
    interval: Duration,
    clock: Arc<dyn Clock>,
    last_accepted: Mutex<HashMap<String, DateTime<Utc>>>,
}

impl RateLimiter {
    pub fn new(interval: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            interval,
            clock,
            last_accepted: Mutex::new(HashMap::new()),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// `true` and records the request when `key` is outside its interval.
    pub fn check(&self, key: &str) -> bool {
        let now = self.clock.now();
        let mut last_accepted = self.last_accepted.lock();

        if let Some(last) = last_accepted.get(key) {
            if now - *last < self.interval {
                return false;
            }
        }

        if last_accepted.len() >= PRUNE_THRESHOLD {
            let interval = self.interval;
            last_accepted.retain(|_, last| now - *last < interval);
        }

        last_accepted.insert(key.to_string(), now);
        true
    }

    /// Seconds until `key` may make another request, rounded up.
    pub fn retry_after_secs(&self, key: &str) -> i64 {
        let now = self.clock.now();
        self.last_accepted
            .lock()
            .get(key)
            .map(|last| {
                let remaining = self.interval - (now - *last);
                (remaining.num_milliseconds().max(0) + 999) / 1000
            })
            .unwrap_or(0)
    }

    pub fn tracked_keys(&self) -> usize {
        self.last_accepted.lock().len()
    }
}

/// Client identity: first `X-Forwarded-For` hop, then `X-Real-IP`, then
/// `"unknown"`.
pub fn client_key(headers: &HeaderMap) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    let real_ip = || {
        headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    forwarded
        .or_else(real_ip)
        .unwrap_or("unknown")
        .to_string()
}

pub async fn enforce_rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let key = client_key(request.headers());

    if !state.rate_limiter.check(&key) {
        let retry_after = state.rate_limiter.retry_after_secs(&key);
        warn!(client = %key, path = %request.uri().path(), retry_after, "Rate limit exceeded");
        return Err(ApiError::RateLimited(format!(
            "Too many requests. Retry in {} seconds.",
            retry_after
        )));
    }

    Ok(next.run(request).await)
}
