//! Credential extractors.
//!
//! `CronAuth` guards scheduler-triggered endpoints with a bearer secret.
//! `PublicApiKey` guards the read-only public endpoint with `X-API-Key`.
//! Both reject with 401 when the credential is missing, wrong, or not
//! configured on the server.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use tracing::warn;

use crate::error::ApiError;
use crate::AppState;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Caller presented the cron secret.
#[derive(Debug, Clone, Copy)]
pub struct CronAuth;

impl FromRequestParts<AppState> for CronAuth {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(secret) = state.config.cron_secret.as_deref() else {
            warn!("CRON_SECRET not configured, rejecting cron call");
            return Err(ApiError::Unauthorized("Cron access is not configured".to_string()));
        };

        match bearer_token(&parts.headers) {
            Some(token) if token == secret => Ok(CronAuth),
            Some(_) => {
                warn!(path = %parts.uri.path(), "Invalid cron secret");
                Err(ApiError::Unauthorized("Invalid cron secret".to_string()))
            }
            None => Err(ApiError::Unauthorized(
                "Missing bearer token".to_string(),
            )),
        }
    }
}

/// Caller presented the public API key.
#[derive(Debug, Clone, Copy)]
pub struct PublicApiKey;

impl FromRequestParts<AppState> for PublicApiKey {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let expected = state.config.public_api_key.as_deref();

        match (expected, api_key(&parts.headers)) {
            (Some(expected), Some(provided)) if provided == expected => Ok(PublicApiKey),
            _ => {
                warn!(path = %parts.uri.path(), "Invalid or missing API key");
                Err(ApiError::Unauthorized("Invalid or missing API key".to_string()))
            }
        }
    }
}

/// Token from `Authorization: Bearer <token>`; the scheme is case-insensitive.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

pub fn api_key(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}
