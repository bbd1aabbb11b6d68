//! Card-pricing API client.
//!
//! Every call carries the API token as the `t` query parameter. The API
//! reports failures as `{"status": "error", "error-message": "..."}` with a
//! 200 status, so both the HTTP status and the payload status are checked.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde_json::Value;

use crate::clock::Clock;
use crate::models::pricing::{CardSet, PricingProduct};
use crate::services::cache::TtlCache;
use crate::services::upstream::{ensure_success, UpstreamError};

pub const SERVICE: &str = "pricing";

const SETS_CACHE_KEY: &str = "sets";

#[derive(Clone)]
pub struct PricingClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl PricingClient {
    pub fn new(client: Client, base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    pub async fn product(&self, product_id: &str) -> Result<PricingProduct, UpstreamError> {
        tracing::debug!(product_id = %product_id, "Fetching product from pricing API");

        let body = self.get_json("/api/product", &[("id", product_id)]).await?;
        serde_json::from_value(body).map_err(|e| UpstreamError::decode(SERVICE, e.to_string()))
    }

    pub async fn search(&self, query: &str) -> Result<Vec<PricingProduct>, UpstreamError> {
        tracing::info!(query = %query, "Searching pricing API");

        let body = self.get_json("/api/products", &[("q", query)]).await?;
        let products = body.get("products").cloned().unwrap_or(Value::Array(vec![]));
        serde_json::from_value(products).map_err(|e| UpstreamError::decode(SERVICE, e.to_string()))
    }

    pub async fn sets(&self) -> Result<Vec<CardSet>, UpstreamError> {
        tracing::info!("Fetching card sets from pricing API");

        let body = self.get_json("/api/sets", &[]).await?;
        let sets = body.get("sets").cloned().unwrap_or(Value::Array(vec![]));
        serde_json::from_value(sets).map_err(|e| UpstreamError::decode(SERVICE, e.to_string()))
    }

    async fn get_json(&self, path: &str, params: &[(&str, &str)]) -> Result<Value, UpstreamError> {
        let token = self.token.as_deref().ok_or(UpstreamError::NotConfigured {
            service: SERVICE,
            setting: "PRICING_API_TOKEN",
        })?;

        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .header("accept", "application/json")
            .query(&[("t", token)])
            .query(params)
            .send()
            .await
            .map_err(UpstreamError::http(SERVICE))?;

        let response = ensure_success(SERVICE, response).await?;
        let body: Value = response.json().await.map_err(UpstreamError::http(SERVICE))?;

        match body.get("status").and_then(Value::as_str) {
            None | Some("success") => Ok(body),
            Some(_) => Err(UpstreamError::Api {
                service: SERVICE,
                message: body
                    .get("error-message")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown error")
                    .to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CachedSets {
    pub sets: Vec<CardSet>,
    pub cached: bool,
    pub fetched_at: DateTime<Utc>,
}

/// Pricing client plus the process-local sets cache.
#[derive(Clone)]
pub struct PricingService {
    client: PricingClient,
    sets_cache: Arc<TtlCache<Vec<CardSet>>>,
}

impl PricingService {
    pub fn new(client: PricingClient, sets_ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            client,
            sets_cache: Arc::new(TtlCache::new(sets_ttl, clock)),
        }
    }

    pub async fn product(&self, product_id: &str) -> Result<PricingProduct, UpstreamError> {
        self.client.product(product_id).await
    }

    pub async fn search(&self, query: &str) -> Result<Vec<PricingProduct>, UpstreamError> {
        self.client.search(query).await
    }

    pub async fn sets(&self) -> Result<CachedSets, UpstreamError> {
        if let Some(page) = self.sets_cache.get(SETS_CACHE_KEY) {
            tracing::debug!("Card sets served from cache");
            return Ok(CachedSets {
                sets: page.payload,
                cached: true,
                fetched_at: page.fetched_at,
            });
        }

        let sets = self.client.sets().await?;
        let page = self.sets_cache.insert(SETS_CACHE_KEY, sets);
        tracing::info!(count = page.payload.len(), "Cached card sets");

        Ok(CachedSets {
            sets: page.payload,
            cached: false,
            fetched_at: page.fetched_at,
        })
    }
}
