use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::Client;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::services::upstream::{ensure_success, UpstreamError};

pub const SERVICE: &str = "exchange-rate";

/// Currency the pricing API reports in
pub const LOCAL_CURRENCY: &str = "USD";

const RATE_TTL_SECS: u64 = 3600;

/// Latest exchange rates, cached per currency pair for an hour.
#[derive(Clone)]
pub struct ExchangeRateService {
    client: Client,
    base_url: String,
    cache: Arc<Cache<String, Decimal>>,
}

impl ExchangeRateService {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        let cache = Cache::builder()
            .max_capacity(32)
            .time_to_live(Duration::from_secs(RATE_TTL_SECS))
            .build();

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            cache: Arc::new(cache),
        }
    }

    /// Units of `quote` per one unit of `base`.
    pub async fn rate(&self, base: &str, quote: &str) -> Result<Decimal, UpstreamError> {
        let cache_key = format!("{}_{}", base, quote);

        if let Some(rate) = self.cache.get(&cache_key).await {
            tracing::debug!(pair = %cache_key, "Exchange rate cache hit");
            return Ok(rate);
        }

        let url = format!("{}/latest", self.base_url);
        let response = self
            .client
            .get(&url)
            .header("accept", "application/json")
            .query(&[("base", base), ("symbols", quote)])
            .send()
            .await
            .map_err(UpstreamError::http(SERVICE))?;

        let response = ensure_success(SERVICE, response).await?;
        let body: Value = response.json().await.map_err(UpstreamError::http(SERVICE))?;

        let rate = parse_rate(&body, quote)?;
        tracing::info!(base = %base, quote = %quote, rate = %rate, "Fetched exchange rate");

        self.cache.insert(cache_key, rate).await;
        Ok(rate)
    }

    /// Rate from the pricing API currency into the shop currency.
    pub async fn local_to(&self, quote: &str) -> Result<Decimal, UpstreamError> {
        self.rate(LOCAL_CURRENCY, quote).await
    }
}

fn parse_rate(body: &Value, quote: &str) -> Result<Decimal, UpstreamError> {
    let raw = body
        .get("rates")
        .and_then(|rates| rates.get(quote))
        .ok_or_else(|| UpstreamError::decode(SERVICE, format!("no rate for {}", quote)))?;

    let text = match raw {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => {
            return Err(UpstreamError::decode(
                SERVICE,
                format!("unexpected rate value {}", other),
            ));
        }
    };

    let rate = Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|e| UpstreamError::decode(SERVICE, format!("invalid rate {}: {}", text, e)))?;

    if rate <= Decimal::ZERO {
        return Err(UpstreamError::decode(
            SERVICE,
            format!("non-positive rate {}", rate),
        ));
    }

    Ok(rate)
}
