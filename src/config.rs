//! Environment-driven configuration.
//!
//! `main` loads `.env` through dotenvy first, then calls [`AppConfig::from_env`].

use std::collections::HashMap;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_PRICING_API_BASE_URL: &str = "https://www.pricecharting.com";
const DEFAULT_FX_API_BASE_URL: &str = "https://api.frankfurter.app";
const DEFAULT_FOREIGN_CURRENCY: &str = "JPY";
const DEFAULT_MARKETPLACE_CACHE_TTL_SECS: i64 = 3600; // 1 hour
const DEFAULT_SETS_CACHE_TTL_SECS: i64 = 86400; // 24 hours

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    pub pricing_api_base_url: String,
    pub pricing_api_token: Option<String>,
    pub marketplace_api_base_url: String,
    pub marketplace_api_token: Option<String>,
    pub fx_api_base_url: String,
    /// Currency the shop sells in; prices from the pricing API are converted into it.
    pub foreign_currency: String,
    /// Bearer secret for cron-triggered endpoints. Unset means every cron call is rejected.
    pub cron_secret: Option<String>,
    /// Key for the public read-only endpoint. Unset means the endpoint always answers 401.
    pub public_api_key: Option<String>,
    pub marketplace_cache_ttl_secs: i64,
    pub sets_cache_ttl_secs: i64,
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, value: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} must be set", key),
            ConfigError::Invalid { key, value } => {
                write!(f, "Invalid value for {}: '{}'", key, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_map(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| vars.get(key).cloned())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values count as unset.
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let marketplace_api_base_url = get("MARKETPLACE_API_BASE_URL")
            .ok_or(ConfigError::Missing("MARKETPLACE_API_BASE_URL"))?;

        let port = match get("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::Invalid {
                key: "PORT",
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };

        let marketplace_cache_ttl_secs = parse_secs(
            "MARKETPLACE_CACHE_TTL_SECS",
            get("MARKETPLACE_CACHE_TTL_SECS"),
            DEFAULT_MARKETPLACE_CACHE_TTL_SECS,
        )?;
        let sets_cache_ttl_secs = parse_secs(
            "SETS_CACHE_TTL_SECS",
            get("SETS_CACHE_TTL_SECS"),
            DEFAULT_SETS_CACHE_TTL_SECS,
        )?;

        Ok(Self {
            database_url,
            port,
            pricing_api_base_url: get("PRICING_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_PRICING_API_BASE_URL.to_string()),
            pricing_api_token: get("PRICING_API_TOKEN"),
            marketplace_api_base_url,
            marketplace_api_token: get("MARKETPLACE_API_TOKEN"),
            fx_api_base_url: get("FX_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_FX_API_BASE_URL.to_string()),
            foreign_currency: get("FOREIGN_CURRENCY")
                .map(|c| c.to_uppercase())
                .unwrap_or_else(|| DEFAULT_FOREIGN_CURRENCY.to_string()),
            cron_secret: get("CRON_SECRET"),
            public_api_key: get("PUBLIC_API_KEY"),
            marketplace_cache_ttl_secs,
            sets_cache_ttl_secs,
        })
    }
}

fn parse_secs(key: &'static str, raw: Option<String>, default: i64) -> Result<i64, ConfigError> {
    match raw {
        None => Ok(default),
        Some(raw) => match raw.parse::<i64>() {
            Ok(secs) if secs >= 0 => Ok(secs),
            _ => Err(ConfigError::Invalid { key, value: raw }),
        },
    }
}
