// src/lib.rs

use std::sync::Arc;
use std::time::Duration;

use sea_orm::DatabaseConnection;

use clock::Clock;
use config::AppConfig;
use rate_limit::RateLimiter;
use services::{
    exchange_rate::ExchangeRateService,
    marketplace::{MarketplaceClient, MarketplaceService},
    price_history::{PriceHistoryService, SeaOrmPriceHistoryStore},
    pricing::{PricingClient, PricingService},
};

/// Timeout applied to every outbound HTTP call.
const HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: Arc<AppConfig>,
    pub clock: Arc<dyn Clock>,
    pub history: PriceHistoryService,
    pub pricing: PricingService,
    pub marketplace: MarketplaceService,
    pub exchange_rates: ExchangeRateService,
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppState {
    /// Wire every service from configuration. Price history reads go through
    /// the database; tests swap `history` for an in-memory store.
    pub fn new(
        db: DatabaseConnection,
        config: AppConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let db = Arc::new(db);
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()?;

        let pricing = PricingService::new(
            PricingClient::new(
                http.clone(),
                config.pricing_api_base_url.clone(),
                config.pricing_api_token.clone(),
            ),
            chrono::Duration::seconds(config.sets_cache_ttl_secs),
            clock.clone(),
        );

        let marketplace = MarketplaceService::new(
            MarketplaceClient::new(
                http.clone(),
                config.marketplace_api_base_url.clone(),
                config.marketplace_api_token.clone(),
            ),
            chrono::Duration::seconds(config.marketplace_cache_ttl_secs),
            clock.clone(),
        );

        let exchange_rates = ExchangeRateService::new(http, config.fx_api_base_url.clone());

        let history = PriceHistoryService::new(Arc::new(SeaOrmPriceHistoryStore::new(db.clone())));

        let rate_limiter = Arc::new(RateLimiter::new(
            chrono::Duration::seconds(rate_limit::RATE_LIMIT_INTERVAL_SECS),
            clock.clone(),
        ));

        Ok(Self {
            db,
            config: Arc::new(config),
            clock,
            history,
            pricing,
            marketplace,
            exchange_rates,
            rate_limiter,
        })
    }
}

pub mod entities {
    pub mod prelude;
    pub mod cards;
    pub mod price_history;
    pub mod inventory_lots;
    pub mod inventory_history;
}

pub mod services {
    pub mod upstream;
    pub mod units;
    pub mod cache;
    pub mod price_history;
    pub mod pricing;
    pub mod marketplace;
    pub mod exchange_rate;
    pub mod links;
    pub mod inventory;
    pub mod ingest;
}

pub mod auth;
pub mod clock;
pub mod config;
pub mod error;
pub mod handlers {
    pub mod health;
    pub mod price_history;
    pub mod cards;
    pub mod links;
    pub mod marketplace;
    pub mod pricing;
    pub mod cron;
    pub mod public;
    pub mod inventory;
}

pub mod models;
pub mod rate_limit;
pub mod routes;
