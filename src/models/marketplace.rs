//! Marketplace scraper payloads and the listings endpoint response.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One resale listing as returned by the scraper API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: String,
    pub title: String,
    /// Asking or sold price in the shop currency (integer amount)
    pub price: i64,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub sold: bool,
    #[serde(default)]
    pub listed_at: Option<DateTime<Utc>>,
}

/// Usage counters the scraper reports with every page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageMetadata {
    #[serde(default)]
    pub requests_used: u64,
    #[serde(default)]
    pub credits_remaining: Option<u64>,
}

/// Single page of the scraper API.
#[derive(Debug, Clone, Deserialize)]
pub struct ListingPage {
    #[serde(default)]
    pub items: Vec<Listing>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub usage: Option<UsageMetadata>,
}

/// All pages of one catalog entry, concatenated in page order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogListings {
    pub catalog_id: String,
    pub listings: Vec<Listing>,
    /// Usage from the final page
    pub usage: UsageMetadata,
    pub pages: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricedListing {
    #[serde(flatten)]
    pub listing: Listing,
    /// Price converted back into the pricing API currency; absent when no
    /// exchange rate was available
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub price_local: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketplaceListingsResponse {
    pub catalog_id: String,
    pub cached: bool,
    pub fetched_at: DateTime<Utc>,
    pub usage: UsageMetadata,
    pub listings: Vec<PricedListing>,
}
