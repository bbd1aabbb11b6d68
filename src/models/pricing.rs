//! Card-pricing API payloads.
//!
//! Prices from the pricing API are integer minor units (cents).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingProduct {
    pub id: String,
    #[serde(rename = "product-name")]
    pub product_name: String,
    #[serde(rename = "console-name", default)]
    pub set_name: Option<String>,
    #[serde(rename = "loose-price", default)]
    pub loose_price: Option<i64>,
    #[serde(rename = "graded-price", default)]
    pub graded_price: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardSet {
    pub id: String,
    pub name: String,
    #[serde(rename = "release-date", default)]
    pub release_date: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PricingSearchQuery {
    pub q: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardSetsResponse {
    pub sets: Vec<CardSet>,
    pub cached: bool,
    pub fetched_at: DateTime<Utc>,
}
