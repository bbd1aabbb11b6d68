//! Price history request/response models
//!
//! Models for GET /api/price-history and the public price summary endpoint.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Lookback window for a price series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    Day7,
    #[default]
    Day30,
    Day90,
    Day180,
    Year1,
    All,
}

impl Period {
    pub const ALL_PERIODS: [Period; 6] = [
        Period::Day7,
        Period::Day30,
        Period::Day90,
        Period::Day180,
        Period::Year1,
        Period::All,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Day7 => "7d",
            Period::Day30 => "30d",
            Period::Day90 => "90d",
            Period::Day180 => "180d",
            Period::Year1 => "1y",
            Period::All => "all",
        }
    }

    /// Strict parse; `None` for anything outside the selector set.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "7d" => Some(Period::Day7),
            "30d" => Some(Period::Day30),
            "90d" => Some(Period::Day90),
            "180d" => Some(Period::Day180),
            "1y" => Some(Period::Year1),
            "all" => Some(Period::All),
            _ => None,
        }
    }

    /// Absent or unrecognized selectors fall back to the default window
    /// instead of failing the request.
    pub fn parse_lenient(raw: Option<&str>) -> Self {
        raw.and_then(Self::parse).unwrap_or_default()
    }

    /// Number of days in the window; `None` for `all`.
    pub fn days(&self) -> Option<i64> {
        match self {
            Period::Day7 => Some(7),
            Period::Day30 => Some(30),
            Period::Day90 => Some(90),
            Period::Day180 => Some(180),
            Period::Year1 => Some(365),
            Period::All => None,
        }
    }

    pub fn lower_bound(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.days().map(|days| now - Duration::days(days))
    }
}

/// Query parameters for the price history endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PriceHistoryQuery {
    pub card_id: Option<String>,
    /// 7d, 30d, 90d, 180d, 1y, all (defaults to 30d)
    pub period: Option<String>,
}

/// Query parameters for the public price endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PeriodQuery {
    pub period: Option<String>,
}

/// Single point of a price series. Missing prices are reported as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    /// Ungraded price in the pricing API's currency (major units), sent as a
    /// JSON number
    #[serde(with = "rust_decimal::serde::float")]
    pub loose_price_local: Decimal,
    /// Ungraded price converted into the shop currency
    pub loose_price_foreign: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub graded_price_local: Decimal,
    pub graded_price_foreign: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceSeries {
    pub card_id: String,
    pub period: String,
    /// Lower bound applied to the query; absent for `all`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<DateTime<Utc>>,
    /// Ascending by timestamp
    pub points: Vec<PricePoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicPriceSummary {
    pub card_id: String,
    pub latest: Option<PricePoint>,
    pub series: PriceSeries,
}
