//! Time-windowed price history reads and sample appends.
//!
//! The datastore sits behind [`PriceHistoryStore`] so the series logic can run
//! against Postgres in production and an in-memory store in tests.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, Order, QueryFilter,
    QueryOrder,
};
use tracing::debug;

use crate::entities::{prelude::PriceHistory, price_history};
use crate::error::ApiError;
use crate::models::price_history::{Period, PricePoint, PriceSeries};

/// Sample to append; the store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPriceSample {
    pub card_id: String,
    pub recorded_at: DateTime<Utc>,
    pub loose_price_local: Option<Decimal>,
    pub loose_price_foreign: Option<i64>,
    pub graded_price_local: Option<Decimal>,
    pub graded_price_foreign: Option<i64>,
}

#[async_trait]
pub trait PriceHistoryStore: Send + Sync {
    /// Samples for `card_id` with `recorded_at >= since` (all when `since` is
    /// `None`), ascending by `recorded_at`.
    async fn samples_since(
        &self,
        card_id: &str,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<price_history::Model>, DbErr>;

    async fn latest(&self, card_id: &str) -> Result<Option<price_history::Model>, DbErr>;

    async fn append(&self, sample: NewPriceSample) -> Result<(), DbErr>;
}

pub struct SeaOrmPriceHistoryStore {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmPriceHistoryStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PriceHistoryStore for SeaOrmPriceHistoryStore {
    async fn samples_since(
        &self,
        card_id: &str,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<price_history::Model>, DbErr> {
        let mut query = PriceHistory::find().filter(price_history::Column::CardId.eq(card_id));

        if let Some(since) = since {
            query = query.filter(price_history::Column::RecordedAt.gte(since.fixed_offset()));
        }

        query
            .order_by(price_history::Column::RecordedAt, Order::Asc)
            .all(self.db.as_ref())
            .await
    }

    async fn latest(&self, card_id: &str) -> Result<Option<price_history::Model>, DbErr> {
        PriceHistory::find()
            .filter(price_history::Column::CardId.eq(card_id))
            .order_by(price_history::Column::RecordedAt, Order::Desc)
            .one(self.db.as_ref())
            .await
    }

    async fn append(&self, sample: NewPriceSample) -> Result<(), DbErr> {
        let row = price_history::ActiveModel {
            card_id: Set(sample.card_id),
            recorded_at: Set(sample.recorded_at.fixed_offset()),
            loose_price_local: Set(sample.loose_price_local),
            loose_price_foreign: Set(sample.loose_price_foreign),
            graded_price_local: Set(sample.graded_price_local),
            graded_price_foreign: Set(sample.graded_price_foreign),
            ..Default::default()
        };

        PriceHistory::insert(row)
            .exec_without_returning(self.db.as_ref())
            .await?;
        Ok(())
    }
}

/// Store backed by a vector, for running without Postgres.
#[derive(Default)]
pub struct InMemoryPriceHistoryStore {
    rows: RwLock<Vec<price_history::Model>>,
}

impl InMemoryPriceHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<price_history::Model>) -> Self {
        Self {
            rows: RwLock::new(rows),
        }
    }

    pub fn rows(&self) -> Vec<price_history::Model> {
        self.rows.read().clone()
    }
}

#[async_trait]
impl PriceHistoryStore for InMemoryPriceHistoryStore {
    async fn samples_since(
        &self,
        card_id: &str,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<price_history::Model>, DbErr> {
        let mut rows: Vec<_> = self
            .rows
            .read()
            .iter()
            .filter(|row| row.card_id == card_id)
            .filter(|row| since.is_none_or(|s| row.recorded_at.with_timezone(&Utc) >= s))
            .cloned()
            .collect();
        rows.sort_by_key(|row| row.recorded_at);
        Ok(rows)
    }

    async fn latest(&self, card_id: &str) -> Result<Option<price_history::Model>, DbErr> {
        Ok(self
            .rows
            .read()
            .iter()
            .filter(|row| row.card_id == card_id)
            .max_by_key(|row| row.recorded_at)
            .cloned())
    }

    async fn append(&self, sample: NewPriceSample) -> Result<(), DbErr> {
        let mut rows = self.rows.write();
        let id = rows.iter().map(|row| row.id).max().unwrap_or(0) + 1;
        rows.push(price_history::Model {
            id,
            card_id: sample.card_id,
            recorded_at: sample.recorded_at.fixed_offset(),
            loose_price_local: sample.loose_price_local,
            loose_price_foreign: sample.loose_price_foreign,
            graded_price_local: sample.graded_price_local,
            graded_price_foreign: sample.graded_price_foreign,
        });
        Ok(())
    }
}

#[derive(Clone)]
pub struct PriceHistoryService {
    store: Arc<dyn PriceHistoryStore>,
}

impl PriceHistoryService {
    pub fn new(store: Arc<dyn PriceHistoryStore>) -> Self {
        Self { store }
    }

    /// Series for `card_id` over `period`, ending at `now`.
    pub async fn series(
        &self,
        card_id: &str,
        period: Period,
        now: DateTime<Utc>,
    ) -> Result<PriceSeries, ApiError> {
        let card_id = validate_card_id(card_id)?;
        let since = period.lower_bound(now);

        let rows = self.store.samples_since(card_id, since).await?;
        debug!(card_id = %card_id, period = period.as_str(), rows = rows.len(), "Loaded price samples");

        Ok(PriceSeries {
            card_id: card_id.to_string(),
            period: period.as_str().to_string(),
            since,
            points: shape_series(rows, since),
        })
    }

    pub async fn latest_sample(&self, card_id: &str) -> Result<Option<PricePoint>, ApiError> {
        let card_id = validate_card_id(card_id)?;
        Ok(self.store.latest(card_id).await?.map(to_point))
    }

    pub async fn record(&self, sample: NewPriceSample) -> Result<(), ApiError> {
        self.store.append(sample).await?;
        Ok(())
    }
}

fn validate_card_id(card_id: &str) -> Result<&str, ApiError> {
    let trimmed = card_id.trim();
    if trimmed.is_empty() {
        return Err(ApiError::Validation("card_id is required".to_string()));
    }
    Ok(trimmed)
}

/// Convert rows into client points, ascending, dropping anything before `since`.
pub fn shape_series(
    rows: Vec<price_history::Model>,
    since: Option<DateTime<Utc>>,
) -> Vec<PricePoint> {
    let mut points: Vec<PricePoint> = rows
        .into_iter()
        .map(to_point)
        .filter(|point| since.is_none_or(|s| point.timestamp >= s))
        .collect();
    points.sort_by_key(|point| point.timestamp);
    points
}

fn to_point(row: price_history::Model) -> PricePoint {
    PricePoint {
        timestamp: row.recorded_at.with_timezone(&Utc),
        loose_price_local: decimal_or_zero(row.loose_price_local),
        loose_price_foreign: row.loose_price_foreign.unwrap_or(0),
        graded_price_local: decimal_or_zero(row.graded_price_local),
        graded_price_foreign: row.graded_price_foreign.unwrap_or(0),
    }
}

fn decimal_or_zero(value: Option<Decimal>) -> Decimal {
    value.unwrap_or(Decimal::ZERO)
}
