//! Scheduled price refresh: pull current prices for every tracked card and
//! append one history sample per card.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use tracing::{info, warn};

use crate::entities::{cards, prelude::Cards};
use crate::error::ApiError;
use crate::models::batch::{BatchItemResult, BatchSummary};
use crate::models::pricing::PricingProduct;
use crate::services::price_history::NewPriceSample;
use crate::services::units::{convert_minor, minor_to_major};
use crate::AppState;

/// Refresh every card with `auto_refresh` set and a linked pricing product.
///
/// The exchange rate is fetched once up front and a failure there aborts the
/// run. After that each card succeeds or fails on its own and failures are
/// reported in the summary without retrying.
pub async fn refresh_tracked_prices(state: &AppState) -> Result<BatchSummary, ApiError> {
    let tracked = Cards::find()
        .filter(cards::Column::AutoRefresh.eq(true))
        .filter(cards::Column::PricingProductId.is_not_null())
        .order_by_asc(cards::Column::Id)
        .all(state.db.as_ref())
        .await?;

    let mut summary = BatchSummary::default();
    if tracked.is_empty() {
        info!("No cards scheduled for price refresh");
        return Ok(summary);
    }

    let currency = state.config.foreign_currency.as_str();
    let rate = state.exchange_rates.local_to(currency).await?;
    let now = state.clock.now();

    info!(cards = tracked.len(), currency = %currency, rate = %rate, "Starting price refresh");

    for card in tracked {
        let Some(product_id) = card.pricing_product_id.as_deref() else {
            continue;
        };

        let result = match state.pricing.product(product_id).await {
            Ok(product) => state
                .history
                .record(build_sample(&card.id, &product, rate, now))
                .await
                .map(|_| BatchItemResult::ok(&card.id))
                .unwrap_or_else(|e| BatchItemResult::failed(&card.id, e.message())),
            Err(e) => BatchItemResult::failed(&card.id, e.to_string()),
        };

        if let Some(error) = &result.error {
            warn!(card_id = %card.id, product_id = %product_id, error = %error, "Price refresh failed");
        }
        summary.push(result);
    }

    info!(
        succeeded = summary.succeeded,
        failed = summary.failed,
        "Price refresh finished"
    );
    Ok(summary)
}

/// Sample from a pricing API product: cents become major units in the
/// pricing currency, and whole amounts in the shop currency via `rate`.
pub fn build_sample(
    card_id: &str,
    product: &PricingProduct,
    rate: Decimal,
    now: DateTime<Utc>,
) -> NewPriceSample {
    NewPriceSample {
        card_id: card_id.to_string(),
        recorded_at: now,
        loose_price_local: product.loose_price.map(minor_to_major),
        loose_price_foreign: product.loose_price.and_then(|c| convert_minor(c, rate)),
        graded_price_local: product.graded_price.map(minor_to_major),
        graded_price_foreign: product.graded_price.and_then(|c| convert_minor(c, rate)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    #[test]
    fn test_build_sample_converts_units() {
        let now = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let product = PricingProduct {
            id: "6910".to_string(),
            product_name: "Charizard #4".to_string(),
            set_name: None,
            loose_price: Some(1235),
            graded_price: None,
        };

        let sample = build_sample("base1-4", &product, dec!(150), now);

        assert_eq!(sample.card_id, "base1-4");
        assert_eq!(sample.recorded_at, now);
        assert_eq!(sample.loose_price_local, Some(dec!(12.35)));
        assert_eq!(sample.loose_price_foreign, Some(1853));
        assert_eq!(sample.graded_price_local, None);
        assert_eq!(sample.graded_price_foreign, None);
    }
}
