use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};

use crate::error::ApiError;
use crate::models::price_history::{Period, PriceHistoryQuery, PriceSeries};
use crate::models::response::ApiResponse;
use crate::AppState;

/// GET /api/price-history?card_id=...&period=30d
///
/// An unknown or missing period falls back to the default window. A missing
/// or blank `card_id` is a 400.
pub async fn get_price_history(
    State(state): State<AppState>,
    query: Result<Query<PriceHistoryQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<PriceSeries>>, ApiError> {
    let Query(query) = query?;

    let card_id = query.card_id.as_deref().unwrap_or_default();
    let period = Period::parse_lenient(query.period.as_deref());

    let series = state
        .history
        .series(card_id, period, state.clock.now())
        .await?;

    tracing::debug!(
        card_id = %series.card_id,
        period = %series.period,
        points = series.points.len(),
        "Served price history"
    );

    Ok(Json(ApiResponse::ok(series)))
}
