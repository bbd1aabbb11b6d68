use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};

use crate::auth::PublicApiKey;
use crate::error::ApiError;
use crate::models::price_history::{Period, PeriodQuery, PublicPriceSummary};
use crate::models::response::ApiResponse;
use crate::AppState;

/// GET /api/public/cards/{card_id}/prices?period=90d
///
/// Read-only summary for partners holding the public API key. A card with no
/// recorded prices is a 404.
pub async fn get_public_prices(
    _key: PublicApiKey,
    State(state): State<AppState>,
    Path(card_id): Path<String>,
    query: Result<Query<PeriodQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<PublicPriceSummary>>, ApiError> {
    let Query(query) = query?;
    let period = Period::parse_lenient(query.period.as_deref());

    let latest = state
        .history
        .latest_sample(&card_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No prices recorded for card '{}'", card_id)))?;

    let series = state
        .history
        .series(&card_id, period, state.clock.now())
        .await?;

    Ok(Json(ApiResponse::ok(PublicPriceSummary {
        card_id: series.card_id.clone(),
        latest: Some(latest),
        series,
    })))
}
