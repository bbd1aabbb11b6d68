use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};

use crate::error::ApiError;
use crate::models::pricing::{CardSetsResponse, PricingProduct, PricingSearchQuery};
use crate::models::response::ApiResponse;
use crate::AppState;

/// GET /api/pricing/search?q=charizard
pub async fn search_products(
    State(state): State<AppState>,
    query: Result<Query<PricingSearchQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<PricingProduct>>>, ApiError> {
    let Query(query) = query?;

    let term = query.q.as_deref().map(str::trim).unwrap_or_default();
    if term.is_empty() {
        return Err(ApiError::Validation("q is required".to_string()));
    }

    let products = state.pricing.search(term).await?;
    Ok(Json(ApiResponse::ok(products)))
}

/// GET /api/pricing/sets
pub async fn list_sets(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<CardSetsResponse>>, ApiError> {
    let sets = state.pricing.sets().await?;

    Ok(Json(ApiResponse::ok(CardSetsResponse {
        sets: sets.sets,
        cached: sets.cached,
        fetched_at: sets.fetched_at,
    })))
}
