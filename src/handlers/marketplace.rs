use axum::{
    extract::{Path, State},
    Json,
};
use tracing::warn;

use crate::error::ApiError;
use crate::models::marketplace::{MarketplaceListingsResponse, PricedListing};
use crate::models::response::ApiResponse;
use crate::services::marketplace::validate_catalog_id;
use crate::services::units::foreign_to_local;
use crate::AppState;

/// GET /api/marketplace/{catalog_id}/listings
///
/// Served from the listings cache when fresh. Listing prices are in the shop
/// currency; `price_local` adds the pricing-currency equivalent. When the
/// exchange rate cannot be fetched the listings are still returned without it.
pub async fn get_catalog_listings(
    State(state): State<AppState>,
    Path(catalog_id): Path<String>,
) -> Result<Json<ApiResponse<MarketplaceListingsResponse>>, ApiError> {
    let catalog_id = validate_catalog_id(&catalog_id)?;

    let lookup = state.marketplace.listings(catalog_id).await?;

    let rate = match state
        .exchange_rates
        .local_to(&state.config.foreign_currency)
        .await
    {
        Ok(rate) => Some(rate),
        Err(e) => {
            warn!(catalog_id = %catalog_id, error = %e, "Exchange rate unavailable, skipping local prices");
            None
        }
    };

    let listings = lookup
        .listings
        .listings
        .into_iter()
        .map(|listing| {
            let price_local = rate.and_then(|rate| foreign_to_local(listing.price, rate));
            PricedListing {
                listing,
                price_local,
            }
        })
        .collect();

    Ok(Json(ApiResponse::ok(MarketplaceListingsResponse {
        catalog_id: lookup.listings.catalog_id,
        cached: lookup.cached,
        fetched_at: lookup.fetched_at,
        usage: lookup.listings.usage,
        listings,
    })))
}
