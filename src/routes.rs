use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::handlers::{cards, cron, health, inventory, links, marketplace, price_history, pricing, public};
use crate::rate_limit::enforce_rate_limit;
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    // Each listings miss can trigger a paid scraper run
    let marketplace_routes = Router::new()
        .route(
            "/api/marketplace/{catalog_id}/listings",
            get(marketplace::get_catalog_listings),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), enforce_rate_limit));

    Router::new()
        .route("/health", get(health::health))
        .route("/api/price-history", get(price_history::get_price_history))
        .route(
            "/api/cards",
            get(cards::list_cards).patch(cards::update_schedules),
        )
        .route("/api/cards/{card_id}", get(cards::get_card))
        .route(
            "/api/cards/{card_id}/links/{system}",
            put(links::link_external_id).delete(links::unlink_external_id),
        )
        .route("/api/pricing/search", get(pricing::search_products))
        .route("/api/pricing/sets", get(pricing::list_sets))
        .route("/api/cron/refresh-prices", post(cron::refresh_prices))
        .route(
            "/api/public/cards/{card_id}/prices",
            get(public::get_public_prices),
        )
        .route(
            "/api/inventory/lots/{lot_id}/adjust",
            post(inventory::adjust_inventory),
        )
        .merge(marketplace_routes)
        .with_state(state)
}
