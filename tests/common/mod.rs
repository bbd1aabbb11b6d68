#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use cardtrack_backend::{
    clock::ManualClock,
    config::AppConfig,
    entities::price_history,
    routes::create_router,
    services::price_history::{InMemoryPriceHistoryStore, PriceHistoryService},
    AppState,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal_macros::dec;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, Statement};
use serde_json::Value;
use tower::ServiceExt;

pub const CRON_SECRET: &str = "cron-secret";
pub const PUBLIC_API_KEY: &str = "public-key";

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
}

pub fn clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(fixed_now()))
}

/// Config pointing every external API at `upstream` (a wiremock server URI).
pub fn test_config(upstream: &str) -> AppConfig {
    let vars: HashMap<String, String> = [
        ("DATABASE_URL", "postgres://test@localhost/cardtrack_test"),
        ("PRICING_API_BASE_URL", upstream),
        ("PRICING_API_TOKEN", "pricing-token"),
        ("MARKETPLACE_API_BASE_URL", upstream),
        ("MARKETPLACE_API_TOKEN", "scraper-token"),
        ("FX_API_BASE_URL", upstream),
        ("CRON_SECRET", CRON_SECRET),
        ("PUBLIC_API_KEY", PUBLIC_API_KEY),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    AppConfig::from_map(&vars).expect("test config")
}

pub fn empty_db() -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres).into_connection()
}

/// Statements recorded by a mock connection. Every clone of the state holding
/// it must have been dropped first.
pub fn recorded_statements(db: Arc<DatabaseConnection>) -> Vec<Statement> {
    let db = Arc::try_unwrap(db)
        .ok()
        .expect("connection still shared with a live state");
    db.into_transaction_log()
        .iter()
        .flat_map(|txn| txn.statements().to_vec())
        .collect()
}

pub fn test_state(db: DatabaseConnection, upstream: &str, clock: Arc<ManualClock>) -> AppState {
    AppState::new(db, test_config(upstream), clock).expect("test state")
}

/// State whose price history reads come from `rows` instead of the database.
pub fn state_with_history(
    db: DatabaseConnection,
    upstream: &str,
    clock: Arc<ManualClock>,
    rows: Vec<price_history::Model>,
) -> (AppState, Arc<InMemoryPriceHistoryStore>) {
    let store = Arc::new(InMemoryPriceHistoryStore::with_rows(rows));
    let mut state = test_state(db, upstream, clock);
    state.history = PriceHistoryService::new(store.clone());
    (state, store)
}

pub fn app(state: AppState) -> Router {
    create_router(state)
}

pub fn sample(id: i64, card_id: &str, days_ago: i64) -> price_history::Model {
    price_history::Model {
        id,
        card_id: card_id.to_string(),
        recorded_at: (fixed_now() - Duration::days(days_ago)).fixed_offset(),
        loose_price_local: Some(dec!(12.34)),
        loose_price_foreign: Some(1851),
        graded_price_local: Some(dec!(99.00)),
        graded_price_foreign: Some(14850),
    }
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(Value::Null)
    };

    (status, json)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}
