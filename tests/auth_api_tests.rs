mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use cardtrack_backend::entities::cards;
use rust_decimal_macros::dec;
use sea_orm::{DatabaseBackend, MockDatabase};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{
    app, clock, empty_db, fixed_now, get, sample, send, state_with_history, CRON_SECRET,
    PUBLIC_API_KEY,
};

fn cron_request(token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/cron/refresh-prices");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

fn public_request(card_id: &str, key: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(format!("/api/public/cards/{}/prices", card_id));
    if let Some(key) = key {
        builder = builder.header("x-api-key", key);
    }
    builder.body(Body::empty()).unwrap()
}

fn tracked_card(id: &str, product_id: &str) -> cards::Model {
    cards::Model {
        id: id.to_string(),
        name: format!("Card {}", id),
        set_name: None,
        auto_refresh: true,
        pricing_product_id: Some(product_id.to_string()),
        pricing_linked_at: None,
        marketplace_catalog_id: None,
        marketplace_linked_at: None,
        created_at: None,
    }
}

async fn mount_rate(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/latest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "base": "USD",
            "rates": { "JPY": 150 }
        })))
        .mount(server)
        .await;
}

async fn mount_product(server: &MockServer, id: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/api/product"))
        .and(query_param("id", id))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_cron_rejects_missing_and_wrong_secret() {
    let (state, _store) = state_with_history(empty_db(), "http://127.0.0.1:9", clock(), vec![]);
    let app = app(state);

    let (status, json) = send(&app, cron_request(None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "UNAUTHORIZED");

    let (status, _) = send(&app, cron_request(Some("guess"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_cron_without_configured_secret_rejects_everything() {
    let (mut state, _store) = state_with_history(empty_db(), "http://127.0.0.1:9", clock(), vec![]);
    let mut config = (*state.config).clone();
    config.cron_secret = None;
    state.config = std::sync::Arc::new(config);

    let (status, _) = send(&app(state), cron_request(Some(CRON_SECRET))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_cron_refresh_all_succeed() {
    let server = MockServer::start().await;
    mount_rate(&server).await;
    mount_product(
        &server,
        "6910",
        json!({ "status": "success", "id": "6910", "product-name": "Charizard", "loose-price": 1235, "graded-price": 10000 }),
    )
    .await;

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![tracked_card("base1-4", "6910")]])
        .into_connection();
    let (state, store) = state_with_history(db, &server.uri(), clock(), vec![]);

    let (status, json) = send(&app(state), cron_request(Some(CRON_SECRET))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["succeeded"], 1);

    let rows = store.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].card_id, "base1-4");
    assert_eq!(rows[0].recorded_at, fixed_now().fixed_offset());
    assert_eq!(rows[0].loose_price_local, Some(dec!(12.35)));
    assert_eq!(rows[0].loose_price_foreign, Some(1853));
    assert_eq!(rows[0].graded_price_local, Some(dec!(100.00)));
    assert_eq!(rows[0].graded_price_foreign, Some(15000));
}

#[tokio::test]
async fn test_cron_partial_failure_is_207() {
    let server = MockServer::start().await;
    mount_rate(&server).await;
    mount_product(
        &server,
        "1",
        json!({ "status": "success", "id": "1", "product-name": "Pikachu", "loose-price": 500 }),
    )
    .await;
    mount_product(
        &server,
        "2",
        json!({ "status": "error", "error-message": "Invalid product id" }),
    )
    .await;

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![tracked_card("a", "1"), tracked_card("b", "2")]])
        .into_connection();
    let (state, store) = state_with_history(db, &server.uri(), clock(), vec![]);

    let (status, json) = send(&app(state), cron_request(Some(CRON_SECRET))).await;

    assert_eq!(status, StatusCode::MULTI_STATUS);
    assert_eq!(json["success"], false);
    assert_eq!(json["data"]["succeeded"], 1);
    assert_eq!(json["data"]["failed"], 1);

    let results = json["data"]["results"].as_array().unwrap();
    assert_eq!(results[1]["id"], "b");
    assert!(results[1]["error"].as_str().unwrap().contains("Invalid product id"));

    assert_eq!(store.rows().len(), 1);
}

#[tokio::test]
async fn test_cron_rate_failure_aborts_run() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/latest"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![tracked_card("a", "1")]])
        .into_connection();
    let (state, store) = state_with_history(db, &server.uri(), clock(), vec![]);

    let (status, json) = send(&app(state), cron_request(Some(CRON_SECRET))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "UPSTREAM_ERROR");
    assert!(store.rows().is_empty());
}

#[tokio::test]
async fn test_public_endpoint_requires_key() {
    let rows = vec![sample(1, "base1-4", 3)];
    let (state, _store) = state_with_history(empty_db(), "http://127.0.0.1:9", clock(), rows);
    let app = app(state);

    let (status, _) = send(&app, public_request("base1-4", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, json) = send(&app, public_request("base1-4", Some("nope"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn test_public_endpoint_with_key() {
    let rows = vec![sample(1, "base1-4", 3), sample(2, "base1-4", 1), sample(3, "base1-4", 60)];
    let (state, _store) = state_with_history(empty_db(), "http://127.0.0.1:9", clock(), rows);
    let app = app(state);

    let (status, json) = send(&app, public_request("base1-4", Some(PUBLIC_API_KEY))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["cardId"], "base1-4");
    assert_eq!(json["data"]["series"]["points"].as_array().unwrap().len(), 2);

    let latest: chrono::DateTime<chrono::Utc> = json["data"]["latest"]["timestamp"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();
    assert_eq!(latest, fixed_now() - chrono::Duration::days(1));
}

#[tokio::test]
async fn test_public_endpoint_unknown_card_is_404() {
    let (state, _store) = state_with_history(empty_db(), "http://127.0.0.1:9", clock(), vec![]);
    let (status, json) = send(&app(state), public_request("ghost", Some(PUBLIC_API_KEY))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_private_routes_do_not_need_key() {
    let (state, _store) = state_with_history(empty_db(), "http://127.0.0.1:9", clock(), vec![]);
    let (status, _) = send(&app(state), get("/api/price-history?card_id=x")).await;
    assert_eq!(status, StatusCode::OK);
}
