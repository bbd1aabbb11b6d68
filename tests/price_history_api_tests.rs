mod common;

use axum::http::StatusCode;
use chrono::{DateTime, Duration, Utc};

use crate::common::{app, clock, empty_db, fixed_now, get, sample, send, state_with_history};

fn timestamps(json: &serde_json::Value) -> Vec<DateTime<Utc>> {
    json["data"]["points"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["timestamp"].as_str().unwrap().parse().unwrap())
        .collect()
}

#[tokio::test]
async fn test_default_period_is_30_days_ascending() {
    let rows = vec![
        sample(1, "base1-4", 2),
        sample(2, "base1-4", 40),
        sample(3, "base1-4", 10),
        sample(4, "base1-4", 31),
        sample(5, "jungle-1", 1),
    ];
    let (state, _store) = state_with_history(empty_db(), "http://127.0.0.1:9", clock(), rows);
    let app = app(state);

    let (status, json) = send(&app, get("/api/price-history?card_id=base1-4")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["period"], "30d");
    assert_eq!(json["data"]["cardId"], "base1-4");

    let points = timestamps(&json);
    let bound = fixed_now() - Duration::days(30);
    assert_eq!(points.len(), 2);
    assert!(points.iter().all(|t| *t >= bound));
    assert!(points.windows(2).all(|w| w[0] <= w[1]));
}

#[tokio::test]
async fn test_unknown_period_matches_default() {
    let rows = vec![sample(1, "c", 5), sample(2, "c", 45), sample(3, "c", 100)];
    let (state, _store) = state_with_history(empty_db(), "http://127.0.0.1:9", clock(), rows);
    let app = app(state);

    let (_, lenient) = send(&app, get("/api/price-history?card_id=c&period=fortnight")).await;
    let (_, default) = send(&app, get("/api/price-history?card_id=c")).await;

    assert_eq!(lenient["data"]["period"], "30d");
    assert_eq!(lenient["data"]["points"], default["data"]["points"]);
    assert_eq!(lenient["data"]["since"], default["data"]["since"]);
}

#[tokio::test]
async fn test_all_period_has_no_bound() {
    let rows = vec![sample(1, "c", 5), sample(2, "c", 800)];
    let (state, _store) = state_with_history(empty_db(), "http://127.0.0.1:9", clock(), rows);
    let app = app(state);

    let (status, json) = send(&app, get("/api/price-history?card_id=c&period=all")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["data"].get("since").is_none());
    assert_eq!(timestamps(&json).len(), 2);
}

#[tokio::test]
async fn test_1y_window() {
    let rows = vec![sample(1, "c", 364), sample(2, "c", 366)];
    let (state, _store) = state_with_history(empty_db(), "http://127.0.0.1:9", clock(), rows);
    let app = app(state);

    let (_, json) = send(&app, get("/api/price-history?card_id=c&period=1y")).await;
    assert_eq!(timestamps(&json).len(), 1);
}

#[tokio::test]
async fn test_missing_card_id_is_400() {
    let (state, _store) = state_with_history(empty_db(), "http://127.0.0.1:9", clock(), vec![]);
    let app = app(state);

    for uri in ["/api/price-history", "/api/price-history?card_id=%20%20"] {
        let (status, json) = send(&app, get(uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
        assert_eq!(json["code"], "INVALID_INPUT");
        assert!(json["error"].as_str().unwrap().contains("card_id"));
    }
}

#[tokio::test]
async fn test_empty_series_for_unknown_card() {
    let (state, _store) = state_with_history(empty_db(), "http://127.0.0.1:9", clock(), vec![]);
    let app = app(state);

    let (status, json) = send(&app, get("/api/price-history?card_id=nope&period=7d")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["points"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_health() {
    let (state, _store) = state_with_history(empty_db(), "http://127.0.0.1:9", clock(), vec![]);
    let (status, json) = send(&app(state), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "ok");
}
