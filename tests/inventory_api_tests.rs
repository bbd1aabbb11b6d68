mod common;

use axum::http::StatusCode;
use cardtrack_backend::entities::{inventory_history, inventory_lots};
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
use serde_json::json;

use crate::common::{app, clock, empty_db, fixed_now, json_request, send, test_state};

fn lot(quantity: i32) -> inventory_lots::Model {
    inventory_lots::Model {
        id: 12,
        card_id: "base1-4".to_string(),
        quantity,
        updated_at: None,
    }
}

#[tokio::test]
async fn test_adjust_updates_lot_and_logs() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![lot(4)]])
        .append_query_results([vec![inventory_history::Model {
            id: 900,
            lot_id: 12,
            delta: -1,
            quantity_after: 3,
            reason: Some("sold at counter".to_string()),
            created_at: fixed_now().fixed_offset(),
        }]])
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();

    let state = test_state(db, "http://127.0.0.1:9", clock());
    let (status, json) = send(
        &app(state),
        json_request(
            "POST",
            "/api/inventory/lots/12/adjust",
            json!({ "delta": -1, "reason": "sold at counter" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["lotId"], 12);
    assert_eq!(json["data"]["quantityBefore"], 4);
    assert_eq!(json["data"]["quantityAfter"], 3);
    assert_eq!(json["data"]["historyId"], 900);
}

#[tokio::test]
async fn test_adjust_below_zero_is_400() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![lot(1)]])
        .into_connection();

    let state = test_state(db, "http://127.0.0.1:9", clock());
    let (status, json) = send(
        &app(state),
        json_request("POST", "/api/inventory/lots/12/adjust", json!({ "delta": -5 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("negative"));
}

#[tokio::test]
async fn test_missing_lot_is_404() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<inventory_lots::Model>::new()])
        .into_connection();

    let state = test_state(db, "http://127.0.0.1:9", clock());
    let (status, _) = send(
        &app(state),
        json_request("POST", "/api/inventory/lots/12/adjust", json!({ "delta": 2 })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_input_is_400() {
    let state = test_state(empty_db(), "http://127.0.0.1:9", clock());
    let app = app(state);

    let (status, _) = send(
        &app,
        json_request("POST", "/api/inventory/lots/12/adjust", json!({ "delta": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, json) = send(
        &app,
        json_request("POST", "/api/inventory/lots/abc/adjust", json!({ "delta": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVALID_INPUT");
}
