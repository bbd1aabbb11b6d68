use axum::Json;
use serde_json::{json, Value};

use crate::models::response::ApiResponse;

pub async fn health() -> Json<ApiResponse<Value>> {
    Json(ApiResponse::ok(json!({ "status": "ok" })))
}
