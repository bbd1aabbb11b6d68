use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};

use crate::error::ApiError;
use crate::models::inventory::{AdjustInventoryRequest, AdjustmentOutcome};
use crate::models::response::ApiResponse;
use crate::services::inventory::adjust_lot;
use crate::AppState;

/// POST /api/inventory/lots/{lot_id}/adjust
pub async fn adjust_inventory(
    State(state): State<AppState>,
    lot_id: Result<Path<i32>, PathRejection>,
    body: Result<Json<AdjustInventoryRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<AdjustmentOutcome>>, ApiError> {
    let Path(lot_id) = lot_id?;
    let Json(request) = body?;

    if request.delta == 0 {
        return Err(ApiError::Validation("delta must not be zero".to_string()));
    }

    let reason = request
        .reason
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty());

    let outcome = adjust_lot(state.db.as_ref(), lot_id, request.delta, reason, state.clock.now()).await?;
    Ok(Json(ApiResponse::ok(outcome)))
}
