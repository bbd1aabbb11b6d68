use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};

use crate::error::ApiError;
use crate::models::links::{LinkRequest, LinkState};
use crate::models::response::ApiResponse;
use crate::services::links::{apply_link_update, ExternalSystem, LinkUpdate};
use crate::AppState;

/// PUT /api/cards/{card_id}/links/{system}
pub async fn link_external_id(
    State(state): State<AppState>,
    Path((card_id, system)): Path<(String, String)>,
    body: Result<Json<LinkRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<LinkState>>, ApiError> {
    let system = ExternalSystem::parse(&system)?;
    let Json(request) = body?;

    let update = LinkUpdate::link(system, &request.external_id, state.clock.now())?;
    apply_link_update(state.db.as_ref(), &card_id, &update).await?;

    Ok(Json(ApiResponse::ok(update.state(&card_id))))
}

/// DELETE /api/cards/{card_id}/links/{system}
pub async fn unlink_external_id(
    State(state): State<AppState>,
    Path((card_id, system)): Path<(String, String)>,
) -> Result<Json<ApiResponse<LinkState>>, ApiError> {
    let system = ExternalSystem::parse(&system)?;

    let update = LinkUpdate::unlink(system);
    apply_link_update(state.db.as_ref(), &card_id, &update).await?;

    Ok(Json(ApiResponse::ok(update.state(&card_id))))
}
