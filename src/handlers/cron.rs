use axum::{extract::State, http::StatusCode, Json};
use tracing::Instrument;
use uuid::Uuid;

use crate::auth::CronAuth;
use crate::error::ApiError;
use crate::models::batch::BatchSummary;
use crate::models::response::ApiResponse;
use crate::services::ingest::refresh_tracked_prices;
use crate::AppState;

/// POST /api/cron/refresh-prices
///
/// 200 when every tracked card refreshed, 207 when some failed.
pub async fn refresh_prices(
    _auth: CronAuth,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ApiResponse<BatchSummary>>), ApiError> {
    let run_id = Uuid::new_v4();
    tracing::info!(run_id = %run_id, "Cron price refresh triggered");

    let summary = refresh_tracked_prices(&state)
        .instrument(tracing::info_span!("price_refresh", run_id = %run_id))
        .await?;

    let status = summary.status();
    let success = summary.all_succeeded();
    Ok((status, Json(ApiResponse::with_success(success, summary))))
}
