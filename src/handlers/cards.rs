use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use tracing::{info, warn};

use crate::entities::{cards, prelude::Cards};
use crate::error::ApiError;
use crate::models::batch::{BatchItemResult, BatchSummary};
use crate::models::cards::{CardPage, CardSearchQuery, ScheduleUpdateRequest};
use crate::models::response::ApiResponse;
use crate::AppState;

/// GET /api/cards?search=&offset=&limit=
pub async fn list_cards(
    State(state): State<AppState>,
    query: Result<Query<CardSearchQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<CardPage<cards::Model>>>, ApiError> {
    let Query(query) = query?;
    let (offset, limit) = query.page();

    let mut select = Cards::find();
    if let Some(term) = query.term() {
        let pattern = format!("%{}%", escape_like(&term.to_lowercase()));
        select = select.filter(Expr::expr(Func::lower(Expr::col(cards::Column::Name))).like(pattern));
    }

    let items = select
        .order_by_asc(cards::Column::Name)
        .order_by_asc(cards::Column::Id)
        .offset(offset)
        .limit(limit)
        .all(state.db.as_ref())
        .await?;

    Ok(Json(ApiResponse::ok(CardPage {
        items,
        offset,
        limit,
    })))
}

/// GET /api/cards/{card_id}
pub async fn get_card(
    State(state): State<AppState>,
    Path(card_id): Path<String>,
) -> Result<Json<ApiResponse<cards::Model>>, ApiError> {
    let card = Cards::find_by_id(card_id.clone())
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Card '{}' not found", card_id)))?;

    Ok(Json(ApiResponse::ok(card)))
}

/// PATCH /api/cards
///
/// Each update is applied on its own. 200 when all succeed, 207 with
/// per-card results otherwise.
pub async fn update_schedules(
    State(state): State<AppState>,
    body: Result<Json<ScheduleUpdateRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<BatchSummary>>), ApiError> {
    let Json(request) = body?;

    if request.updates.is_empty() {
        return Err(ApiError::Validation("updates must not be empty".to_string()));
    }

    let mut summary = BatchSummary::default();

    for update in request.updates {
        let card_id = update.card_id.trim();
        if card_id.is_empty() {
            summary.push(BatchItemResult::failed(&update.card_id, "card_id is required"));
            continue;
        }

        let result = Cards::update_many()
            .col_expr(cards::Column::AutoRefresh, Expr::value(update.auto_refresh))
            .filter(cards::Column::Id.eq(card_id))
            .exec(state.db.as_ref())
            .await;

        let item = match result {
            Ok(res) if res.rows_affected > 0 => BatchItemResult::ok(card_id),
            Ok(_) => BatchItemResult::failed(card_id, "Card not found"),
            Err(e) => {
                warn!(card_id = %card_id, error = %e, "Schedule update failed");
                BatchItemResult::failed(card_id, format!("Database error: {}", e))
            }
        };
        summary.push(item);
    }

    info!(
        succeeded = summary.succeeded,
        failed = summary.failed,
        "Applied refresh schedule updates"
    );

    let status = summary.status();
    let success = summary.all_succeeded();
    Ok((status, Json(ApiResponse::with_success(success, summary))))
}

/// Escape LIKE wildcards so the search term matches literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
