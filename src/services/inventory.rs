//! Inventory lot adjustments.
//!
//! The lot update and its history row are written in one transaction. The
//! lot row is locked for the duration so concurrent adjustments serialise.

use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QuerySelect, TransactionError, TransactionTrait,
};

use crate::entities::{
    inventory_history, inventory_lots,
    prelude::{InventoryHistory, InventoryLots},
};
use crate::models::inventory::AdjustmentOutcome;

#[derive(Debug)]
pub enum InventoryError {
    LotNotFound(i32),
    InsufficientQuantity { available: i32, requested: i32 },
    QuantityOverflow { available: i32, requested: i32 },
    Database(DbErr),
}

impl std::fmt::Display for InventoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InventoryError::LotNotFound(id) => write!(f, "Inventory lot {} not found", id),
            InventoryError::InsufficientQuantity {
                available,
                requested,
            } => write!(
                f,
                "Adjustment of {} would leave a negative quantity (available: {})",
                requested, available
            ),
            InventoryError::QuantityOverflow {
                available,
                requested,
            } => write!(
                f,
                "Adjustment of {} overflows the lot quantity (available: {})",
                requested, available
            ),
            InventoryError::Database(e) => write!(f, "Database error: {}", e),
        }
    }
}

impl std::error::Error for InventoryError {}

impl From<DbErr> for InventoryError {
    fn from(e: DbErr) -> Self {
        InventoryError::Database(e)
    }
}

/// Quantity after applying `delta`, rejecting a negative result.
pub fn apply_delta(quantity: i32, delta: i32) -> Result<i32, InventoryError> {
    let after = quantity
        .checked_add(delta)
        .ok_or(InventoryError::QuantityOverflow {
            available: quantity,
            requested: delta,
        })?;

    if after < 0 {
        return Err(InventoryError::InsufficientQuantity {
            available: quantity,
            requested: delta,
        });
    }
    Ok(after)
}

/// Apply `delta` to a lot and log it. Either both writes commit or neither.
pub async fn adjust_lot(
    db: &DatabaseConnection,
    lot_id: i32,
    delta: i32,
    reason: Option<String>,
    now: DateTime<Utc>,
) -> Result<AdjustmentOutcome, InventoryError> {
    let outcome = db
        .transaction::<_, AdjustmentOutcome, InventoryError>(move |txn| {
            Box::pin(async move {
                let lot = InventoryLots::find_by_id(lot_id)
                    .lock_exclusive()
                    .one(txn)
                    .await?
                    .ok_or(InventoryError::LotNotFound(lot_id))?;

                let quantity_after = apply_delta(lot.quantity, delta)?;
                let stamp = now.fixed_offset();

                InventoryLots::update_many()
                    .col_expr(inventory_lots::Column::Quantity, Expr::value(quantity_after))
                    .col_expr(inventory_lots::Column::UpdatedAt, Expr::value(Some(stamp)))
                    .filter(inventory_lots::Column::Id.eq(lot_id))
                    .exec(txn)
                    .await?;

                let entry = inventory_history::ActiveModel {
                    lot_id: Set(lot_id),
                    delta: Set(delta),
                    quantity_after: Set(quantity_after),
                    reason: Set(reason),
                    created_at: Set(stamp),
                    ..Default::default()
                };
                let inserted = InventoryHistory::insert(entry).exec(txn).await?;

                Ok(AdjustmentOutcome {
                    lot_id,
                    quantity_before: lot.quantity,
                    quantity_after,
                    history_id: inserted.last_insert_id,
                })
            })
        })
        .await
        .map_err(|e| match e {
            TransactionError::Connection(db) => InventoryError::Database(db),
            TransactionError::Transaction(inner) => inner,
        })?;

    tracing::info!(
        lot_id,
        delta,
        quantity_after = outcome.quantity_after,
        history_id = outcome.history_id,
        "Adjusted inventory lot"
    );
    Ok(outcome)
}
