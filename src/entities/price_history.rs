//! SeaORM Entity for card price samples (append-only)

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "price_history")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub card_id: String,
    pub recorded_at: DateTimeWithTimeZone,
    /// Ungraded price in the pricing API currency, major units
    #[sea_orm(column_type = "Decimal(Some((12, 2)))", nullable)]
    pub loose_price_local: Option<Decimal>,
    /// Ungraded price in the shop currency
    pub loose_price_foreign: Option<i64>,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))", nullable)]
    pub graded_price_local: Option<Decimal>,
    pub graded_price_foreign: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
