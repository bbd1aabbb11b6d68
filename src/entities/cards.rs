//! SeaORM Entity for local card records

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cards")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub set_name: Option<String>,
    /// Included in the cron-triggered price refresh
    pub auto_refresh: bool,
    /// Product id in the card-pricing API
    pub pricing_product_id: Option<String>,
    pub pricing_linked_at: Option<DateTimeWithTimeZone>,
    /// Catalog id in the marketplace scraper
    pub marketplace_catalog_id: Option<String>,
    pub marketplace_linked_at: Option<DateTimeWithTimeZone>,
    pub created_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
