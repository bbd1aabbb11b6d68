//! Linking local cards to identifiers in external systems.
//!
//! Each system owns an `<system>_id` / `<system>_linked_at` column pair on the
//! card row. Both columns of a pair are always written by a single UPDATE.

use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use tracing::info;

use crate::entities::{cards, prelude::Cards};
use crate::error::ApiError;
use crate::models::links::LinkState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalSystem {
    Pricing,
    Marketplace,
}

impl ExternalSystem {
    pub const ALL: [ExternalSystem; 2] = [ExternalSystem::Pricing, ExternalSystem::Marketplace];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExternalSystem::Pricing => "pricing",
            ExternalSystem::Marketplace => "marketplace",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, ApiError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pricing" => Ok(ExternalSystem::Pricing),
            "marketplace" => Ok(ExternalSystem::Marketplace),
            other => Err(ApiError::Validation(format!(
                "Unknown external system '{}'. Expected one of: pricing, marketplace",
                other
            ))),
        }
    }

    /// (id column, linked_at column)
    pub fn columns(&self) -> (cards::Column, cards::Column) {
        match self {
            ExternalSystem::Pricing => (
                cards::Column::PricingProductId,
                cards::Column::PricingLinkedAt,
            ),
            ExternalSystem::Marketplace => (
                cards::Column::MarketplaceCatalogId,
                cards::Column::MarketplaceLinkedAt,
            ),
        }
    }
}

/// New values for one system's column pair. Linking sets both, unlinking
/// clears both.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkUpdate {
    pub system: ExternalSystem,
    pub external_id: Option<String>,
    pub linked_at: Option<DateTime<Utc>>,
}

impl LinkUpdate {
    pub fn link(
        system: ExternalSystem,
        external_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Self, ApiError> {
        let external_id = external_id.trim();
        if external_id.is_empty() {
            return Err(ApiError::Validation("external_id is required".to_string()));
        }

        Ok(Self {
            system,
            external_id: Some(external_id.to_string()),
            linked_at: Some(now),
        })
    }

    pub fn unlink(system: ExternalSystem) -> Self {
        Self {
            system,
            external_id: None,
            linked_at: None,
        }
    }

    /// Same change as the UPDATE, applied to a loaded row.
    pub fn apply_to(&self, card: &mut cards::Model) {
        let linked_at = self.linked_at.map(|at| at.fixed_offset());
        match self.system {
            ExternalSystem::Pricing => {
                card.pricing_product_id = self.external_id.clone();
                card.pricing_linked_at = linked_at;
            }
            ExternalSystem::Marketplace => {
                card.marketplace_catalog_id = self.external_id.clone();
                card.marketplace_linked_at = linked_at;
            }
        }
    }

    pub fn state(&self, card_id: &str) -> LinkState {
        LinkState {
            card_id: card_id.to_string(),
            system: self.system.as_str().to_string(),
            external_id: self.external_id.clone(),
            linked_at: self.linked_at,
        }
    }
}

/// Write the column pair for `card_id`. A card that does not exist is a 404.
pub async fn apply_link_update<C>(db: &C, card_id: &str, update: &LinkUpdate) -> Result<(), ApiError>
where
    C: ConnectionTrait,
{
    let (id_column, linked_at_column) = update.system.columns();

    let result = Cards::update_many()
        .col_expr(id_column, Expr::value(update.external_id.clone()))
        .col_expr(
            linked_at_column,
            Expr::value(update.linked_at.map(|at| at.fixed_offset())),
        )
        .filter(cards::Column::Id.eq(card_id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(ApiError::NotFound(format!("Card '{}' not found", card_id)));
    }

    info!(
        card_id = %card_id,
        system = update.system.as_str(),
        linked = update.external_id.is_some(),
        "Updated external link"
    );
    Ok(())
}
