pub use super::cards::Entity as Cards;
pub use super::inventory_history::Entity as InventoryHistory;
pub use super::inventory_lots::Entity as InventoryLots;
pub use super::price_history::Entity as PriceHistory;
