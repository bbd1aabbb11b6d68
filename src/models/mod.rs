pub mod batch;
pub mod cards;
pub mod inventory;
pub mod links;
pub mod marketplace;
pub mod price_history;
pub mod pricing;
pub mod response;
