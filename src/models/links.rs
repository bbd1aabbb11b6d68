use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body for PUT /api/cards/{card_id}/links/{system}
#[derive(Debug, Clone, Deserialize)]
pub struct LinkRequest {
    pub external_id: String,
}

/// Link columns of one external system after an update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkState {
    pub card_id: String,
    pub system: String,
    pub external_id: Option<String>,
    pub linked_at: Option<DateTime<Utc>>,
}
