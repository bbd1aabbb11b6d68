use serde::{Deserialize, Serialize};

/// Body for POST /api/inventory/lots/{lot_id}/adjust
#[derive(Debug, Clone, Deserialize)]
pub struct AdjustInventoryRequest {
    pub delta: i32,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustmentOutcome {
    pub lot_id: i32,
    pub quantity_before: i32,
    pub quantity_after: i32,
    pub history_id: i64,
}
