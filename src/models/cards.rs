use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_LIMIT: u64 = 50;
pub const MAX_PAGE_LIMIT: u64 = 200;

/// Query parameters for GET /api/cards
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CardSearchQuery {
    /// Case-insensitive substring of the card name
    pub search: Option<String>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

impl CardSearchQuery {
    /// Trimmed search term, `None` when blank
    pub fn term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// Offset and limit with defaults applied and the limit clamped to 1..=MAX_PAGE_LIMIT
    pub fn page(&self) -> (u64, u64) {
        let offset = self.offset.unwrap_or(0);
        let limit = self
            .limit
            .unwrap_or(DEFAULT_PAGE_LIMIT)
            .clamp(1, MAX_PAGE_LIMIT);
        (offset, limit)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleUpdate {
    pub card_id: String,
    pub auto_refresh: bool,
}

/// Body for PATCH /api/cards
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleUpdateRequest {
    pub updates: Vec<ScheduleUpdate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardPage<T> {
    pub items: Vec<T>,
    pub offset: u64,
    pub limit: u64,
}
