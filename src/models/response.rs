//! JSON envelopes shared by every endpoint.

use serde::{Deserialize, Serialize};

/// Success envelope: `{ "success": true, "data": ... }`.
///
/// Batch endpoints answering 207 set `success` to false while still carrying
/// per-item results in `data`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }

    pub fn with_success(success: bool, data: T) -> Self {
        Self { success, data }
    }
}

/// Error envelope: `{ "success": false, "error": "...", "code": "..." }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}
