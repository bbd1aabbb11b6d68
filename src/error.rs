//! Error type every handler returns.
//!
//! Each variant maps to one status code and is rendered as the JSON error
//! envelope, so nothing escapes a handler as a panic or a bare 500.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::DbErr;
use tracing::{error, warn};

use crate::models::response::ErrorResponse;
use crate::services::inventory::InventoryError;
use crate::services::upstream::UpstreamError;

#[derive(Debug)]
pub enum ApiError {
    /// Missing or malformed input.
    Validation(String),
    /// Missing or incorrect credential.
    Unauthorized(String),
    NotFound(String),
    RateLimited(String),
    /// Third-party API or datastore failure; the message is passed through.
    Upstream(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "INVALID_INPUT",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::RateLimited(_) => "RATE_LIMITED",
            ApiError::Upstream(_) => "UPSTREAM_ERROR",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::Validation(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::NotFound(msg)
            | ApiError::RateLimited(msg)
            | ApiError::Upstream(msg) => msg,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Validation(msg) => write!(f, "Validation error: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::RateLimited(msg) => write!(f, "Rate limited: {}", msg),
            ApiError::Upstream(msg) => write!(f, "Upstream error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<DbErr> for ApiError {
    fn from(e: DbErr) -> Self {
        ApiError::Upstream(format!("Database error: {}", e))
    }
}

impl From<UpstreamError> for ApiError {
    fn from(e: UpstreamError) -> Self {
        ApiError::Upstream(e.to_string())
    }
}

impl From<InventoryError> for ApiError {
    fn from(e: InventoryError) -> Self {
        match e {
            InventoryError::LotNotFound(_) => ApiError::NotFound(e.to_string()),
            InventoryError::InsufficientQuantity { .. } | InventoryError::QuantityOverflow { .. } => {
                ApiError::Validation(e.to_string())
            }
            InventoryError::Database(db) => db.into(),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(e: QueryRejection) -> Self {
        ApiError::Validation(e.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        ApiError::Validation(e.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(e: PathRejection) -> Self {
        ApiError::Validation(e.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Upstream(msg) => error!(code = self.code(), "{}", msg),
            other => warn!(code = other.code(), status = status.as_u16(), "{}", other.message()),
        }

        let body = Json(ErrorResponse {
            success: false,
            error: self.message().to_string(),
            code: Some(self.code().to_string()),
        });

        (status, body).into_response()
    }
}
