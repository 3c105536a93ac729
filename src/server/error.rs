//! Error types for the REST API server

use crate::time_series::RangeError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// API error types
#[derive(Debug)]
pub enum ApiError {
    /// Unparsable or inverted date range
    InvalidDateRange(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::InvalidDateRange(msg) => write!(f, "Invalid date range: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            ApiError::InvalidDateRange(msg) => {
                (StatusCode::BAD_REQUEST, "InvalidDateRange", msg.clone())
            }
        };

        tracing::debug!("Request failed: {}", self);

        let body = Json(json!({
            "error": error_type,
            "message": message,
        }));

        (status, body).into_response()
    }
}

impl From<RangeError> for ApiError {
    fn from(err: RangeError) -> Self {
        match err {
            RangeError::InvalidRange { start, end } => ApiError::InvalidDateRange(format!(
                "Start date {} must be before or equal to end date {}",
                start, end
            )),
        }
    }
}
