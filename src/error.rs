//! Error types for the diagnostics/admin surface
//!
//! The shield components themselves never fail in normal operation; these
//! errors exist for the HTTP layer — bad admin requests, unknown cache
//! names, and rate-limited clients.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Shield Error Enum ==
/// Unified error type for the HTTP surface.
#[derive(Error, Debug)]
pub enum ShieldError {
    /// Malformed admin request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Admin request named a cache instance that does not exist
    #[error("Unknown cache: {0}")]
    UnknownCache(String),

    /// Requested record not present
    #[error("Not found: {0}")]
    NotFound(String),

    /// Client exhausted its request window
    #[error("Too many requests, retry in {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for ShieldError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let status = match &self {
            ShieldError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ShieldError::UnknownCache(_) | ShieldError::NotFound(_) => StatusCode::NOT_FOUND,
            ShieldError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            ShieldError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": message }));

        // 429 responses carry a Retry-After hint so clients can back off.
        if let ShieldError::RateLimited { retry_after_secs } = self {
            return (
                status,
                [(header::RETRY_AFTER, retry_after_secs.to_string())],
                body,
            )
                .into_response();
        }

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the HTTP surface.
pub type Result<T> = std::result::Result<T, ShieldError>;
