//! Error types for mcat-server
//!
//! Every handler failure becomes a JSON body `{"error": {"code", "message"}}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::ingest::{IngestError, StoreError};

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// Upload could not be ingested (500)
    #[error("Ingestion failed: {0}")]
    Ingest(#[from] IngestError),

    /// Stream payload could not be read back
    #[error("Stream error: {0}")]
    Store(#[from] StoreError),

    /// mcat-common error
    #[error("Common error: {0}")]
    Common(#[from] mcat_common::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg),
            ApiError::Ingest(ref err) => {
                tracing::error!(kind = err.kind(), "Upload rejected: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INGEST_FAILED",
                    err.to_string(),
                )
            }
            ApiError::Store(StoreError::NotFound(ref locator)) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("stream object {}", locator),
            ),
            ApiError::Store(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "STREAM_ERROR",
                err.to_string(),
            ),
            ApiError::Common(mcat_common::Error::NotFound(msg)) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", msg)
            }
            ApiError::Common(mcat_common::Error::InvalidInput(msg)) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg)
            }
            ApiError::Common(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "COMMON_ERROR",
                err.to_string(),
            ),
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
