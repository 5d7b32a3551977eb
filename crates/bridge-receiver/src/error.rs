//! Receiver error types and the JSON error response shape.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::config::ConfigError;
use crate::ports::ItemStoreError;

/// Service-level errors (startup and I/O).
#[derive(Debug, Error)]
pub enum ReceiverError {
    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Public key could not be loaded for signature verification.
    #[error(transparent)]
    Crypto(#[from] bridge_crypto::CryptoError),

    /// Item store failed to open.
    #[error(transparent)]
    Store(#[from] ItemStoreError),

    /// Listener could not be bound.
    #[error("failed to bind listener: {0}")]
    Bind(#[from] std::io::Error),
}

/// An HTTP error response: status code plus a structured JSON body.
///
/// Internal exception text never leaves the process; the `internal`
/// constructor logs nothing itself and carries only a generic message.
#[derive(Debug)]
pub struct ApiError {
    /// Status code for the response.
    pub status: StatusCode,
    /// Client-facing message.
    pub message: String,
}

impl ApiError {
    /// `401 {"error": "Unauthorized"}`.
    pub fn unauthorized() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: "Unauthorized".to_string(),
        }
    }

    /// `400` with a client-safe reason.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    /// `415 {"error": "Content-Type must be application/json"}`.
    pub fn unsupported_media_type() -> Self {
        Self {
            status: StatusCode::UNSUPPORTED_MEDIA_TYPE,
            message: "Content-Type must be application/json".to_string(),
        }
    }

    /// `500` with a generic message; the underlying cause stays server-side.
    pub fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "An internal processing error occurred".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
