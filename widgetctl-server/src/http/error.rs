//! API error types with IntoResponse
//!
//! Every error renders as `{"error": "<message>"}` with the matching status.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::repos::StoreError;
use crate::models::ValidationError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Validation failed (400)
    Validation(ValidationError),

    /// Resource or result set not found (404)
    NotFound { message: String },

    /// Key already taken or row still referenced (409)
    Conflict { message: String },

    /// Request ran past the configured timeout (408)
    Timeout,

    /// Backing store unreachable (503)
    Unavailable { message: String },

    /// Store failure (500, logged)
    Store(StoreError),
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Timeout => StatusCode::REQUEST_TIMEOUT,
            Self::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            Self::Validation(e) => e.to_string(),
            Self::NotFound { message }
            | Self::Conflict { message }
            | Self::Unavailable { message } => message,
            Self::Timeout => "request timed out".to_owned(),
            Self::Store(e) => {
                // Log the actual error, return generic message
                tracing::error!(error = %e, "store error");
                "an internal error occurred".to_owned()
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound { resource, id } => Self::NotFound {
                message: format!("{} '{}' not found", resource, id),
            },
            StoreError::Conflict(message) => Self::Conflict { message },
            StoreError::InvalidValue(reason) => Self::Validation(ValidationError::Body { reason }),
            StoreError::Sqlx(_) => Self::Store(e),
        }
    }
}
