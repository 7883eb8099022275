//! Error type for the charge-creation function.
//!
//! The caller (the crypto checkout client) only distinguishes two kinds:
//! `invalid-argument` for rejected input, `internal` for everything that
//! went wrong after validation. Both carry a human-readable message; the
//! upstream gateway's message is embedded rather than classified further.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Function-level error with a machine-readable kind.
#[derive(Debug, Error)]
pub enum FunctionError {
    /// The request payload failed validation. No upstream call was made.
    #[error("{0}")]
    InvalidArgument(String),

    /// The gateway call failed (non-success status or transport error).
    #[error("{0}")]
    Internal(String),
}

impl FunctionError {
    /// The wire string for this error's kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "invalid-argument",
            Self::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for FunctionError {
    fn into_response(self) -> Response {
        if matches!(self, Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "charge creation failed"
            );
        }

        let status = match &self {
            Self::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = json!({
            "error": {
                "kind": self.kind(),
                "message": self.to_string(),
            }
        });

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `FunctionError`.
pub type Result<T> = std::result::Result<T, FunctionError>;
