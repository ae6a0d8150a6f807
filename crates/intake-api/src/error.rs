//! Request-boundary error taxonomy.
//!
//! Every failure a request can hit ends here and is rendered into the exact
//! response envelope clients depend on. Nothing propagates past the handler.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Errors surfaced to HTTP callers.
#[derive(Debug, Error)]
pub enum IntakeError {
    /// The shared secret is not configured.
    #[error("webhook secret not configured")]
    Configuration,

    /// `X-Signature` is missing or does not match the shared secret.
    #[error("unauthorized")]
    Unauthorized,

    /// Method other than `GET` or `POST`.
    #[error("method not allowed")]
    MethodNotAllowed,

    /// `name`, `email` or `message` is absent or empty.
    #[error("missing required fields")]
    MissingFields,

    /// Body parsing or storage failed on the write path.
    #[error("failed to save contact")]
    SaveFailed {
        /// Underlying error text, present only when details are exposed.
        details: Option<String>,
    },
}

impl IntakeError {
    /// Builds a write-path failure, keeping the detail text only if the
    /// caller is allowed to see it.
    pub fn save_failed(error: impl std::fmt::Display, expose_details: bool) -> Self {
        Self::SaveFailed { details: expose_details.then(|| error.to_string()) }
    }

    /// HTTP status for this error.
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Configuration | Self::SaveFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::MissingFields => StatusCode::BAD_REQUEST,
        }
    }

    /// Client-facing `error` string.
    pub const fn public_message(&self) -> &'static str {
        match self {
            Self::Configuration => "Server configuration error",
            Self::Unauthorized => "Unauthorized",
            Self::MethodNotAllowed => "Method not allowed",
            Self::MissingFields => "Missing required fields",
            Self::SaveFailed { .. } => "Failed to save contact",
        }
    }
}

/// JSON error envelope.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Client-facing error string.
    pub error: &'static str,
    /// Raw error text for write failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for IntakeError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error = self.public_message();

        match self {
            // The only plain-text response the service sends.
            Self::MethodNotAllowed => (status, error).into_response(),
            Self::SaveFailed { details } => {
                (status, Json(ErrorResponse { error, details })).into_response()
            },
            Self::Configuration | Self::Unauthorized | Self::MissingFields => {
                (status, Json(ErrorResponse { error, details: None })).into_response()
            },
        }
    }
}
