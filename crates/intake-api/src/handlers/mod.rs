//! HTTP request handlers for the intake API.
//!
//! [`handle_request`] is mounted as the router fallback and dispatches on
//! method alone; the request path is ignored.
//!
//! - `GET` - health check, always `200`
//! - `POST` - contact submission
//! - anything else - `405 Method not allowed`

use axum::{
    extract::{Request, State},
    http::Method,
    response::{IntoResponse, Response},
};
use tracing::instrument;

use crate::{error::IntakeError, AppState};

pub mod health;
pub mod intake;

pub use health::health_check;
pub use intake::{submit_contact, ContactSaved, ContactSubmission, DecodeError};

/// Single entry point for every inbound request.
#[instrument(name = "handle_request", skip_all, fields(method = %request.method(), path = %request.uri().path()))]
pub async fn handle_request(State(state): State<AppState>, request: Request) -> Response {
    let method = request.method().clone();

    match method {
        Method::GET => health_check(&state).await.into_response(),
        Method::POST => match submit_contact(&state, request).await {
            Ok(saved) => saved.into_response(),
            Err(e) => e.into_response(),
        },
        _ => IntakeError::MethodNotAllowed.into_response(),
    }
}
