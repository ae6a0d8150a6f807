//! Contact submission handler.
//!
//! Authenticates the caller with the shared secret, decodes and validates
//! the form payload, ensures the contacts table exists, and appends one row.

use axum::{
    extract::Request,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use intake_core::{ContactId, ContactStore, NewContact};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{error, info, instrument};

use crate::{auth::verify_shared_secret, error::IntakeError, AppState};

/// Largest request body accepted on the write path.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Inbound contact-form payload.
///
/// Every field is optional at decode time; presence of `name`, `email` and
/// `message` is enforced by [`ContactSubmission::validate`]. `null` and the
/// empty string count as absent.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct ContactSubmission {
    /// Sender name.
    pub name: Option<String>,
    /// Sender email.
    pub email: Option<String>,
    /// Message body.
    pub message: Option<String>,
    /// Client IP.
    pub ip: Option<String>,
    /// Client country.
    pub country: Option<String>,
}

/// Why a request body did not yield a [`ContactSubmission`].
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Not JSON, or an object whose fields have the wrong types.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// The body is the JSON literal `null`.
    #[error("invalid type: null, expected a JSON object")]
    Null,

    /// Valid JSON that is not an object, so no field can be present.
    #[error("expected a JSON object")]
    NotAnObject,
}

impl ContactSubmission {
    /// Decodes a request body.
    ///
    /// Only JSON objects are decoded field by field. Arrays are never read
    /// positionally.
    ///
    /// # Errors
    ///
    /// See [`DecodeError`].
    pub fn decode(body: &[u8]) -> Result<Self, DecodeError> {
        match serde_json::from_slice::<Value>(body)? {
            object @ Value::Object(_) => Ok(serde_json::from_value(object)?),
            Value::Null => Err(DecodeError::Null),
            _ => Err(DecodeError::NotAnObject),
        }
    }

    /// Checks required fields and applies defaults for `ip` and `country`.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::MissingFields`] if `name`, `email` or
    /// `message` is absent or empty.
    pub fn validate(self) -> Result<NewContact, IntakeError> {
        match (present(self.name), present(self.email), present(self.message)) {
            (Some(name), Some(email), Some(message)) => {
                Ok(NewContact::new(name, email, message, self.ip, self.country))
            },
            _ => Err(IntakeError::MissingFields),
        }
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Successful submission response.
#[derive(Debug, Serialize)]
pub struct ContactSaved {
    /// Always `true`.
    pub success: bool,
    /// Human-readable confirmation.
    pub message: &'static str,
    /// Id assigned to the new row.
    pub id: ContactId,
}

impl ContactSaved {
    /// Confirmation for a freshly stored contact.
    pub fn new(id: ContactId) -> Self {
        Self { success: true, message: "Contact saved successfully", id }
    }
}

impl IntoResponse for ContactSaved {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Handles a `POST` submission.
///
/// Steps run in a fixed order and the first failure wins: secret
/// configured, signature matches, body decodes, required fields present,
/// schema ensured and row inserted.
///
/// # Errors
///
/// - [`IntakeError::Configuration`] when no secret is configured
/// - [`IntakeError::Unauthorized`] when `X-Signature` does not match
/// - [`IntakeError::MissingFields`] when a required field is absent or the
///   body is JSON but not an object
/// - [`IntakeError::SaveFailed`] when the body cannot be read, is not JSON,
///   is `null`, has a non-string field, or storage fails
#[instrument(name = "submit_contact", skip_all)]
pub async fn submit_contact(state: &AppState, request: Request) -> Result<ContactSaved, IntakeError> {
    let settings = &state.settings;
    let (parts, body) = request.into_parts();

    verify_shared_secret(&parts.headers, settings.webhook_secret.as_deref()).inspect_err(|e| {
        if matches!(e, IntakeError::Configuration) {
            error!("WEBHOOK_SECRET not configured");
        }
    })?;

    let expose = settings.expose_error_details;

    let body = axum::body::to_bytes(body, MAX_BODY_BYTES).await.map_err(|e| {
        error!(error = %e, "Failed to read request body");
        IntakeError::save_failed(e, expose)
    })?;

    let submission = ContactSubmission::decode(&body).map_err(|e| match e {
        DecodeError::NotAnObject => IntakeError::MissingFields,
        e => {
            error!(error = %e, "Failed to decode contact payload");
            IntakeError::save_failed(e, expose)
        },
    })?;

    let contact = submission.validate()?;

    let id = persist(state.storage.as_ref(), &contact).await.map_err(|e| {
        error!(error = %e, "Database error");
        IntakeError::save_failed(e, expose)
    })?;

    info!(id = %id, email = %contact.email, "Contact saved");

    Ok(ContactSaved::new(id))
}

/// Creates the table if needed, then appends the row.
async fn persist(storage: &dyn ContactStore, contact: &NewContact) -> intake_core::Result<ContactId> {
    storage.ensure_schema().await?;
    storage.insert(contact).await
}
