//! Contact payload builder.
//!
//! Produces JSON bodies for submissions, including deliberately incomplete
//! ones for validation tests.

use serde_json::{Map, Value};
use uuid::Uuid;

/// Builder for contact-form JSON bodies.
#[derive(Debug, Clone, Default)]
pub struct ContactPayload {
    fields: Map<String, Value>,
}

impl ContactPayload {
    /// Empty payload with no fields.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Payload with `name`, `email` and `message` filled in.
    pub fn with_defaults() -> Self {
        let suffix = Uuid::new_v4().simple().to_string();
        Self::empty()
            .name("Ada Lovelace")
            .email(format!("ada+{}@example.com", &suffix[..8]))
            .message("I'd like to hear more about your services.")
    }

    /// The minimal valid payload `{name:"A", email:"a@x.com", message:"hi"}`.
    pub fn minimal() -> Self {
        Self::empty().name("A").email("a@x.com").message("hi")
    }

    /// Sets `name`.
    #[must_use]
    pub fn name(self, value: impl Into<String>) -> Self {
        self.field("name", Value::String(value.into()))
    }

    /// Sets `email`.
    #[must_use]
    pub fn email(self, value: impl Into<String>) -> Self {
        self.field("email", Value::String(value.into()))
    }

    /// Sets `message`.
    #[must_use]
    pub fn message(self, value: impl Into<String>) -> Self {
        self.field("message", Value::String(value.into()))
    }

    /// Sets `ip`.
    #[must_use]
    pub fn ip(self, value: impl Into<String>) -> Self {
        self.field("ip", Value::String(value.into()))
    }

    /// Sets `country`.
    #[must_use]
    pub fn country(self, value: impl Into<String>) -> Self {
        self.field("country", Value::String(value.into()))
    }

    /// Sets any field to any JSON value.
    #[must_use]
    pub fn field(mut self, key: &str, value: Value) -> Self {
        self.fields.insert(key.to_string(), value);
        self
    }

    /// Removes a field.
    #[must_use]
    pub fn without(mut self, key: &str) -> Self {
        self.fields.remove(key);
        self
    }

    /// Builds the JSON object.
    pub fn build(self) -> Value {
        Value::Object(self.fields)
    }
}
