//! Contact records and strongly-typed identifiers.
//!
//! Records are append-only: once the database assigns an id, nothing in the
//! service updates or deletes the row.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Placeholder stored when the caller omits `ip` or `country`.
pub const UNKNOWN: &str = "unknown";

/// Strongly-typed contact identifier.
///
/// Generated by the database on insert and monotonically increasing.
///
/// # Example
///
/// ```
/// use intake_core::models::ContactId;
/// let id = ContactId::from(42);
/// assert_eq!(id.to_string(), "42");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactId(pub i64);

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ContactId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl sqlx::Type<sqlx::Sqlite> for ContactId {
    fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
        <i64 as sqlx::Type<sqlx::Sqlite>>::type_info()
    }
}

impl<'r> sqlx::Decode<'r, sqlx::Sqlite> for ContactId {
    fn decode(value: sqlx::sqlite::SqliteValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        Ok(Self(<i64 as sqlx::Decode<sqlx::Sqlite>>::decode(value)?))
    }
}

/// A validated contact ready to be written.
///
/// `ip` and `country` already hold [`UNKNOWN`] when the caller left them
/// out, so the storage layer writes every field as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewContact {
    /// Sender name.
    pub name: String,
    /// Sender email. Not format-checked.
    pub email: String,
    /// Message body.
    pub message: String,
    /// Client IP as reported by the form host.
    pub ip: String,
    /// Client country as reported by the form host.
    pub country: String,
}

impl NewContact {
    /// Creates a contact, substituting [`UNKNOWN`] for missing or empty
    /// `ip` and `country`.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        message: impl Into<String>,
        ip: Option<String>,
        country: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            message: message.into(),
            ip: or_unknown(ip),
            country: or_unknown(country),
        }
    }
}

fn or_unknown(value: Option<String>) -> String {
    value.filter(|v| !v.is_empty()).unwrap_or_else(|| UNKNOWN.to_string())
}

/// A persisted contact row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct ContactRecord {
    /// Database-assigned identifier.
    pub id: ContactId,
    /// Sender name.
    pub name: String,
    /// Sender email.
    pub email: String,
    /// Message body.
    pub message: String,
    /// Client IP, `"unknown"` when not supplied.
    pub ip: Option<String>,
    /// Client country, `"unknown"` when not supplied.
    pub country: Option<String>,
    /// Insert time in UTC, set by the database.
    pub created_at: Option<NaiveDateTime>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_ip_and_country_default_to_unknown() {
        let contact = NewContact::new("A", "a@x.com", "hi", None, None);

        assert_eq!(contact.ip, UNKNOWN);
        assert_eq!(contact.country, UNKNOWN);
    }

    #[test]
    fn empty_ip_and_country_default_to_unknown() {
        let contact =
            NewContact::new("A", "a@x.com", "hi", Some(String::new()), Some(String::new()));

        assert_eq!(contact.ip, UNKNOWN);
        assert_eq!(contact.country, UNKNOWN);
    }

    #[test]
    fn supplied_ip_and_country_are_kept_verbatim() {
        let contact = NewContact::new(
            "A",
            "a@x.com",
            "hi",
            Some(" 203.0.113.7 ".to_string()),
            Some("NZ".to_string()),
        );

        assert_eq!(contact.ip, " 203.0.113.7 ");
        assert_eq!(contact.country, "NZ");
    }
}
