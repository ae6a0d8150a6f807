//! Error types and result handling for storage operations.

use thiserror::Error;

/// Result type alias using `CoreError`.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error type for storage operations.
///
/// The display text of each variant is what callers see in the `details`
/// field of a failed write, so it carries the underlying driver message
/// verbatim.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Database operation failed.
    #[error("{0}")]
    Database(String),

    /// Entity not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Constraint violation.
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}

impl From<sqlx::Error> for CoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::NotFound("requested contact not found".to_string()),
            sqlx::Error::Database(db_err)
                if db_err.is_unique_violation() || db_err.is_check_violation() =>
            {
                Self::ConstraintViolation(db_err.message().to_string())
            },
            sqlx::Error::Database(db_err) => Self::Database(db_err.message().to_string()),
            _ => Self::Database(err.to_string()),
        }
    }
}
