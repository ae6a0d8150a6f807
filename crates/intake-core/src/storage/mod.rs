//! Storage seam for contact persistence.
//!
//! The HTTP layer only sees [`ContactStore`]. Production wires in
//! [`SqliteContactStore`]; tests can use [`mock::MockContactStore`] to inject
//! failures without a database.

use std::{future::Future, pin::Pin};

use crate::{
    error::Result,
    models::{ContactId, ContactRecord, NewContact},
};

pub mod mock;
pub mod sqlite;

pub use sqlite::{SqliteContactStore, CREATE_CONTACTS_TABLE};

/// Storage operations required by the intake handler.
///
/// Every method maps to one prepared statement. Implementations must be
/// safe to call concurrently from many requests.
pub trait ContactStore: Send + Sync + 'static {
    /// Counts stored contacts.
    ///
    /// Fails when the contacts table has not been created yet.
    fn count(&self) -> Pin<Box<dyn Future<Output = Result<i64>> + Send + '_>>;

    /// Creates the contacts table if it does not exist.
    ///
    /// Idempotent: repeated calls leave existing rows untouched.
    fn ensure_schema(&self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;

    /// Inserts a contact and returns the id the database assigned.
    fn insert<'a>(
        &'a self,
        contact: &'a NewContact,
    ) -> Pin<Box<dyn Future<Output = Result<ContactId>> + Send + 'a>>;

    /// Finds a contact by id.
    fn find_by_id(
        &self,
        id: ContactId,
    ) -> Pin<Box<dyn Future<Output = Result<Option<ContactRecord>>> + Send + '_>>;
}
