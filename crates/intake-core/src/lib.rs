//! Core domain models and storage for contact intake.
//!
//! Provides the contact record types, the storage seam used by the HTTP
//! layer, and the clock abstraction. The API crate depends on these types
//! and never talks to the database directly.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod models;
pub mod storage;
pub mod time;

pub use error::{CoreError, Result};
pub use models::{ContactId, ContactRecord, NewContact, UNKNOWN};
pub use storage::{ContactStore, SqliteContactStore};
pub use time::{Clock, RealClock, TestClock};
