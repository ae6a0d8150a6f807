//! SQLite-backed contact repository.

use std::{future::Future, pin::Pin};

use sqlx::SqlitePool;
use tracing::debug;

use super::ContactStore;
use crate::{
    error::Result,
    models::{ContactId, ContactRecord, NewContact},
};

/// Idempotent DDL for the contacts table.
pub const CREATE_CONTACTS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS contacts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        email TEXT NOT NULL,
        message TEXT NOT NULL,
        ip TEXT,
        country TEXT,
        created_at DATETIME DEFAULT CURRENT_TIMESTAMP
    )
";

/// Contact repository over a SQLite connection pool.
#[derive(Debug, Clone)]
pub struct SqliteContactStore {
    pool: SqlitePool,
}

impl SqliteContactStore {
    /// Creates a new repository instance.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the database pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl ContactStore for SqliteContactStore {
    fn count(&self) -> Pin<Box<dyn Future<Output = Result<i64>> + Send + '_>> {
        Box::pin(async move {
            let count: i64 = sqlx::query_scalar("SELECT COUNT(*) AS count FROM contacts")
                .fetch_one(&self.pool)
                .await?;

            Ok(count)
        })
    }

    fn ensure_schema(&self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            sqlx::query(CREATE_CONTACTS_TABLE).execute(&self.pool).await?;
            debug!("Contacts table ensured");
            Ok(())
        })
    }

    fn insert<'a>(
        &'a self,
        contact: &'a NewContact,
    ) -> Pin<Box<dyn Future<Output = Result<ContactId>> + Send + 'a>> {
        Box::pin(async move {
            let result = sqlx::query(
                r"
                INSERT INTO contacts (name, email, message, ip, country)
                VALUES (?, ?, ?, ?, ?)
                ",
            )
            .bind(&contact.name)
            .bind(&contact.email)
            .bind(&contact.message)
            .bind(&contact.ip)
            .bind(&contact.country)
            .execute(&self.pool)
            .await?;

            let id = ContactId(result.last_insert_rowid());
            debug!(id = %id, "Contact row inserted");
            Ok(id)
        })
    }

    fn find_by_id(
        &self,
        id: ContactId,
    ) -> Pin<Box<dyn Future<Output = Result<Option<ContactRecord>>> + Send + '_>> {
        Box::pin(async move {
            let record = sqlx::query_as::<_, ContactRecord>(
                r"
                SELECT id, name, email, message, ip, country, created_at
                FROM contacts
                WHERE id = ?
                ",
            )
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;

            Ok(record)
        })
    }
}
