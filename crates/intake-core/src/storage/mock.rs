//! In-memory contact store for tests.
//!
//! Mirrors SQLite's observable behavior: reads and writes fail until the
//! schema exists, and ids start at 1 and only grow.

use std::{future::Future, pin::Pin, sync::Arc, time::Duration};

use chrono::Utc;
use tokio::sync::RwLock;

use super::ContactStore;
use crate::{
    error::{CoreError, Result},
    models::{ContactId, ContactRecord, NewContact},
};

const NO_SUCH_TABLE: &str = "no such table: contacts";

#[derive(Debug, Default)]
struct State {
    schema_ready: bool,
    schema_creations: usize,
    next_id: i64,
    records: Vec<ContactRecord>,
    schema_error: Option<String>,
    insert_error: Option<String>,
    insert_delay: Option<Duration>,
}

/// Mock contact store with error injection.
#[derive(Debug, Clone, Default)]
pub struct MockContactStore {
    state: Arc<RwLock<State>>,
}

impl MockContactStore {
    /// Creates an empty store without a contacts table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store whose contacts table already exists.
    pub async fn with_schema() -> Self {
        let store = Self::new();
        store.state.write().await.schema_ready = true;
        store
    }

    /// Makes every schema creation fail with `message`.
    pub async fn inject_schema_error(&self, message: impl Into<String>) {
        self.state.write().await.schema_error = Some(message.into());
    }

    /// Makes the next insert fail with `message`.
    pub async fn inject_insert_error(&self, message: impl Into<String>) {
        self.state.write().await.insert_error = Some(message.into());
    }

    /// Makes every insert wait `delay` before touching state.
    pub async fn inject_insert_delay(&self, delay: Duration) {
        self.state.write().await.insert_delay = Some(delay);
    }

    /// Returns all stored records in insertion order.
    pub async fn records(&self) -> Vec<ContactRecord> {
        self.state.read().await.records.clone()
    }

    /// Number of times the schema was (re)issued.
    pub async fn schema_creations(&self) -> usize {
        self.state.read().await.schema_creations
    }
}

impl ContactStore for MockContactStore {
    fn count(&self) -> Pin<Box<dyn Future<Output = Result<i64>> + Send + '_>> {
        Box::pin(async move {
            let state = self.state.read().await;
            if !state.schema_ready {
                return Err(CoreError::Database(NO_SUCH_TABLE.to_string()));
            }
            Ok(i64::try_from(state.records.len()).unwrap_or(i64::MAX))
        })
    }

    fn ensure_schema(&self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            let mut state = self.state.write().await;
            if let Some(error) = state.schema_error.clone() {
                return Err(CoreError::Database(error));
            }
            state.schema_ready = true;
            state.schema_creations += 1;
            Ok(())
        })
    }

    fn insert<'a>(
        &'a self,
        contact: &'a NewContact,
    ) -> Pin<Box<dyn Future<Output = Result<ContactId>> + Send + 'a>> {
        Box::pin(async move {
            let delay = self.state.read().await.insert_delay;
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }

            let mut state = self.state.write().await;
            if let Some(error) = state.insert_error.take() {
                return Err(CoreError::Database(error));
            }
            if !state.schema_ready {
                return Err(CoreError::Database(NO_SUCH_TABLE.to_string()));
            }

            state.next_id += 1;
            let id = ContactId(state.next_id);
            state.records.push(ContactRecord {
                id,
                name: contact.name.clone(),
                email: contact.email.clone(),
                message: contact.message.clone(),
                ip: Some(contact.ip.clone()),
                country: Some(contact.country.clone()),
                created_at: Some(Utc::now().naive_utc()),
            });

            Ok(id)
        })
    }

    fn find_by_id(
        &self,
        id: ContactId,
    ) -> Pin<Box<dyn Future<Output = Result<Option<ContactRecord>>> + Send + '_>> {
        Box::pin(async move {
            let state = self.state.read().await;
            if !state.schema_ready {
                return Err(CoreError::Database(NO_SUCH_TABLE.to_string()));
            }
            Ok(state.records.iter().find(|r| r.id == id).cloned())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn count_fails_before_schema_exists() {
        let store = MockContactStore::new();

        let err = store.count().await.unwrap_err();
        assert_eq!(err.to_string(), NO_SUCH_TABLE);
    }

    #[tokio::test]
    async fn injected_insert_error_fires_once() {
        let store = MockContactStore::with_schema().await;
        store.inject_insert_error("disk I/O error").await;
        let contact = NewContact::new("A", "a@x.com", "hi", None, None);

        assert!(store.insert(&contact).await.is_err());
        assert_eq!(store.insert(&contact).await.unwrap(), ContactId(1));
    }
}
