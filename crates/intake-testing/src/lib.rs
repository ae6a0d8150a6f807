//! Test infrastructure for the intake service.
//!
//! Provides an isolated in-memory database per test, a controllable clock,
//! request builders, and helpers for reading responses.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{body::Body, http::Request, Router};
use intake_api::{create_router, AppState, IntakeSettings};
use intake_core::{ContactId, ContactRecord, ContactStore, NewContact, SqliteContactStore};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use tower::ServiceExt;

pub mod fixtures;
pub mod http;

pub use fixtures::ContactPayload;
pub use http::TestResponse;
pub use intake_core::{storage::mock::MockContactStore, Clock, TestClock};

/// Shared secret configured by [`TestEnv::new`].
pub const TEST_SECRET: &str = "test-webhook-secret";

/// Test environment backed by a private in-memory SQLite database.
///
/// The pool holds exactly one connection that never expires, so the
/// database lives as long as the environment.
pub struct TestEnv {
    /// Deterministic clock shared with the application state.
    pub clock: TestClock,
    store: SqliteContactStore,
    settings: IntakeSettings,
}

impl TestEnv {
    /// Creates an environment with [`TEST_SECRET`] configured and no
    /// contacts table.
    pub async fn new() -> Result<Self> {
        let env = Self::without_secret().await?;
        Ok(env.with_settings(|s| s.with_secret(TEST_SECRET)))
    }

    /// Creates an environment with no shared secret configured.
    pub async fn without_secret() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .context("Failed to open in-memory SQLite database")?;

        Ok(Self {
            clock: TestClock::new(),
            store: SqliteContactStore::new(pool),
            settings: IntakeSettings::default(),
        })
    }

    /// Adjusts the request-path settings.
    #[must_use]
    pub fn with_settings(mut self, adjust: impl FnOnce(IntakeSettings) -> IntakeSettings) -> Self {
        self.settings = adjust(self.settings);
        self
    }

    /// Returns the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        self.store.pool()
    }

    /// Returns the contact repository.
    pub fn store(&self) -> &SqliteContactStore {
        &self.store
    }

    /// Builds application state over this environment's database and clock.
    pub fn app_state(&self) -> AppState {
        AppState::new(Arc::new(self.store.clone()), self.settings.clone())
            .with_clock(Arc::new(self.clock.clone()))
    }

    /// Builds the production router over this environment.
    pub fn router(&self) -> Router {
        create_router(self.app_state())
    }

    /// Sends one request through a fresh router.
    pub async fn send(&self, request: Request<Body>) -> Result<TestResponse> {
        send(self.router(), request).await
    }

    /// Creates the contacts table.
    pub async fn init_schema(&self) -> Result<()> {
        self.store.ensure_schema().await.context("Failed to create contacts table")
    }

    /// Creates the table and inserts `count` generated contacts.
    pub async fn seed_contacts(&self, count: usize) -> Result<Vec<ContactId>> {
        self.init_schema().await?;

        let mut ids = Vec::with_capacity(count);
        for i in 0..count {
            let contact =
                NewContact::new(format!("seed-{i}"), format!("seed-{i}@example.com"), "seeded", None, None);
            ids.push(self.store.insert(&contact).await.context("Failed to seed contact")?);
        }
        Ok(ids)
    }

    /// Counts contact rows, treating a missing table as empty.
    pub async fn contact_count(&self) -> Result<i64> {
        if !self.table_exists("contacts").await? {
            return Ok(0);
        }
        Ok(self.store.count().await?)
    }

    /// Fetches a stored contact by id.
    pub async fn find_contact(&self, id: ContactId) -> Result<Option<ContactRecord>> {
        Ok(self.store.find_by_id(id).await?)
    }

    /// Whether a table with the given name exists.
    pub async fn table_exists(&self, name: &str) -> Result<bool> {
        let found: Option<String> =
            sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?")
                .bind(name)
                .fetch_optional(self.pool())
                .await
                .context("Failed to query sqlite_master")?;

        Ok(found.is_some())
    }
}

/// Sends one request through `router`, for tests that assemble their own
/// state (for example over [`MockContactStore`]).
pub async fn send(router: Router, request: Request<Body>) -> Result<TestResponse> {
    let response = router.oneshot(request).await.context("Router failed to respond")?;
    TestResponse::from_response(response).await
}

/// Builds a router over an arbitrary store with the given settings.
pub fn router_with_store(store: Arc<dyn ContactStore>, settings: IntakeSettings) -> Router {
    create_router(AppState::new(store, settings))
}
