//! Intake HTTP API.
//!
//! A single handler serves every path: `GET` reports health, `POST` accepts
//! a contact-form submission, anything else is rejected.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::sync::Arc;

use intake_core::{Clock, ContactStore, RealClock};

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod server;

pub use config::{Config, IntakeSettings};
pub use error::IntakeError;
pub use server::{create_router, start_server};

/// Shared state handed to every request.
///
/// Holds no mutable data of its own; cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Contact persistence.
    pub storage: Arc<dyn ContactStore>,
    /// Request-path settings, including the shared secret.
    pub settings: Arc<IntakeSettings>,
    /// Time source for health timestamps.
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Creates state backed by the real system clock.
    pub fn new(storage: Arc<dyn ContactStore>, settings: IntakeSettings) -> Self {
        Self { storage, settings: Arc::new(settings), clock: Arc::new(RealClock::new()) }
    }

    /// Replaces the clock, typically with a `TestClock`.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}
