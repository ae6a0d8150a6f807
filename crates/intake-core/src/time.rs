//! Clock seam for health timestamps and latency measurement.
//!
//! Handlers never read the system clock directly. Production wires in
//! [`RealClock`]; tests pin the wall clock with [`TestClock`] so the health
//! `timestamp` field is reproducible.

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

use chrono::{DateTime, Utc};

/// Source of wall-clock and monotonic time.
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// Monotonic instant, for measuring how long an operation took.
    fn now(&self) -> Instant;

    /// Current wall-clock time in UTC.
    fn utc_now(&self) -> DateTime<Utc>;
}

/// System clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealClock;

impl RealClock {
    /// Creates a system clock.
    pub fn new() -> Self {
        Self
    }
}

impl Clock for RealClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn utc_now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock.
///
/// Time only moves through [`TestClock::advance`]. Clones share one offset,
/// so a test can keep a handle while the application state holds another.
#[derive(Debug, Clone)]
pub struct TestClock {
    origin: DateTime<Utc>,
    origin_instant: Instant,
    offset_micros: Arc<AtomicU64>,
}

impl TestClock {
    /// Creates a clock frozen at the current wall-clock time.
    pub fn new() -> Self {
        Self::at(Utc::now())
    }

    /// Creates a clock frozen at `origin`.
    pub fn at(origin: DateTime<Utc>) -> Self {
        Self { origin, origin_instant: Instant::now(), offset_micros: Arc::new(AtomicU64::new(0)) }
    }

    /// Moves time forward for every clone of this clock.
    pub fn advance(&self, by: Duration) {
        let micros = u64::try_from(by.as_micros()).unwrap_or(u64::MAX);
        self.offset_micros.fetch_add(micros, Ordering::AcqRel);
    }

    fn offset(&self) -> Duration {
        Duration::from_micros(self.offset_micros.load(Ordering::Acquire))
    }
}

impl Default for TestClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TestClock {
    fn now(&self) -> Instant {
        self.origin_instant + self.offset()
    }

    fn utc_now(&self) -> DateTime<Utc> {
        chrono::Duration::from_std(self.offset())
            .ok()
            .and_then(|offset| self.origin.checked_add_signed(offset))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}
