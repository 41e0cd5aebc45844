//! Testing utilities for the Taroudant platform client.
//!
//! Provides the Given-When-Then [`ReducerTest`] harness used by every
//! feature crate, effect assertions, and a fixed [`TestClock`] so that
//! date-sensitive rules (booking dates, session timestamps) are
//! deterministic under test.


pub use reducer_test::{ReducerTest, assertions};

use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;
use taroudant_core::environment::Clock;

/// A clock frozen at a fixed instant.
///
/// Defaults to 2025-06-01T12:00:00Z, comfortably in the future of nothing
/// and the past of nothing in particular; tests that care about "today"
/// derive dates from [`TestClock::now`] instead of the wall clock.
#[derive(Debug, Clone, Copy)]
pub struct TestClock {
    instant: DateTime<Utc>,
}

impl TestClock {
    /// Create a clock frozen at the given instant.
    #[must_use]
    pub const fn at(instant: DateTime<Utc>) -> Self {
        Self { instant }
    }
}

impl Default for TestClock {
    fn default() -> Self {
        // with_ymd_and_hms is infallible for this fixed date
        #[allow(clippy::unwrap_used)]
        Self::at(Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap())
    }
}

impl Clock for TestClock {
    fn now(&self) -> DateTime<Utc> {
        self.instant
    }
}

/// The default frozen clock, shaped for environments that take
/// `Arc<dyn Clock>`.
#[must_use]
pub fn test_clock() -> Arc<dyn Clock> {
    Arc::new(TestClock::default())
}
