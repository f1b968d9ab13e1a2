//! Cooperative query deadline.
//!
//! A [`Deadline`] is captured once at dispatch time and threaded into every
//! matcher invocation. Unbounded scans call [`Deadline::check`] at a fixed
//! candidate-count interval, so a pathological query cannot overrun the
//! budget by more than one interval. Expiry is a distinct signal
//! ([`QueryError::Timeout`]), never conflated with an empty result.

use crate::errors::QueryError;
use std::time::{Duration, Instant};

/// How often (in scanned words) the anagram and equation scans re-check the clock.
pub(crate) const SCAN_CHECK_INTERVAL: usize = 1_000;
/// How often the simple-pattern scan re-checks the clock.
pub(crate) const SIMPLE_SCAN_CHECK_INTERVAL: usize = 2_000;

/// Wall-clock budget for a single query.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    start: Instant,
    limit: Duration,
}

impl Deadline {
    /// Start a new budget lasting `limit` from now.
    pub fn new(limit: Duration) -> Self {
        Self { start: Instant::now(), limit }
    }

    /// How long this budget has been running.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// True once the allowed time has fully elapsed.
    pub fn expired(&self) -> bool {
        self.start.elapsed() >= self.limit
    }

    /// Checkpoint: `Err(QueryError::Timeout)` once the budget is spent.
    ///
    /// # Errors
    /// Returns [`QueryError::Timeout`] carrying the elapsed time.
    pub fn check(&self) -> Result<(), QueryError> {
        if self.expired() {
            Err(QueryError::Timeout { elapsed: self.elapsed() })
        } else {
            Ok(())
        }
    }
}
