//! Backoff strategies for retry loops
//!
//! A strategy maps an attempt number to the time a retry loop should wait
//! before that attempt, or to `None` once the attempt budget is spent. The
//! loop owns the attempt counter; strategies are stateless and shareable.

use std::fmt::Debug;
use std::time::Duration;

/// Computes the wait before a retry attempt.
pub trait BackoffStrategy: Send + Sync + Debug {
    /// Wait time for `attempt` (zero-based), or `None` when exhausted.
    fn wait_time(&self, attempt: u32) -> Option<Duration>;

    /// Millisecond view of [`wait_time`](Self::wait_time) with `-1` meaning
    /// exhausted, for callers that log or serialize the schedule.
    fn wait_time_millis(&self, attempt: u32) -> i64 {
        self.wait_time(attempt)
            .map_or(-1, |d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
    }
}

/// Exponential backoff without jitter: `min(capacity, initial * 2^attempt)`.
///
/// Attempts `0..=max_attempts` are allowed; anything beyond is exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExponentialBackoff {
    max_attempts: u32,
    initial_interval: Duration,
    capacity: Duration,
}

impl ExponentialBackoff {
    /// Default number of attempts before exhaustion.
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
    /// Default wait before the first attempt.
    pub const DEFAULT_INITIAL_INTERVAL: Duration = Duration::from_millis(2000);
    /// Default upper bound on a single wait.
    pub const DEFAULT_CAPACITY: Duration = Duration::from_millis(10_000);

    /// Build a strategy. Zero values fall back to the defaults.
    pub fn new(max_attempts: u32, initial_interval: Duration, capacity: Duration) -> Self {
        Self {
            max_attempts: if max_attempts == 0 { Self::DEFAULT_MAX_ATTEMPTS } else { max_attempts },
            initial_interval: if initial_interval.is_zero() {
                Self::DEFAULT_INITIAL_INTERVAL
            } else {
                initial_interval
            },
            capacity: if capacity.is_zero() { Self::DEFAULT_CAPACITY } else { capacity },
        }
    }

    /// Convenience constructor taking milliseconds, matching config files.
    pub fn from_millis(max_attempts: u32, initial_interval_ms: u64, capacity_ms: u64) -> Self {
        Self::new(
            max_attempts,
            Duration::from_millis(initial_interval_ms),
            Duration::from_millis(capacity_ms),
        )
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn initial_interval(&self) -> Duration {
        self.initial_interval
    }

    pub fn capacity(&self) -> Duration {
        self.capacity
    }
}

impl Default for ExponentialBackoff {
    fn default() -> Self {
        Self::new(0, Duration::ZERO, Duration::ZERO)
    }
}

impl BackoffStrategy for ExponentialBackoff {
    fn wait_time(&self, attempt: u32) -> Option<Duration> {
        if attempt > self.max_attempts {
            return None;
        }
        // 2^attempt overflows long before it matters; cap instead.
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        let delay = self.initial_interval.saturating_mul(factor);
        Some(delay.min(self.capacity))
    }
}
