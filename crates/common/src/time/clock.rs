//! Wall-clock abstraction
//!
//! Cache expiry is computed from epoch milliseconds, so every component that
//! reads "now" takes a [`Clock`]. Production code uses [`SystemClock`]; tests
//! drive a [`MockClock`] to place entries exactly at a TTL boundary.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Clock trait for time abstraction
pub trait Clock: Send + Sync + std::fmt::Debug + 'static {
    /// Get current system time (wall clock)
    fn system_time(&self) -> SystemTime;

    /// Get milliseconds since UNIX epoch
    fn now_millis(&self) -> i64 {
        self.system_time()
            .duration_since(UNIX_EPOCH)
            .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
            .unwrap_or_default()
    }
}

/// Real system clock implementation for production use
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn system_time(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Implement Clock for Arc<T> where T: Clock for convenient cloning
impl<T: Clock> Clock for Arc<T> {
    fn system_time(&self) -> SystemTime {
        (**self).system_time()
    }

    fn now_millis(&self) -> i64 {
        (**self).now_millis()
    }
}

/// Mock clock for deterministic testing
///
/// Starts at the UNIX epoch (or a chosen instant) and only moves when told to.
/// Clones share the same underlying time.
#[derive(Debug, Clone, Default)]
pub struct MockClock {
    millis: Arc<AtomicI64>,
}

impl MockClock {
    /// Create a mock clock reading 0 ms since the epoch
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock clock reading `millis` since the epoch
    pub fn at(millis: i64) -> Self {
        Self { millis: Arc::new(AtomicI64::new(millis)) }
    }

    /// Advance the mock clock by milliseconds
    pub fn advance_millis(&self, millis: i64) {
        self.millis.fetch_add(millis, Ordering::SeqCst);
    }

    /// Jump to an absolute time
    pub fn set_millis(&self, millis: i64) {
        self.millis.store(millis, Ordering::SeqCst);
    }
}

impl Clock for MockClock {
    fn system_time(&self) -> SystemTime {
        let millis = u64::try_from(self.now_millis()).unwrap_or_default();
        UNIX_EPOCH + std::time::Duration::from_millis(millis)
    }

    fn now_millis(&self) -> i64 {
        self.millis.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_is_after_2020() {
        assert!(SystemClock.now_millis() > 1_577_836_800_000);
    }

    #[test]
    fn test_mock_clock_shared_between_clones() {
        let clock = MockClock::at(30_000);
        let observer = clock.clone();

        clock.advance_millis(40_000);
        assert_eq!(observer.now_millis(), 70_000);

        observer.set_millis(5);
        assert_eq!(clock.now_millis(), 5);
        assert_eq!(clock.system_time(), UNIX_EPOCH + std::time::Duration::from_millis(5));
    }

    #[test]
    fn test_arc_clock_delegates() {
        let clock = Arc::new(MockClock::at(42));
        assert_eq!(clock.now_millis(), 42);
    }
}
