//! Port interface for refresh timing
//!
//! All timestamps are epoch milliseconds.

use secretcache_domain::{CacheEntry, Result, SecretInfo};

/// Decides how long a secret stays fresh and when to refresh it next
pub trait RefreshStrategy: Send + Sync {
    fn init(&self) -> Result<()> {
        Ok(())
    }

    /// Next execution time given a `ttl_ms` and the last refresh `offset_ms`.
    /// Never in the past.
    fn next_execute_time(&self, secret_name: &str, ttl_ms: i64, offset_ms: i64) -> i64;

    /// Next execution time derived from a TTL embedded in the entry's payload,
    /// or `None` when the payload carries none.
    fn parse_next_execute_time(&self, entry: &CacheEntry) -> Option<i64>;

    /// Positive TTL embedded in the secret payload, if any.
    fn parse_ttl(&self, secret: &SecretInfo) -> Option<i64>;

    fn close(&self) -> Result<()> {
        Ok(())
    }
}
