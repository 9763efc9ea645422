//! Port interface for cache entry storage
//!
//! A store is a keyed mapping from secret name to the latest [`CacheEntry`].
//! It makes no expiry decisions; the cache client does that from the entry's
//! refresh timestamp.

use async_trait::async_trait;
use secretcache_domain::{CacheEntry, Result};

/// Trait for persisting and reading cache entries
#[async_trait]
pub trait StoreStrategy: Send + Sync {
    /// Prepare the store for use
    async fn init(&self) -> Result<()> {
        Ok(())
    }

    /// Save `entry`, replacing any previous entry for the same secret
    async fn store_secret(&self, entry: &CacheEntry) -> Result<()>;

    /// Read the entry for `secret_name`
    ///
    /// A missing entry is an error, never a default value.
    async fn get_cache_entry(&self, secret_name: &str) -> Result<CacheEntry>;

    /// Release resources
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
