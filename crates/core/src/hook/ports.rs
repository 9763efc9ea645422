//! Port interface for cache hooks
//!
//! A hook sits between the raw secret returned by the backend and the entry
//! kept in the store. It may transform values on the way in and out, and it
//! supplies a disaster-recovery value when every remote option has failed.

use async_trait::async_trait;
use secretcache_domain::{CacheEntry, Result, SecretInfo};

/// Extension point around cached secrets
#[async_trait]
pub trait CacheHook: Send + Sync {
    async fn init(&self) -> Result<()> {
        Ok(())
    }

    /// Turn a freshly fetched secret into the entry to store
    async fn put(&self, secret: SecretInfo) -> Result<CacheEntry>;

    /// Turn a stored entry back into the secret handed to callers
    async fn get(&self, entry: &CacheEntry) -> Result<SecretInfo>;

    /// Fallback value when the backend failed with a recoverable error.
    ///
    /// `Ok(None)` surfaces the original fetch error; `Err` replaces it.
    async fn recovery_get_secret(&self, secret_name: &str) -> Result<Option<SecretInfo>>;

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
