//! In-memory store backed by a concurrent map.

use async_trait::async_trait;
use dashmap::DashMap;
use secretcache_domain::{CacheEntry, Result, SecretCacheError};

use super::ports::StoreStrategy;

/// Process-local store; contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, CacheEntry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl StoreStrategy for MemoryStore {
    async fn store_secret(&self, entry: &CacheEntry) -> Result<()> {
        self.entries.insert(entry.secret_name().to_string(), entry.clone());
        Ok(())
    }

    async fn get_cache_entry(&self, secret_name: &str) -> Result<CacheEntry> {
        self.entries
            .get(secret_name)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| SecretCacheError::NotFound(format!("no cached entry for [{secret_name}]")))
    }
}
