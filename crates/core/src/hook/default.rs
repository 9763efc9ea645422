//! Pass-through hook that stamps stage and fetch time.

use std::sync::Arc;

use async_trait::async_trait;
use secretcache_common::Clock;
use secretcache_domain::{CacheEntry, Result, SecretInfo};

use super::ports::CacheHook;

pub struct DefaultCacheHook {
    stage: String,
    clock: Arc<dyn Clock>,
}

impl DefaultCacheHook {
    pub fn new(stage: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        Self { stage: stage.into(), clock }
    }
}

#[async_trait]
impl CacheHook for DefaultCacheHook {
    async fn put(&self, secret: SecretInfo) -> Result<CacheEntry> {
        Ok(CacheEntry::new(secret, self.stage.clone(), self.clock.now_millis()))
    }

    async fn get(&self, entry: &CacheEntry) -> Result<SecretInfo> {
        Ok(entry.secret_info.clone())
    }

    async fn recovery_get_secret(&self, _secret_name: &str) -> Result<Option<SecretInfo>> {
        Ok(None)
    }
}
