//! Builder for [`CacheClient`]

use std::collections::HashMap;
use std::sync::Arc;

use secretcache_common::{Clock, KeyedLocks, SystemClock};
use secretcache_domain::constants::{DEFAULT_JSON_TTL_PROPERTY, STAGE_ACS_CURRENT};
use secretcache_domain::{Result, SecretCacheError};

use super::client::{CacheClient, CacheInner};
use super::timers::RefreshTimers;
use crate::fetch::ports::SecretBackend;
use crate::hook::{CacheHook, DefaultCacheHook};
use crate::refresh::{DefaultRefreshStrategy, RefreshStrategy};
use crate::store::{MemoryStore, StoreStrategy};

/// Assembles a [`CacheClient`], filling unset collaborators with defaults:
/// in-memory store, [`DefaultRefreshStrategy`], [`DefaultCacheHook`] and the
/// system clock. A backend is required.
pub struct CacheClientBuilder {
    stage: String,
    json_ttl_property: String,
    secret_ttls: HashMap<String, i64>,
    backend: Option<Arc<dyn SecretBackend>>,
    store: Option<Arc<dyn StoreStrategy>>,
    refresh: Option<Arc<dyn RefreshStrategy>>,
    hook: Option<Arc<dyn CacheHook>>,
    clock: Arc<dyn Clock>,
}

impl Default for CacheClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheClientBuilder {
    pub fn new() -> Self {
        Self {
            stage: STAGE_ACS_CURRENT.to_string(),
            json_ttl_property: DEFAULT_JSON_TTL_PROPERTY.to_string(),
            secret_ttls: HashMap::new(),
            backend: None,
            store: None,
            refresh: None,
            hook: None,
            clock: Arc::new(SystemClock),
        }
    }

    /// Register a TTL for `secret_name`; registered secrets are fetched
    /// during `build`.
    pub fn with_secret_ttl(mut self, secret_name: impl Into<String>, ttl_ms: i64) -> Self {
        self.secret_ttls.insert(secret_name.into(), ttl_ms);
        self
    }

    pub fn with_json_ttl_property(mut self, property: impl Into<String>) -> Self {
        self.json_ttl_property = property.into();
        self
    }

    pub fn with_stage(mut self, stage: impl Into<String>) -> Self {
        self.stage = stage.into();
        self
    }

    pub fn with_store(mut self, store: Arc<dyn StoreStrategy>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_refresh_strategy(mut self, refresh: Arc<dyn RefreshStrategy>) -> Self {
        self.refresh = Some(refresh);
        self
    }

    pub fn with_hook(mut self, hook: Arc<dyn CacheHook>) -> Self {
        self.hook = Some(hook);
        self
    }

    pub fn with_backend(mut self, backend: Arc<dyn SecretBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Wire defaults, initialize every collaborator and preload registered
    /// secrets.
    ///
    /// # Errors
    /// Configuration errors for a missing backend, empty stage or
    /// non-positive TTL; otherwise whatever initialization reported.
    pub async fn build(self) -> Result<CacheClient> {
        let backend = self
            .backend
            .ok_or_else(|| SecretCacheError::Config("a secret backend is required".into()))?;
        if self.stage.is_empty() {
            return Err(SecretCacheError::InvalidArgument("stage must not be empty".into()));
        }
        if let Some((name, ttl)) = self.secret_ttls.iter().find(|(_, ttl)| **ttl <= 0) {
            return Err(SecretCacheError::InvalidArgument(format!(
                "ttl for [{name}] must be positive, got {ttl}"
            )));
        }

        let clock = self.clock;
        let store = self.store.unwrap_or_else(|| Arc::new(MemoryStore::new()));
        let refresh = self.refresh.unwrap_or_else(|| {
            Arc::new(DefaultRefreshStrategy::new(self.json_ttl_property, Arc::clone(&clock)))
        });
        let hook = self
            .hook
            .unwrap_or_else(|| Arc::new(DefaultCacheHook::new(self.stage.clone(), Arc::clone(&clock))));

        let client = CacheClient::from_inner(CacheInner {
            stage: self.stage,
            secret_ttls: self.secret_ttls,
            backend,
            store,
            refresh,
            hook,
            clock,
            locks: KeyedLocks::new(),
            timers: RefreshTimers::new(),
        });
        client.init().await?;
        Ok(client)
    }
}
