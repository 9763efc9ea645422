//! Cache client
//!
//! Reads go to the store first. On a miss or an expired entry the caller
//! takes the per-key lock, re-reads the store (another caller may have
//! refreshed it meanwhile), and only then fetches from the backend. At most
//! one fetch per key is in flight; different keys never wait on each other.
//!
//! Every successful fetch re-arms a background refresh timer for the key.
//! Timer tasks hold a weak reference to the client, so dropping or closing
//! the client ends the refresh chain.

use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;

use futures::future::BoxFuture;
use secretcache_common::{Clock, KeyedLocks};
use secretcache_domain::constants::DEFAULT_TTL_MS;
use secretcache_domain::{
    CacheEntry, GetSecretValueRequest, Result, SecretCacheError, SecretDataType, SecretInfo,
};
use tracing::{debug, error, info, instrument, warn};

use super::builder::CacheClientBuilder;
use super::timers::RefreshTimers;
use crate::fetch::ports::SecretBackend;
use crate::hook::ports::CacheHook;
use crate::refresh::ports::RefreshStrategy;
use crate::store::ports::StoreStrategy;

pub(super) struct CacheInner {
    pub(super) stage: String,
    pub(super) secret_ttls: HashMap<String, i64>,
    pub(super) backend: Arc<dyn SecretBackend>,
    pub(super) store: Arc<dyn StoreStrategy>,
    pub(super) refresh: Arc<dyn RefreshStrategy>,
    pub(super) hook: Arc<dyn CacheHook>,
    pub(super) clock: Arc<dyn Clock>,
    pub(super) locks: KeyedLocks,
    pub(super) timers: RefreshTimers,
}

impl CacheInner {
    fn registered_ttl(&self, secret_name: &str) -> i64 {
        self.secret_ttls.get(secret_name).copied().unwrap_or(DEFAULT_TTL_MS)
    }

    /// Payload TTL when present and positive, else the registered TTL, else
    /// the default.
    fn ttl_for(&self, secret_name: &str, secret: &SecretInfo) -> i64 {
        self.refresh.parse_ttl(secret).unwrap_or_else(|| self.registered_ttl(secret_name))
    }

    /// The stored entry if present and unexpired. A missing entry is a miss;
    /// any other store failure (corrupt file, I/O) is reported.
    async fn fresh_entry(&self, secret_name: &str) -> Result<Option<CacheEntry>> {
        let entry = match self.store.get_cache_entry(secret_name).await {
            Ok(entry) => entry,
            Err(SecretCacheError::NotFound(reason)) => {
                debug!(secret_name, reason = %reason, "Cache miss");
                return Ok(None);
            }
            Err(err) => return Err(err),
        };
        let ttl = self.ttl_for(secret_name, &entry.secret_info);
        if entry.is_expired(self.clock.now_millis(), ttl) {
            debug!(secret_name, ttl_ms = ttl, "Cached entry expired");
            return Ok(None);
        }
        Ok(Some(entry))
    }

    /// Fetch from the backend, falling back to the hook's recovery value
    /// when every remote option failed transiently.
    async fn fetch(&self, secret_name: &str) -> Result<SecretInfo> {
        let request = GetSecretValueRequest::new(secret_name, &self.stage);
        match self.backend.get_secret_value(&request).await {
            Ok(secret) => Ok(secret),
            Err(err) => {
                error!(secret_name, error = %err, "Failed to fetch secret value");
                if !err.needs_recovery() {
                    return Err(err);
                }
                match self.hook.recovery_get_secret(secret_name).await {
                    Ok(Some(secret)) => {
                        warn!(secret_name, "Serving secret from recovery hook");
                        Ok(secret)
                    }
                    Ok(None) => Err(err),
                    Err(recovery_err) => {
                        error!(secret_name, error = %recovery_err, "Recovery hook failed");
                        Err(recovery_err)
                    }
                }
            }
        }
    }

    /// Fetch, transform and store. Caller holds the key's lock.
    async fn refresh_locked(&self, secret_name: &str) -> Result<CacheEntry> {
        let mut secret = self.fetch(secret_name).await?;
        // Entries are keyed by the requested name, whatever the service echoes back.
        if secret.secret_name != secret_name {
            debug!(secret_name, returned_name = %secret.secret_name, "Service returned a different secret name");
            secret.secret_name = secret_name.to_string();
        }
        let entry = self.hook.put(secret).await?;
        self.store.store_secret(&entry).await?;
        info!(secret_name, refresh_timestamp = entry.refresh_timestamp, "Secret refreshed");
        Ok(entry)
    }

    /// Refresh and re-arm the key's timer. Caller holds the key's lock.
    async fn refresh_now_locked(this: &Arc<Self>, secret_name: &str) -> Result<CacheEntry> {
        let entry = this.refresh_locked(secret_name).await?;
        Self::schedule(this, secret_name).await?;
        Ok(entry)
    }

    /// Arm the next background refresh from the stored entry.
    async fn schedule(this: &Arc<Self>, secret_name: &str) -> Result<()> {
        let entry = this.store.get_cache_entry(secret_name).await?;
        let now = this.clock.now_millis();
        let execute_at = match this.refresh.parse_next_execute_time(&entry) {
            Some(at) => at,
            None => this
                .refresh
                .next_execute_time(secret_name, this.registered_ttl(secret_name), entry.refresh_timestamp)
                .max(now),
        };
        let delay_ms = u64::try_from(execute_at.saturating_sub(now)).unwrap_or(0);

        let weak = Arc::downgrade(this);
        let key = secret_name.to_string();
        this.timers.arm(secret_name, Duration::from_millis(delay_ms), move |id| {
            Self::fire(weak, key, id)
        });
        debug!(secret_name, execute_at, delay_ms, "Scheduled background refresh");
        Ok(())
    }

    /// Timer callback: refresh under the key's lock, then re-arm. Errors are
    /// logged; a failed re-arm leaves the key unscheduled until the next
    /// foreground fetch.
    fn fire(weak: Weak<Self>, secret_name: String, id: u64) -> BoxFuture<'static, ()> {
        Box::pin(async move {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let _guard = inner.locks.acquire(&secret_name).await;
            if !inner.timers.is_current(&secret_name, id) {
                debug!(secret_name = %secret_name, "Refresh timer superseded");
                return;
            }

            if let Err(err) = inner.refresh_locked(&secret_name).await {
                error!(secret_name = %secret_name, error = %err, "Background refresh failed");
            }
            inner.timers.remove(&secret_name, id);
            if let Err(err) = Self::schedule(&inner, &secret_name).await {
                error!(secret_name = %secret_name, error = %err, "Failed to reschedule refresh");
            }
        })
    }
}

/// TTL-aware secret cache in front of a [`SecretBackend`].
///
/// Cheap to clone; clones share the same cache.
#[derive(Clone)]
pub struct CacheClient {
    inner: Arc<CacheInner>,
}

impl CacheClient {
    pub fn builder() -> CacheClientBuilder {
        CacheClientBuilder::new()
    }

    pub(super) fn from_inner(inner: CacheInner) -> Self {
        Self { inner: Arc::new(inner) }
    }

    /// Initialize collaborators, then fetch every secret registered with an
    /// explicit TTL. Transient fetch failures are skipped (the secret is
    /// fetched on first use); anything else aborts initialization.
    pub(super) async fn init(&self) -> Result<()> {
        let inner = &self.inner;
        inner.backend.init().await?;
        inner.store.init().await?;
        inner.refresh.init()?;
        inner.hook.init().await?;

        let mut names: Vec<&String> = inner.secret_ttls.keys().collect();
        names.sort();
        let mut preloaded = 0usize;
        for name in names {
            let _guard = inner.locks.acquire(name).await;
            match CacheInner::refresh_now_locked(inner, name).await {
                Ok(_) => preloaded += 1,
                Err(err) if err.needs_recovery() => {
                    warn!(secret_name = %name, error = %err, "Initial fetch failed, deferring to first use");
                }
                Err(err) => {
                    error!(secret_name = %name, error = %err, "Initial fetch failed");
                    return Err(err);
                }
            }
        }

        info!(stage = %inner.stage, preloaded, "Cache client initialized");
        Ok(())
    }

    /// Version stage this client caches.
    pub fn stage(&self) -> &str {
        &self.inner.stage
    }

    /// Number of keys with a pending background refresh.
    pub fn scheduled_refreshes(&self) -> usize {
        self.inner.timers.len()
    }

    /// Get a secret, fetching it when missing or expired.
    ///
    /// # Errors
    /// `EmptyName` for an empty name; otherwise whatever the fetch, hook or
    /// store reported.
    #[instrument(skip(self))]
    pub async fn get_secret_info(&self, secret_name: &str) -> Result<SecretInfo> {
        if secret_name.is_empty() {
            return Err(SecretCacheError::EmptyName);
        }
        if let Some(entry) = self.inner.fresh_entry(secret_name).await? {
            return self.inner.hook.get(&entry).await;
        }

        let _guard = self.inner.locks.acquire(secret_name).await;
        if let Some(entry) = self.inner.fresh_entry(secret_name).await? {
            debug!(secret_name, "Entry refreshed by a concurrent caller");
            return self.inner.hook.get(&entry).await;
        }

        let entry = CacheInner::refresh_now_locked(&self.inner, secret_name).await?;
        self.inner.hook.get(&entry).await
    }

    /// Text value of a secret declared as text.
    pub async fn get_string_value(&self, secret_name: &str) -> Result<String> {
        let secret = self.get_secret_info(secret_name).await?;
        if secret.secret_data_type != SecretDataType::Text {
            return Err(SecretCacheError::DataTypeMismatch {
                name: secret_name.to_string(),
                expected: SecretDataType::Text,
                actual: secret.secret_data_type,
            });
        }
        Ok(secret.secret_value)
    }

    /// Bytes of a secret declared as binary. The value is returned as the
    /// service encoded it; no decoding is applied.
    pub async fn get_binary_value(&self, secret_name: &str) -> Result<Vec<u8>> {
        let secret = self.get_secret_info(secret_name).await?;
        if secret.secret_data_type != SecretDataType::Binary {
            return Err(SecretCacheError::DataTypeMismatch {
                name: secret_name.to_string(),
                expected: SecretDataType::Binary,
                actual: secret.secret_data_type,
            });
        }
        if secret.secret_value_byte_buffer.is_empty() {
            Ok(secret.secret_value.into_bytes())
        } else {
            Ok(secret.secret_value_byte_buffer)
        }
    }

    /// Fetch now regardless of expiry and re-arm the background timer.
    #[instrument(skip(self))]
    pub async fn refresh_now(&self, secret_name: &str) -> Result<bool> {
        if secret_name.is_empty() {
            return Err(SecretCacheError::EmptyName);
        }
        let _guard = self.inner.locks.acquire(secret_name).await;
        CacheInner::refresh_now_locked(&self.inner, secret_name).await?;
        Ok(true)
    }

    /// Cancel background refreshes and close every collaborator. Failures
    /// are logged; every collaborator is attempted.
    pub async fn close(&self) -> Result<()> {
        let inner = &self.inner;
        inner.timers.cancel_all();

        if let Err(err) = inner.store.close().await {
            error!(error = %err, "Failed to close store strategy");
        }
        if let Err(err) = inner.refresh.close() {
            error!(error = %err, "Failed to close refresh strategy");
        }
        if let Err(err) = inner.backend.close().await {
            error!(error = %err, "Failed to close secret backend");
        }
        if let Err(err) = inner.hook.close().await {
            error!(error = %err, "Failed to close cache hook");
        }
        info!("Cache client closed");
        Ok(())
    }
}
