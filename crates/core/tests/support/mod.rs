//! Test doubles shared by the core integration tests

#![allow(dead_code)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use secretcache_core::{
    CacheHook, DefaultCacheHook, ReachabilityProbe, RegionClient, RegionClientFactory,
    SecretBackend,
};
use secretcache_common::Clock;
use secretcache_domain::{
    BackendError, CacheEntry, Credential, GetSecretValueRequest, RegionTarget, Result,
    SecretCacheError, SecretInfo,
};

/// Backend that numbers every successful fetch per secret (`v1`, `v2`, ...)
/// and can be told to fail the next call for a name.
#[derive(Default)]
pub struct StubBackend {
    delay: Duration,
    values: Mutex<HashMap<String, String>>,
    binary: Mutex<HashSet<String>>,
    failures: Mutex<HashMap<String, VecDeque<SecretCacheError>>>,
    calls: Mutex<HashMap<String, usize>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl StubBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self { delay, ..Self::default() }
    }

    /// Fixed payload for `name` instead of the generated `value-N`.
    pub fn set_value(&self, name: &str, value: &str) {
        self.values.lock().unwrap().insert(name.to_string(), value.to_string());
    }

    pub fn mark_binary(&self, name: &str) {
        self.binary.lock().unwrap().insert(name.to_string());
    }

    pub fn fail_next(&self, name: &str, err: SecretCacheError) {
        self.failures.lock().unwrap().entry(name.to_string()).or_default().push_back(err);
    }

    pub fn calls_for(&self, name: &str) -> usize {
        self.calls.lock().unwrap().get(name).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SecretBackend for StubBackend {
    async fn get_secret_value(&self, request: &GetSecretValueRequest) -> Result<SecretInfo> {
        let name = request.secret_name.clone();
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let call = {
            let mut calls = self.calls.lock().unwrap();
            let count = calls.entry(name.clone()).or_insert(0);
            *count += 1;
            *count
        };

        if let Some(err) = self.failures.lock().unwrap().get_mut(&name).and_then(VecDeque::pop_front)
        {
            return Err(err);
        }

        let version = format!("v{call}");
        let value = self
            .values
            .lock()
            .unwrap()
            .get(&name)
            .cloned()
            .unwrap_or_else(|| format!("value-{call}"));
        if self.binary.lock().unwrap().contains(&name) {
            Ok(SecretInfo::binary(name, version, value))
        } else {
            Ok(SecretInfo::text(name, version, value))
        }
    }
}

/// Region client replaying queued replies, then a fixed default reply.
pub struct ScriptedRegionClient {
    pub region_id: String,
    delay: Duration,
    replies: Mutex<VecDeque<std::result::Result<SecretInfo, BackendError>>>,
    default_reply: std::result::Result<SecretInfo, BackendError>,
    calls: AtomicUsize,
    closed: AtomicBool,
}

impl ScriptedRegionClient {
    pub fn succeeding(region_id: &str) -> Arc<Self> {
        Self::build(region_id, Ok(SecretInfo::text("db", region_id, format!("from-{region_id}"))), Duration::ZERO)
    }

    pub fn failing(region_id: &str, err: BackendError) -> Arc<Self> {
        Self::build(region_id, Err(err), Duration::ZERO)
    }

    pub fn slow(region_id: &str, delay: Duration) -> Arc<Self> {
        Self::build(region_id, Ok(SecretInfo::text("db", region_id, format!("from-{region_id}"))), delay)
    }

    fn build(
        region_id: &str,
        default_reply: std::result::Result<SecretInfo, BackendError>,
        delay: Duration,
    ) -> Arc<Self> {
        Arc::new(Self {
            region_id: region_id.to_string(),
            delay,
            replies: Mutex::new(VecDeque::new()),
            default_reply,
            calls: AtomicUsize::new(0),
            closed: AtomicBool::new(false),
        })
    }

    pub fn push_reply(&self, reply: std::result::Result<SecretInfo, BackendError>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RegionClient for ScriptedRegionClient {
    async fn get_secret_value(
        &self,
        _request: &GetSecretValueRequest,
    ) -> std::result::Result<SecretInfo, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let queued = self.replies.lock().unwrap().pop_front();
        queued.unwrap_or_else(|| self.default_reply.clone())
    }

    async fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Factory handing out pre-built scripted clients and recording which
/// regions were asked for.
#[derive(Default)]
pub struct RecordingFactory {
    clients: HashMap<String, Arc<ScriptedRegionClient>>,
    built: Mutex<Vec<String>>,
}

impl RecordingFactory {
    pub fn new(clients: impl IntoIterator<Item = Arc<ScriptedRegionClient>>) -> Arc<Self> {
        Arc::new(Self {
            clients: clients.into_iter().map(|c| (c.region_id.clone(), c)).collect(),
            built: Mutex::new(Vec::new()),
        })
    }

    pub fn empty() -> Arc<Self> {
        Self::new(Vec::new())
    }

    pub fn built(&self) -> Vec<String> {
        self.built.lock().unwrap().clone()
    }
}

impl RegionClientFactory for RecordingFactory {
    fn build(
        &self,
        target: &RegionTarget,
        _credential: Option<&Credential>,
    ) -> Result<Arc<dyn RegionClient>> {
        let client = self
            .clients
            .get(&target.region_id)
            .cloned()
            .ok_or_else(|| SecretCacheError::Config(format!("no client for {}", target.region_id)))?;
        self.built.lock().unwrap().push(target.region_id.clone());
        Ok(client)
    }
}

/// Probe answering from a fixed latency table; missing regions are unreachable.
pub struct FixedProbe {
    latencies: HashMap<String, f64>,
}

impl FixedProbe {
    pub fn new(latencies: &[(&str, f64)]) -> Arc<Self> {
        Arc::new(Self { latencies: latencies.iter().map(|(r, l)| (r.to_string(), *l)).collect() })
    }
}

#[async_trait]
impl ReachabilityProbe for FixedProbe {
    async fn probe(&self, target: &RegionTarget) -> Option<f64> {
        self.latencies.get(&target.region_id).copied()
    }
}

/// What the recovery hook answers with.
pub enum Recovery {
    Value(String),
    Nothing,
    Fail,
}

/// Default hook behaviour plus a scripted disaster-recovery answer.
pub struct RecoveryHook {
    inner: DefaultCacheHook,
    recovery: Recovery,
    recovery_calls: AtomicUsize,
}

impl RecoveryHook {
    pub fn new(clock: Arc<dyn Clock>, recovery: Recovery) -> Arc<Self> {
        Arc::new(Self {
            inner: DefaultCacheHook::new("ACSCurrent", clock),
            recovery,
            recovery_calls: AtomicUsize::new(0),
        })
    }

    pub fn recovery_calls(&self) -> usize {
        self.recovery_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CacheHook for RecoveryHook {
    async fn put(&self, secret: SecretInfo) -> Result<CacheEntry> {
        self.inner.put(secret).await
    }

    async fn get(&self, entry: &CacheEntry) -> Result<SecretInfo> {
        self.inner.get(entry).await
    }

    async fn recovery_get_secret(&self, secret_name: &str) -> Result<Option<SecretInfo>> {
        self.recovery_calls.fetch_add(1, Ordering::SeqCst);
        match &self.recovery {
            Recovery::Value(value) => Ok(Some(SecretInfo::text(secret_name, "recovered", value.clone()))),
            Recovery::Nothing => Ok(None),
            Recovery::Fail => Err(SecretCacheError::Store("recovery source unavailable".into())),
        }
    }
}
