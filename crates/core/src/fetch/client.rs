//! Multi-region resilient fetch client
//!
//! Targets are ranked once at init by probe latency. A fetch tries the first
//! target without retry; if that fails with a recoverable error, one retry
//! loop per target (the first included) races the others. The first loop to
//! succeed wins and a shared cancellation token stops the rest. Loops that
//! are mid-request when the race ends finish in the background.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use secretcache_common::{user_agent_registry, BackoffStrategy, ExponentialBackoff};
use secretcache_domain::constants::{DEFAULT_REQUEST_WAIT_TIMEOUT_MS, PROJECT_VERSION, USER_AGENT};
use secretcache_domain::{
    BackoffConfig, Credential, GetSecretValueRequest, KmsVariant, RankedRegionTarget,
    RegionTarget, Result, SecretCacheError, SecretInfo,
};
use tokio::sync::OnceCell;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use super::ports::{ReachabilityProbe, RegionClient, RegionClientFactory, SecretBackend};

/// Whether a failure should send the fetch into retry and region racing.
fn is_retryable(err: &SecretCacheError) -> bool {
    matches!(err, SecretCacheError::Backend(e) if e.is_recoverable())
}

/// A ranked target and its lazily built client.
struct RegionSlot {
    target: RegionTarget,
    client: OnceCell<Arc<dyn RegionClient>>,
}

impl RegionSlot {
    fn new(target: RegionTarget) -> Self {
        Self { target, client: OnceCell::new() }
    }
}

struct FetchInner {
    configured: Vec<RegionTarget>,
    credential: Option<Credential>,
    factory: Arc<dyn RegionClientFactory>,
    probe: Option<Arc<dyn ReachabilityProbe>>,
    backoff: Arc<dyn BackoffStrategy>,
    wait_timeout: Duration,
    regions: OnceCell<Vec<Arc<RegionSlot>>>,
    closed: AtomicBool,
}

impl FetchInner {
    async fn client_for(&self, slot: &RegionSlot) -> Result<Arc<dyn RegionClient>> {
        slot.client
            .get_or_try_init(|| async {
                debug!(
                    region_id = %slot.target.region_id,
                    variant = %slot.target.variant,
                    endpoint = %slot.target.resolved_endpoint(),
                    "Building region client"
                );
                self.factory.build(&slot.target, self.credential.as_ref())
            })
            .await
            .cloned()
    }

    async fn attempt(&self, slot: &RegionSlot, request: &GetSecretValueRequest) -> Result<SecretInfo> {
        let client = self.client_for(slot).await?;
        client.get_secret_value(request).await.map_err(SecretCacheError::from)
    }

    /// Retry one target until success, a fatal error, an exhausted backoff
    /// budget, or cancellation. Errors come back as `region: reason` strings
    /// for the aggregate report.
    async fn retry_loop(
        self: Arc<Self>,
        slot: Arc<RegionSlot>,
        request: GetSecretValueRequest,
        cancel: CancellationToken,
    ) -> std::result::Result<SecretInfo, String> {
        let region_id = slot.target.region_id.clone();
        let mut attempt: u32 = 0;
        let mut last_error: Option<String> = None;

        loop {
            let Some(wait) = self.backoff.wait_time(attempt) else {
                return Err(match last_error {
                    Some(err) => format!("{region_id}: retries exhausted, last error: {err}"),
                    None => format!("{region_id}: retries exhausted"),
                });
            };

            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!(region_id = %region_id, attempt, "Retry loop cancelled");
                    return Err(format!("{region_id}: retry cancelled"));
                }
                _ = tokio::time::sleep(wait) => {}
            }

            match self.attempt(&slot, &request).await {
                Ok(secret) => {
                    debug!(region_id = %region_id, attempt, "Retry attempt succeeded");
                    return Ok(secret);
                }
                Err(err) if is_retryable(&err) => {
                    warn!(region_id = %region_id, attempt, error = %err, "Retry attempt failed");
                    last_error = Some(err.to_string());
                    attempt += 1;
                }
                Err(err) => {
                    warn!(region_id = %region_id, attempt, error = %err, "Retry loop stopped on fatal error");
                    return Err(format!("{region_id}: {err}"));
                }
            }
        }
    }
}

/// Backend that fetches from a ranked list of region targets.
#[derive(Clone)]
pub struct ResilientFetchClient {
    inner: Arc<FetchInner>,
}

impl ResilientFetchClient {
    pub fn builder(factory: Arc<dyn RegionClientFactory>) -> ResilientFetchClientBuilder {
        ResilientFetchClientBuilder::new(factory)
    }

    /// Targets in the order fetches will try them. Before init this is the
    /// configured order.
    pub fn regions(&self) -> Vec<RegionTarget> {
        match self.inner.regions.get() {
            Some(slots) => slots.iter().map(|slot| slot.target.clone()).collect(),
            None => self.inner.configured.clone(),
        }
    }

    async fn rank_targets(&self) -> Vec<RegionTarget> {
        let targets = self.inner.configured.clone();
        let Some(probe) = self.inner.probe.as_ref() else {
            return targets;
        };
        if targets.len() <= 1 {
            return targets;
        }

        let probes = targets.into_iter().map(|target| {
            let probe = Arc::clone(probe);
            async move {
                match probe.probe(&target).await {
                    Some(latency_ms) => RankedRegionTarget::reachable(target, latency_ms),
                    None => RankedRegionTarget::unreachable(target),
                }
            }
        });
        let ranked = join_all(probes).await;

        for r in &ranked {
            debug!(
                region_id = %r.target.region_id,
                reachable = r.reachable,
                latency_ms = r.latency_ms,
                "Probed region target"
            );
        }
        RankedRegionTarget::rank(ranked)
    }

    async fn race(
        &self,
        regions: &[Arc<RegionSlot>],
        request: &GetSecretValueRequest,
    ) -> Result<SecretInfo> {
        let cancel = CancellationToken::new();
        let mut loops = JoinSet::new();

        for slot in regions {
            // Fresh request per target; nothing target-specific is shared.
            let request = GetSecretValueRequest::new(&request.secret_name, &request.version_stage);
            loops.spawn(Arc::clone(&self.inner).retry_loop(
                Arc::clone(slot),
                request,
                cancel.clone(),
            ));
        }

        let outcome = tokio::time::timeout(self.inner.wait_timeout, async {
            let mut errors = Vec::new();
            while let Some(joined) = loops.join_next().await {
                match joined {
                    Ok(Ok(secret)) => return Ok(secret),
                    Ok(Err(err)) => errors.push(err),
                    Err(join_err) => errors.push(format!("retry task failed: {join_err}")),
                }
            }
            Err(SecretCacheError::RetriesExhausted { errors })
        })
        .await;

        cancel.cancel();
        loops.detach_all();

        match outcome {
            Ok(result) => result,
            Err(_) => {
                let timeout_ms = u64::try_from(self.inner.wait_timeout.as_millis()).unwrap_or(u64::MAX);
                warn!(secret_name = %request.secret_name, timeout_ms, "Region race timed out");
                Err(SecretCacheError::WaitTimeout { timeout_ms })
            }
        }
    }
}

#[async_trait]
impl SecretBackend for ResilientFetchClient {
    /// Validate targets and credential, register the user agent and rank
    /// targets. Ranking runs once; later calls keep the first ranking.
    #[instrument(skip(self))]
    async fn init(&self) -> Result<()> {
        if self.inner.configured.is_empty() {
            return Err(SecretCacheError::Config("at least one region target is required".into()));
        }
        let needs_credential =
            self.inner.configured.iter().any(|t| t.variant == KmsVariant::Standard);
        if needs_credential && self.inner.credential.is_none() {
            return Err(SecretCacheError::Config(
                "a credential is required for standard region targets".into(),
            ));
        }

        user_agent_registry().register(USER_AGENT, 0, PROJECT_VERSION);

        self.inner
            .regions
            .get_or_init(|| async {
                self.rank_targets().await.into_iter().map(|t| Arc::new(RegionSlot::new(t))).collect()
            })
            .await;

        let order: Vec<String> = self.regions().into_iter().map(|t| t.region_id).collect();
        info!(regions = ?order, "Fetch client initialized");
        Ok(())
    }

    #[instrument(skip(self, request), fields(secret_name = %request.secret_name))]
    async fn get_secret_value(&self, request: &GetSecretValueRequest) -> Result<SecretInfo> {
        if self.inner.closed.load(Ordering::Acquire) {
            return Err(SecretCacheError::Closed);
        }
        let regions = self
            .inner
            .regions
            .get()
            .ok_or_else(|| SecretCacheError::NotInitialized("fetch client used before init".into()))?;
        let first = regions
            .first()
            .ok_or_else(|| SecretCacheError::Config("no region target configured".into()))?;

        match self.inner.attempt(first, request).await {
            Ok(secret) => return Ok(secret),
            Err(err) => {
                warn!(region_id = %first.target.region_id, error = %err, "Fetch from primary region failed");
                if !is_retryable(&err) {
                    return Err(err);
                }
            }
        }

        self.race(regions, request).await
    }

    /// Close every region client that was actually built.
    async fn close(&self) -> Result<()> {
        self.inner.closed.store(true, Ordering::Release);
        if let Some(regions) = self.inner.regions.get() {
            for slot in regions {
                if let Some(client) = slot.client.get() {
                    if let Err(err) = client.close().await {
                        warn!(region_id = %slot.target.region_id, error = %err, "Failed to close region client");
                    }
                }
            }
        }
        Ok(())
    }
}

/// Builder for [`ResilientFetchClient`]
pub struct ResilientFetchClientBuilder {
    regions: Vec<RegionTarget>,
    credential: Option<Credential>,
    factory: Arc<dyn RegionClientFactory>,
    probe: Option<Arc<dyn ReachabilityProbe>>,
    backoff: Arc<dyn BackoffStrategy>,
    wait_timeout: Duration,
}

impl ResilientFetchClientBuilder {
    pub fn new(factory: Arc<dyn RegionClientFactory>) -> Self {
        Self {
            regions: Vec::new(),
            credential: None,
            factory,
            probe: None,
            backoff: Arc::new(ExponentialBackoff::default()),
            wait_timeout: Duration::from_millis(DEFAULT_REQUEST_WAIT_TIMEOUT_MS),
        }
    }

    pub fn with_region(mut self, target: RegionTarget) -> Self {
        self.regions.push(target);
        self
    }

    pub fn with_regions(mut self, targets: impl IntoIterator<Item = RegionTarget>) -> Self {
        self.regions.extend(targets);
        self
    }

    pub fn with_credential(mut self, credential: Credential) -> Self {
        self.credential = Some(credential);
        self
    }

    /// Without a probe, targets keep their configured order.
    pub fn with_probe(mut self, probe: Arc<dyn ReachabilityProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    pub fn with_backoff(mut self, backoff: Arc<dyn BackoffStrategy>) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn with_backoff_config(self, config: &BackoffConfig) -> Self {
        self.with_backoff(Arc::new(ExponentialBackoff::from_millis(
            config.max_attempts,
            config.initial_interval_ms,
            config.capacity_ms,
        )))
    }

    pub fn with_wait_timeout(mut self, wait_timeout: Duration) -> Self {
        self.wait_timeout = wait_timeout;
        self
    }

    pub fn build(self) -> ResilientFetchClient {
        ResilientFetchClient {
            inner: Arc::new(FetchInner {
                configured: self.regions,
                credential: self.credential,
                factory: self.factory,
                probe: self.probe,
                backoff: self.backoff,
                wait_timeout: self.wait_timeout,
                regions: OnceCell::new(),
                closed: AtomicBool::new(false),
            }),
        }
    }
}
