//! Configuration structures
//!
//! Deserialized from JSON or TOML by the infra config loader. Every field
//! has a default so partial files are accepted; [`CacheClientConfig::validate`]
//! rejects combinations that cannot work.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_JSON_TTL_PROPERTY, DEFAULT_PROBE_TIMEOUT_MS, DEFAULT_REQUEST_WAIT_TIMEOUT_MS,
    DEFAULT_RETRY_CAPACITY_MS, DEFAULT_RETRY_INITIAL_INTERVAL_MS, DEFAULT_RETRY_MAX_ATTEMPTS,
    STAGE_ACS_CURRENT,
};
use crate::errors::{Result, SecretCacheError};
use crate::types::RegionTarget;

/// Top-level configuration of a cache client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheClientConfig {
    /// Version stage cached for every secret.
    pub stage: String,
    /// JSON property under which a secret payload may embed its own TTL.
    /// Empty disables payload TTLs.
    pub json_ttl_property: String,
    /// Per-secret TTL overrides in milliseconds. Secrets listed here are
    /// fetched eagerly during initialization.
    pub secret_ttls: HashMap<String, i64>,
    pub store: StoreConfig,
    pub regions: Vec<RegionTarget>,
    pub backoff: BackoffConfig,
    /// Upper bound on a multi-region race, in milliseconds.
    pub wait_timeout_ms: u64,
    /// Upper bound on a single reachability probe, in milliseconds.
    pub probe_timeout_ms: u64,
}

impl Default for CacheClientConfig {
    fn default() -> Self {
        Self {
            stage: STAGE_ACS_CURRENT.to_string(),
            json_ttl_property: DEFAULT_JSON_TTL_PROPERTY.to_string(),
            secret_ttls: HashMap::new(),
            store: StoreConfig::default(),
            regions: Vec::new(),
            backoff: BackoffConfig::default(),
            wait_timeout_ms: DEFAULT_REQUEST_WAIT_TIMEOUT_MS,
            probe_timeout_ms: DEFAULT_PROBE_TIMEOUT_MS,
        }
    }
}

impl CacheClientConfig {
    /// Check the configuration for values that would fail at runtime.
    ///
    /// # Errors
    /// Returns `SecretCacheError::Config` describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.stage.is_empty() {
            return Err(SecretCacheError::Config("stage must not be empty".into()));
        }
        if self.regions.is_empty() {
            return Err(SecretCacheError::Config("at least one region target is required".into()));
        }
        if let Some(target) = self.regions.iter().find(|r| r.region_id.is_empty()) {
            return Err(SecretCacheError::Config(format!(
                "region target with endpoint {:?} has an empty region_id",
                target.endpoint
            )));
        }
        if let Some((name, ttl)) = self.secret_ttls.iter().find(|(_, ttl)| **ttl <= 0) {
            return Err(SecretCacheError::Config(format!("ttl for [{name}] must be positive, got {ttl}")));
        }
        if self.wait_timeout_ms == 0 {
            return Err(SecretCacheError::Config("wait_timeout_ms must be greater than 0".into()));
        }
        self.store.validate()?;
        self.backoff.validate()
    }
}

/// Where cache entries live.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StoreConfig {
    #[default]
    Memory,
    File {
        #[serde(default = "default_cache_path")]
        path: PathBuf,
        #[serde(default)]
        reload_on_start: bool,
        salt: String,
    },
}

fn default_cache_path() -> PathBuf {
    PathBuf::from(".")
}

impl StoreConfig {
    fn validate(&self) -> Result<()> {
        match self {
            Self::File { salt, .. } if salt.is_empty() => {
                Err(SecretCacheError::Config("file store requires a non-empty salt".into()))
            }
            _ => Ok(()),
        }
    }
}

/// Exponential backoff parameters for per-region retry loops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackoffConfig {
    pub max_attempts: u32,
    pub initial_interval_ms: u64,
    pub capacity_ms: u64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_RETRY_MAX_ATTEMPTS,
            initial_interval_ms: DEFAULT_RETRY_INITIAL_INTERVAL_MS,
            capacity_ms: DEFAULT_RETRY_CAPACITY_MS,
        }
    }
}

impl BackoffConfig {
    fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 || self.initial_interval_ms == 0 || self.capacity_ms == 0 {
            return Err(SecretCacheError::Config(
                "backoff max_attempts, initial_interval_ms and capacity_ms must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}
