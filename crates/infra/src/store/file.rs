//! Encrypted file-backed store
//!
//! Layout: one JSON file per secret and stage,
//! `<base>/<secret name>/stage_<stage lowercased>.json`, holding the
//! serialized [`CacheEntry`] with the secret value replaced by a
//! [`CbcEnvelope`] blob. Entries are also kept in memory, so disk is only
//! read on a cold miss.
//!
//! Cold reads are restricted: unless `reload_on_start` is set, a secret is
//! only read back from disk if it was written during this run.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use dashmap::{DashMap, DashSet};
use secretcache_common::CbcEnvelope;
use secretcache_core::StoreStrategy;
use secretcache_domain::constants::{CACHE_FILE_PREFIX, CACHE_FILE_SUFFIX, STAGE_ACS_CURRENT};
use secretcache_domain::{CacheEntry, Result, SecretCacheError};
use tracing::{debug, info, instrument, warn};

use crate::errors::InfraError;

/// File-backed [`StoreStrategy`] with at-rest envelope encryption.
#[derive(Debug)]
pub struct FileStore {
    base_path: PathBuf,
    reload_on_start: bool,
    stage: String,
    envelope: CbcEnvelope,
    entries: DashMap<String, CacheEntry>,
    reload_eligible: DashSet<String>,
}

impl FileStore {
    /// Create a store rooted at `base_path`. An empty path means the current
    /// directory.
    ///
    /// # Errors
    /// Returns `SecretCacheError::Config` when `salt` is empty.
    pub fn new(base_path: impl Into<PathBuf>, reload_on_start: bool, salt: &str) -> Result<Self> {
        let envelope = CbcEnvelope::new(salt)
            .map_err(|e| SecretCacheError::Config(format!("file store: {e}")))?;
        let mut base_path = base_path.into();
        if base_path.as_os_str().is_empty() {
            base_path = PathBuf::from(".");
        }
        Ok(Self {
            base_path,
            reload_on_start,
            stage: STAGE_ACS_CURRENT.to_string(),
            envelope,
            entries: DashMap::new(),
            reload_eligible: DashSet::new(),
        })
    }

    /// Stage whose file is read on a cold miss. Defaults to `ACSCurrent`.
    pub fn with_stage(mut self, stage: impl Into<String>) -> Self {
        self.stage = stage.into();
        self
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Path of the file holding `secret_name` for `stage`.
    pub fn entry_path(&self, secret_name: &str, stage: &str) -> PathBuf {
        let file_name = format!("{CACHE_FILE_PREFIX}{stage}{CACHE_FILE_SUFFIX}").to_lowercase();
        self.base_path.join(secret_name).join(file_name)
    }

    fn seal_entry(&self, entry: &CacheEntry) -> Result<CacheEntry> {
        let mut sealed = entry.clone();
        sealed.secret_info.secret_value = self
            .envelope
            .seal(entry.secret_info.secret_value.as_bytes())
            .map_err(InfraError::from)?;
        // The buffer mirrors the value; never write it in the clear.
        sealed.secret_info.secret_value_byte_buffer.clear();
        Ok(sealed)
    }

    fn open_entry(&self, mut entry: CacheEntry) -> Result<CacheEntry> {
        let plaintext = self
            .envelope
            .open(&entry.secret_info.secret_value)
            .map_err(InfraError::from)?;
        entry.secret_info.secret_value = String::from_utf8(plaintext)
            .map_err(|e| SecretCacheError::Format(format!("decrypted value is not UTF-8: {e}")))?;
        Ok(entry)
    }

    async fn read_entry(&self, secret_name: &str) -> Result<CacheEntry> {
        let path = self.entry_path(secret_name, &self.stage);
        let contents = tokio::fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SecretCacheError::NotFound(format!("no cache file at {}", path.display()))
            } else {
                SecretCacheError::Io(e)
            }
        })?;
        let sealed: CacheEntry = serde_json::from_slice(&contents)?;
        self.open_entry(sealed)
    }
}

/// Secret names become directory names; refuse anything that would escape
/// the base directory.
fn validate_secret_name(secret_name: &str) -> Result<()> {
    if secret_name.is_empty()
        || secret_name == "."
        || secret_name == ".."
        || secret_name.contains(['/', '\\'])
    {
        return Err(SecretCacheError::InvalidArgument(format!(
            "secret name [{secret_name}] cannot be used as a cache directory"
        )));
    }
    Ok(())
}

#[async_trait]
impl StoreStrategy for FileStore {
    async fn init(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.base_path).await?;
        info!(
            base_path = %self.base_path.display(),
            reload_on_start = self.reload_on_start,
            stage = %self.stage,
            "File store initialized"
        );
        Ok(())
    }

    #[instrument(skip(self, entry), fields(secret_name = %entry.secret_name(), stage = %entry.stage))]
    async fn store_secret(&self, entry: &CacheEntry) -> Result<()> {
        let secret_name = entry.secret_name();
        validate_secret_name(secret_name)?;

        let sealed = self.seal_entry(entry)?;
        let json = serde_json::to_vec_pretty(&sealed)?;

        let path = self.entry_path(secret_name, &entry.stage);
        if let Some(dir) = path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        // Write-then-rename so a crash never leaves a half-written file.
        let staging = path.with_extension("json.tmp");
        tokio::fs::write(&staging, &json).await?;
        tokio::fs::rename(&staging, &path).await?;

        self.entries.insert(secret_name.to_string(), entry.clone());
        self.reload_eligible.insert(secret_name.to_string());
        debug!(path = %path.display(), "Cache file written");
        Ok(())
    }

    async fn get_cache_entry(&self, secret_name: &str) -> Result<CacheEntry> {
        validate_secret_name(secret_name)?;
        if !self.reload_on_start && !self.reload_eligible.contains(secret_name) {
            return Err(SecretCacheError::NotFound(format!(
                "[{secret_name}] has not been cached during this run"
            )));
        }
        if let Some(entry) = self.entries.get(secret_name) {
            return Ok(entry.value().clone());
        }

        let entry = self.read_entry(secret_name).await.map_err(|err| {
            warn!(secret_name, error = %err, "Failed to reload cache file");
            err
        })?;
        debug!(secret_name, refresh_timestamp = entry.refresh_timestamp, "Reloaded entry from disk");
        self.entries.insert(secret_name.to_string(), entry.clone());
        Ok(entry)
    }
}
