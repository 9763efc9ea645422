//! Builds a ready cache client from configuration

use std::sync::Arc;
use std::time::Duration;

use secretcache_core::{
    CacheClient, CacheClientBuilder, RegionClientFactory, ResilientFetchClient, StoreStrategy,
};
use secretcache_domain::{CacheClientConfig, Credential, Result, StoreConfig};
use tracing::info;

use crate::probe::TcpProbe;
use crate::store::FileStore;

/// Validate `config`, wire the fetch client, probe and store it describes,
/// and build (and so initialize) a cache client.
///
/// # Errors
/// Returns configuration errors from validation, and whatever
/// initialization reports.
pub async fn from_config(
    config: &CacheClientConfig,
    credential: Option<Credential>,
    factory: Arc<dyn RegionClientFactory>,
) -> Result<CacheClient> {
    config.validate()?;

    let mut fetch = ResilientFetchClient::builder(factory)
        .with_regions(config.regions.iter().cloned())
        .with_probe(Arc::new(TcpProbe::new(Duration::from_millis(config.probe_timeout_ms))))
        .with_backoff_config(&config.backoff)
        .with_wait_timeout(Duration::from_millis(config.wait_timeout_ms));
    if let Some(credential) = credential {
        fetch = fetch.with_credential(credential);
    }

    let mut builder = CacheClientBuilder::new()
        .with_stage(config.stage.clone())
        .with_json_ttl_property(config.json_ttl_property.clone())
        .with_backend(Arc::new(fetch.build()));

    if let StoreConfig::File { path, reload_on_start, salt } = &config.store {
        let store: Arc<dyn StoreStrategy> =
            Arc::new(FileStore::new(path.clone(), *reload_on_start, salt)?.with_stage(config.stage.clone()));
        builder = builder.with_store(store);
    }

    for (name, ttl) in &config.secret_ttls {
        builder = builder.with_secret_ttl(name.clone(), *ttl);
    }

    let client = builder.build().await?;
    info!(
        stage = %config.stage,
        regions = config.regions.len(),
        preloaded = config.secret_ttls.len(),
        "Cache client assembled from configuration"
    );
    Ok(client)
}
