//! Port interfaces for talking to the remote secret service
//!
//! [`SecretBackend`] is what the cache client consumes. [`RegionClient`] is a
//! single endpoint; the fetch client builds one per [`RegionTarget`] through a
//! [`RegionClientFactory`], lazily and at most once.

use std::sync::Arc;

use async_trait::async_trait;
use secretcache_domain::{
    BackendError, Credential, GetSecretValueRequest, RegionTarget, Result, SecretInfo,
};

/// Source of secret values consumed by the cache client
#[async_trait]
pub trait SecretBackend: Send + Sync {
    async fn init(&self) -> Result<()> {
        Ok(())
    }

    /// Fetch the latest value of a secret for the requested stage
    async fn get_secret_value(&self, request: &GetSecretValueRequest) -> Result<SecretInfo>;

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// Client bound to one region target
///
/// Failures must be classified; the fetch client relies on the
/// classification alone to decide between retrying and failing fast.
#[async_trait]
pub trait RegionClient: Send + Sync {
    async fn get_secret_value(
        &self,
        request: &GetSecretValueRequest,
    ) -> std::result::Result<SecretInfo, BackendError>;

    /// Release connections held by this client
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// Builds region clients, dispatching on the target's variant
pub trait RegionClientFactory: Send + Sync {
    fn build(
        &self,
        target: &RegionTarget,
        credential: Option<&Credential>,
    ) -> Result<Arc<dyn RegionClient>>;
}

/// Measures how quickly a target answers
#[async_trait]
pub trait ReachabilityProbe: Send + Sync {
    /// Latency in milliseconds, or `None` when the target is unreachable
    async fn probe(&self, target: &RegionTarget) -> Option<f64>;
}
