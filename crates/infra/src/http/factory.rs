//! Region client factory dispatching on the target's variant

use std::sync::Arc;
use std::time::Duration;

use secretcache_core::{RegionClient, RegionClientFactory};
use secretcache_domain::{Credential, KmsVariant, RegionTarget, Result, SecretCacheError};
use tracing::debug;

use super::client::{endpoint_url, HttpRegionClient, DEFAULT_REQUEST_TIMEOUT};
use super::signer::SignerProvider;

/// Builds [`HttpRegionClient`]s. Standard targets need a credential;
/// dedicated targets need an explicit endpoint.
pub struct VariantClientFactory {
    signers: Arc<dyn SignerProvider>,
    timeout: Duration,
}

impl VariantClientFactory {
    pub fn new(signers: Arc<dyn SignerProvider>) -> Self {
        Self { signers, timeout: DEFAULT_REQUEST_TIMEOUT }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl RegionClientFactory for VariantClientFactory {
    fn build(
        &self,
        target: &RegionTarget,
        credential: Option<&Credential>,
    ) -> Result<Arc<dyn RegionClient>> {
        match target.variant {
            KmsVariant::Standard if credential.is_none() => {
                return Err(SecretCacheError::Config(format!(
                    "standard target {} requires a credential",
                    target.region_id
                )));
            }
            KmsVariant::Dedicated if target.endpoint.as_deref().map_or(true, str::is_empty) => {
                return Err(SecretCacheError::Config(format!(
                    "dedicated target {} requires an endpoint",
                    target.region_id
                )));
            }
            _ => {}
        }

        let url = endpoint_url(target)?;
        let signer = self.signers.signer_for(target, credential)?;
        debug!(
            region_id = %target.region_id,
            variant = %target.variant,
            credential = credential.map_or("none", Credential::kind),
            url = %url,
            "Building HTTP region client"
        );
        Ok(Arc::new(HttpRegionClient::new(target, url, signer, self.timeout)?))
    }
}

#[cfg(test)]
mod tests {
    use reqwest::Request;

    use super::*;
    use crate::http::signer::RequestSigner;

    struct Unsigned;

    impl RequestSigner for Unsigned {
        fn sign(&self, _request: &mut Request) -> Result<()> {
            Ok(())
        }
    }

    fn factory() -> VariantClientFactory {
        VariantClientFactory::new(Arc::new(
            |_: &RegionTarget, _: Option<&Credential>| -> Result<Arc<dyn RequestSigner>> {
                Ok(Arc::new(Unsigned))
            },
        ))
    }

    #[test]
    fn standard_target_without_credential_is_rejected() {
        let result = factory().build(&RegionTarget::new("cn-hangzhou"), None);
        assert!(matches!(result, Err(SecretCacheError::Config(_))));
    }

    #[test]
    fn dedicated_target_needs_no_credential() {
        let target = RegionTarget::dedicated("kst-1", "kst-1.cryptoservice.kms.aliyuncs.com");
        assert!(factory().build(&target, None).is_ok());
    }

    #[test]
    fn dedicated_target_without_endpoint_is_rejected() {
        let mut target = RegionTarget::dedicated("kst-1", "");
        target.endpoint = None;
        assert!(factory().build(&target, None).is_err());
    }
}
