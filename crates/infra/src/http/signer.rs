//! Request signing capability
//!
//! Request authentication is not implemented here. A [`RequestSigner`]
//! receives the fully built request and adds whatever headers its credential
//! scheme needs; a [`SignerProvider`] picks the signer for a target.

use std::sync::Arc;

use reqwest::header::{HeaderName, HeaderValue};
use reqwest::Request;
use secretcache_domain::{Credential, RegionTarget, Result, SecretCacheError};

/// Adds authentication to an outgoing request.
pub trait RequestSigner: Send + Sync {
    fn sign(&self, request: &mut Request) -> Result<()>;
}

/// Chooses a signer for a target and the configured credential.
pub trait SignerProvider: Send + Sync {
    fn signer_for(
        &self,
        target: &RegionTarget,
        credential: Option<&Credential>,
    ) -> Result<Arc<dyn RequestSigner>>;
}

impl<F> SignerProvider for F
where
    F: Fn(&RegionTarget, Option<&Credential>) -> Result<Arc<dyn RequestSigner>> + Send + Sync,
{
    fn signer_for(
        &self,
        target: &RegionTarget,
        credential: Option<&Credential>,
    ) -> Result<Arc<dyn RequestSigner>> {
        self(target, credential)
    }
}

/// Sets one fixed header on every request, e.g. a gateway-issued token.
#[derive(Clone)]
pub struct StaticHeaderSigner {
    name: HeaderName,
    value: HeaderValue,
}

impl StaticHeaderSigner {
    /// # Errors
    /// Returns `SecretCacheError::Config` if the name or value is not a
    /// valid header.
    pub fn new(name: &str, value: &str) -> Result<Self> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| SecretCacheError::Config(format!("invalid header name: {e}")))?;
        let mut value = HeaderValue::from_str(value)
            .map_err(|e| SecretCacheError::Config(format!("invalid header value: {e}")))?;
        value.set_sensitive(true);
        Ok(Self { name, value })
    }
}

impl std::fmt::Debug for StaticHeaderSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticHeaderSigner").field("name", &self.name).finish_non_exhaustive()
    }
}

impl RequestSigner for StaticHeaderSigner {
    fn sign(&self, request: &mut Request) -> Result<()> {
        request.headers_mut().insert(self.name.clone(), self.value.clone());
        Ok(())
    }
}
