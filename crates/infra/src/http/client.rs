//! HTTP region client
//!
//! One client per region target. Calls `GetSecretValue` as a signed JSON POST
//! and classifies every failure into a [`BackendError`] so the fetch client
//! can decide between retrying and failing fast.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::header::{HeaderValue, CONTENT_TYPE, USER_AGENT as USER_AGENT_HEADER};
use reqwest::{Client as ReqwestClient, Method, Request};
use secretcache_common::user_agent_registry;
use secretcache_core::RegionClient;
use secretcache_domain::constants::{PROJECT_VERSION, USER_AGENT};
use secretcache_domain::{
    BackendError, BackendErrorKind, GetSecretValueRequest, KmsVariant, RegionTarget, Result,
    SecretCacheError, SecretInfo,
};
use sha2::{Digest, Sha256};
use tracing::{debug, instrument, warn};
use url::Url;

use super::signer::RequestSigner;
use super::wire::{GetSecretValueBody, GetSecretValueResponse, ServiceErrorBody};
use crate::errors::{classify_status, classify_transport};

pub const HEADER_REQUEST_ID: &str = "x-acs-request-id";
pub const HEADER_ACTION: &str = "x-acs-action";
pub const HEADER_VERSION: &str = "x-acs-version";
pub const HEADER_CONTENT_SHA256: &str = "x-acs-content-sha256";

const STANDARD_API_VERSION: &str = "2016-01-20";
const DEDICATED_API_VERSION: &str = "dkms-gcs-0.2";

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Base URL for a target: the endpoint as given when it carries a scheme,
/// otherwise `https://<endpoint>/`.
pub fn endpoint_url(target: &RegionTarget) -> Result<Url> {
    let endpoint = target.resolved_endpoint();
    let raw = if endpoint.contains("://") { endpoint } else { format!("https://{endpoint}/") };
    Url::parse(&raw)
        .map_err(|e| SecretCacheError::Config(format!("invalid endpoint for {}: {e}", target.region_id)))
}

fn user_agent_header() -> String {
    user_agent_registry()
        .header_value()
        .unwrap_or_else(|| format!("{USER_AGENT}/{PROJECT_VERSION}"))
}

/// [`RegionClient`] speaking JSON over HTTP.
pub struct HttpRegionClient {
    client: ReqwestClient,
    url: Url,
    region_id: String,
    variant: KmsVariant,
    signer: Arc<dyn RequestSigner>,
}

impl HttpRegionClient {
    /// Build a client for `target` posting to `url`.
    ///
    /// # Errors
    /// Returns `SecretCacheError::Config` if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(
        target: &RegionTarget,
        url: Url,
        signer: Arc<dyn RequestSigner>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .no_proxy()
            .build()
            .map_err(|e| SecretCacheError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            url,
            region_id: target.region_id.clone(),
            variant: target.variant,
            signer,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    fn api_version(&self) -> &'static str {
        match self.variant {
            KmsVariant::Standard => STANDARD_API_VERSION,
            KmsVariant::Dedicated => DEDICATED_API_VERSION,
        }
    }

    fn build_request(&self, request: &GetSecretValueRequest) -> std::result::Result<Request, BackendError> {
        let body = serde_json::to_vec(&GetSecretValueBody::new(request)).map_err(|e| {
            BackendError::new(BackendErrorKind::InvalidRequest, "SDK.InvalidRequest", e.to_string())
        })?;
        let digest = BASE64.encode(Sha256::digest(&body));

        let mut http_request = self
            .client
            .request(Method::POST, self.url.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(USER_AGENT_HEADER, user_agent_header())
            .header(HEADER_REQUEST_ID, uuid::Uuid::new_v4().to_string())
            .header(HEADER_ACTION, super::wire::ACTION_GET_SECRET_VALUE)
            .header(HEADER_VERSION, self.api_version())
            .header(HEADER_CONTENT_SHA256, digest)
            .body(body)
            .build()
            .map_err(|e| classify_transport(&e))?;

        self.signer.sign(&mut http_request).map_err(|e| {
            BackendError::new(BackendErrorKind::Unauthorized, "SDK.SignatureFailure", e.to_string())
        })?;
        Ok(http_request)
    }
}

#[async_trait]
impl RegionClient for HttpRegionClient {
    #[instrument(skip(self, request), fields(region_id = %self.region_id, secret_name = %request.secret_name))]
    async fn get_secret_value(
        &self,
        request: &GetSecretValueRequest,
    ) -> std::result::Result<SecretInfo, BackendError> {
        let http_request = self.build_request(request)?;
        let request_id = http_request
            .headers()
            .get(HEADER_REQUEST_ID)
            .and_then(|v: &HeaderValue| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        debug!(request_id = %request_id, url = %self.url, "Sending GetSecretValue");

        let response = self.client.execute(http_request).await.map_err(|e| {
            let err = classify_transport(&e);
            warn!(request_id = %request_id, error = %err, "GetSecretValue transport failure");
            err
        })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| classify_transport(&e))?;

        if status.is_success() {
            let body: GetSecretValueResponse = serde_json::from_slice(&bytes).map_err(|e| {
                BackendError::new(BackendErrorKind::Unknown, "SDK.InvalidResponse", e.to_string())
            })?;
            debug!(request_id = %request_id, %status, "GetSecretValue succeeded");
            return Ok(body.into_secret_info());
        }

        let err = match serde_json::from_slice::<ServiceErrorBody>(&bytes) {
            Ok(body) if !body.code.is_empty() => BackendError::from_code(body.code, body.message),
            _ => classify_status(status),
        };
        warn!(request_id = %request_id, %status, code = %err.code, kind = %err.kind, "GetSecretValue rejected");
        Err(err)
    }
}
