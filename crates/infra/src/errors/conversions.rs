//! Conversions from external infrastructure errors into domain errors.

use reqwest::{Error as HttpError, StatusCode};
use secretcache_common::CommonError;
use secretcache_domain::constants::ERROR_CODE_THROTTLING;
use secretcache_domain::{BackendError, BackendErrorKind, SecretCacheError};

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub SecretCacheError);

impl From<InfraError> for SecretCacheError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<SecretCacheError> for InfraError {
    fn from(value: SecretCacheError) -> Self {
        InfraError(value)
    }
}

/* -------------------------------------------------------------------------- */
/* CommonError → SecretCacheError */
/* -------------------------------------------------------------------------- */

impl From<CommonError> for InfraError {
    fn from(value: CommonError) -> Self {
        let mapped = match value {
            CommonError::Crypto { message } => SecretCacheError::Crypto(message),
            err @ (CommonError::Validation { .. } | CommonError::Serialization { .. }) => {
                SecretCacheError::Format(err.to_string())
            }
            err @ CommonError::Config { .. } => SecretCacheError::Config(err.to_string()),
            err @ CommonError::Internal { .. } => SecretCacheError::Internal(err.to_string()),
        };
        InfraError(mapped)
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → BackendError */
/* -------------------------------------------------------------------------- */

/// Classify an HTTP status that came back without a service error code.
pub fn classify_status(status: StatusCode) -> BackendError {
    let code = status.as_u16();
    let message = format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

    match code {
        429 => BackendError::new(BackendErrorKind::Throttled, ERROR_CODE_THROTTLING, message),
        401 | 403 => BackendError::new(BackendErrorKind::Unauthorized, format!("HTTP{code}"), message),
        404 => BackendError::new(BackendErrorKind::NotFound, format!("HTTP{code}"), message),
        400..=499 => BackendError::new(BackendErrorKind::InvalidRequest, format!("HTTP{code}"), message),
        502..=504 => BackendError::new(BackendErrorKind::ServiceUnavailable, format!("HTTP{code}"), message),
        500..=599 => BackendError::new(BackendErrorKind::InternalFailure, format!("HTTP{code}"), message),
        _ => BackendError::new(BackendErrorKind::Unknown, format!("HTTP{code}"), message),
    }
}

/// Classify a transport failure. Timeouts and connection failures are
/// recoverable; the region race relies on that.
pub fn classify_transport(err: &HttpError) -> BackendError {
    if err.is_timeout() {
        return BackendError::timeout(format!("HTTP request timed out: {err}"));
    }

    #[cfg(not(target_arch = "wasm32"))]
    if err.is_connect() {
        return BackendError::unreachable(format!("HTTP connection failure: {err}"));
    }

    if let Some(status) = err.status() {
        return classify_status(status);
    }

    if err.is_decode() || err.is_body() {
        return BackendError::new(BackendErrorKind::Unknown, "SDK.InvalidResponse", err.to_string());
    }

    BackendError::unreachable(err.to_string())
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(SecretCacheError::Backend(classify_transport(&value)))
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
