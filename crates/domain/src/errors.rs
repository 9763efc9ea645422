//! Error types used throughout secretcache
//!
//! Two layers:
//! - [`BackendError`]: a classified failure reported by a single remote call.
//!   Its [`BackendErrorKind`] decides whether the fetch client retries, races
//!   other regions, or fails fast.
//! - [`SecretCacheError`]: the caller-facing error of every cache operation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    ERROR_CODE_INTERNAL_FAILURE, ERROR_CODE_IN_DEBT, ERROR_CODE_IN_DEBT_OVERDUE,
    ERROR_CODE_NOT_FOUND, ERROR_CODE_READ_TIMEOUT, ERROR_CODE_SERVER_UNREACHABLE,
    ERROR_CODE_SERVICE_UNAVAILABLE, ERROR_CODE_THROTTLING, ERROR_CODE_TIMEOUT,
};
use crate::types::SecretDataType;

/// Classification of a failed backend call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BackendErrorKind {
    /// Socket or read timeout.
    Timeout,
    /// Host unreachable, DNS failure, bad gateway.
    Unreachable,
    /// Request rejected by service-side rate limiting.
    Throttled,
    /// Service temporarily unavailable.
    ServiceUnavailable,
    /// Transient internal failure of the service.
    InternalFailure,
    /// Authentication or permission failure.
    Unauthorized,
    /// Account is in debt; calls are refused until settled.
    Billing,
    /// Malformed or rejected request parameters.
    InvalidRequest,
    /// The secret or stage does not exist.
    NotFound,
    /// Anything the classifier does not recognize.
    Unknown,
}

crate::impl_domain_enum_conversions!(BackendErrorKind {
    Timeout => "timeout",
    Unreachable => "unreachable",
    Throttled => "throttled",
    ServiceUnavailable => "service_unavailable",
    InternalFailure => "internal_failure",
    Unauthorized => "unauthorized",
    Billing => "billing",
    InvalidRequest => "invalid_request",
    NotFound => "not_found",
    Unknown => "unknown",
});

/// A classified failure returned by a region client.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("backend {kind} error [{code}]: {message}")]
pub struct BackendError {
    pub kind: BackendErrorKind,
    pub code: String,
    pub message: String,
}

impl BackendError {
    pub fn new(kind: BackendErrorKind, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self { kind, code: code.into(), message: message.into() }
    }

    /// Build an error from a service error code, classifying it on the way.
    pub fn from_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        let code = code.into();
        let kind = classify_code(&code);
        Self { kind, code, message: message.into() }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::Timeout, ERROR_CODE_TIMEOUT, message)
    }

    pub fn unreachable(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::Unreachable, ERROR_CODE_SERVER_UNREACHABLE, message)
    }

    /// Whether the failure is transient and eligible for retry and region racing.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.kind,
            BackendErrorKind::Timeout
                | BackendErrorKind::Unreachable
                | BackendErrorKind::Throttled
                | BackendErrorKind::ServiceUnavailable
                | BackendErrorKind::InternalFailure
        )
    }

    /// Whether the service asked us to slow down rather than the network failing.
    pub fn needs_backoff(&self) -> bool {
        matches!(
            self.kind,
            BackendErrorKind::Throttled
                | BackendErrorKind::ServiceUnavailable
                | BackendErrorKind::InternalFailure
        )
    }

    pub fn is_billing(&self) -> bool {
        self.kind == BackendErrorKind::Billing
    }
}

fn classify_code(code: &str) -> BackendErrorKind {
    match code {
        ERROR_CODE_THROTTLING => BackendErrorKind::Throttled,
        ERROR_CODE_SERVICE_UNAVAILABLE => BackendErrorKind::ServiceUnavailable,
        ERROR_CODE_INTERNAL_FAILURE => BackendErrorKind::InternalFailure,
        ERROR_CODE_READ_TIMEOUT | ERROR_CODE_TIMEOUT => BackendErrorKind::Timeout,
        ERROR_CODE_SERVER_UNREACHABLE => BackendErrorKind::Unreachable,
        ERROR_CODE_IN_DEBT | ERROR_CODE_IN_DEBT_OVERDUE => BackendErrorKind::Billing,
        ERROR_CODE_NOT_FOUND => BackendErrorKind::NotFound,
        c if c.starts_with("Forbidden") || c.starts_with("InvalidAccessKeyId") => {
            BackendErrorKind::Unauthorized
        }
        c if c.starts_with("Invalid") || c.starts_with("MissingParameter") => {
            BackendErrorKind::InvalidRequest
        }
        _ => BackendErrorKind::Unknown,
    }
}

/// Main error type for secretcache
#[derive(Error, Debug)]
pub enum SecretCacheError {
    #[error("the argument secret_name must not be empty")]
    EmptyName,

    #[error("secret [{name}] does not hold a {expected} value (declared {actual})")]
    DataTypeMismatch { name: String, expected: SecretDataType, actual: SecretDataType },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Invalid cache format: {0}")]
    Format(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Crypto error: {0}")]
    Crypto(String),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("all region fetch attempts failed: {}", .errors.join("; "))]
    RetriesExhausted { errors: Vec<String> },

    #[error("fetch did not complete within {timeout_ms}ms")]
    WaitTimeout { timeout_ms: u64 },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not initialized: {0}")]
    NotInitialized(String),

    #[error("client has been closed")]
    Closed,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SecretCacheError {
    /// Whether every remote option was used up by transient failures, which is
    /// the condition for consulting the disaster-recovery hook.
    pub fn needs_recovery(&self) -> bool {
        match self {
            Self::Backend(e) => e.is_recoverable(),
            Self::RetriesExhausted { .. } | Self::WaitTimeout { .. } => true,
            _ => false,
        }
    }

    /// Whether this is a non-recoverable classification from the remote service.
    pub fn is_fatal_backend(&self) -> bool {
        matches!(self, Self::Backend(e) if !e.is_recoverable())
    }
}

impl From<serde_json::Error> for SecretCacheError {
    fn from(err: serde_json::Error) -> Self {
        Self::Format(err.to_string())
    }
}

/// Result type alias for secretcache operations
pub type Result<T> = std::result::Result<T, SecretCacheError>;
