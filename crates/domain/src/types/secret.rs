//! Secret values and their cached representation
//!
//! Field names serialize in camelCase; the file-backed store writes these
//! structures verbatim (with the value replaced by its encrypted envelope).

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Declared encoding of a secret value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecretDataType {
    #[default]
    Text,
    Binary,
}

crate::impl_domain_enum_conversions!(SecretDataType {
    Text => "text",
    Binary => "binary",
});

/// One version of a named secret as returned by the remote service.
///
/// Immutable once fetched. `Clone` is a deep copy (including the byte
/// buffer), so a clone handed to the encrypting store never aliases the
/// in-memory copy.
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SecretInfo {
    pub secret_name: String,
    pub version_id: String,
    pub secret_value: String,
    pub secret_value_byte_buffer: Vec<u8>,
    pub secret_data_type: SecretDataType,
    pub create_time: String,
    pub secret_type: String,
    pub automatic_rotation: String,
    pub extended_config: String,
    pub rotation_interval: String,
    pub next_rotation_date: String,
}

impl SecretInfo {
    /// Text secret with the given name, version and value.
    pub fn text(
        secret_name: impl Into<String>,
        version_id: impl Into<String>,
        secret_value: impl Into<String>,
    ) -> Self {
        Self {
            secret_name: secret_name.into(),
            version_id: version_id.into(),
            secret_value: secret_value.into(),
            secret_data_type: SecretDataType::Text,
            ..Self::default()
        }
    }

    /// Binary secret; the value carries the service's text encoding of the bytes.
    pub fn binary(
        secret_name: impl Into<String>,
        version_id: impl Into<String>,
        secret_value: impl Into<String>,
    ) -> Self {
        Self { secret_data_type: SecretDataType::Binary, ..Self::text(secret_name, version_id, secret_value) }
    }

    pub fn is_automatic_rotation(&self) -> bool {
        self.automatic_rotation.eq_ignore_ascii_case("enabled")
    }
}

impl fmt::Debug for SecretInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretInfo")
            .field("secret_name", &self.secret_name)
            .field("version_id", &self.version_id)
            .field("secret_value", &"[REDACTED]")
            .field("secret_data_type", &self.secret_data_type)
            .field("create_time", &self.create_time)
            .field("secret_type", &self.secret_type)
            .field("automatic_rotation", &self.automatic_rotation)
            .field("rotation_interval", &self.rotation_interval)
            .field("next_rotation_date", &self.next_rotation_date)
            .finish_non_exhaustive()
    }
}

/// A fetched secret together with the stage it was fetched for and the
/// epoch-millisecond timestamp of that fetch.
///
/// `refresh_timestamp` is the sole basis for expiry decisions and never
/// decreases for a given secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub secret_info: SecretInfo,
    pub stage: String,
    pub refresh_timestamp: i64,
}

impl CacheEntry {
    pub fn new(secret_info: SecretInfo, stage: impl Into<String>, refresh_timestamp: i64) -> Self {
        Self { secret_info, stage: stage.into(), refresh_timestamp }
    }

    pub fn secret_name(&self) -> &str {
        &self.secret_info.secret_name
    }

    /// An entry is expired once strictly more than `ttl_ms` has elapsed.
    pub fn is_expired(&self, now_ms: i64, ttl_ms: i64) -> bool {
        now_ms.saturating_sub(self.refresh_timestamp) > ttl_ms
    }

    /// Get the refresh timestamp as `DateTime<Utc>`
    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.refresh_timestamp)
    }
}
