//! Default refresh strategy
//!
//! Reads an optional TTL from a named property of a JSON secret payload,
//! e.g. `{"user": "app", "password": "...", "ttl": 300000}`.

use std::sync::Arc;

use secretcache_common::Clock;
use secretcache_domain::{CacheEntry, SecretInfo};
use serde_json::Value;
use tracing::debug;

use super::ports::RefreshStrategy;

pub struct DefaultRefreshStrategy {
    json_ttl_property: String,
    clock: Arc<dyn Clock>,
}

impl DefaultRefreshStrategy {
    /// An empty `json_ttl_property` disables payload TTLs.
    pub fn new(json_ttl_property: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        Self { json_ttl_property: json_ttl_property.into(), clock }
    }
}

impl RefreshStrategy for DefaultRefreshStrategy {
    fn next_execute_time(&self, _secret_name: &str, ttl_ms: i64, offset_ms: i64) -> i64 {
        let now = self.clock.now_millis();
        let due = offset_ms.saturating_add(ttl_ms);
        if due > now {
            due
        } else {
            now.saturating_add(ttl_ms)
        }
    }

    fn parse_next_execute_time(&self, entry: &CacheEntry) -> Option<i64> {
        let ttl = self.parse_ttl(&entry.secret_info)?;
        Some(self.next_execute_time(entry.secret_name(), ttl, entry.refresh_timestamp))
    }

    fn parse_ttl(&self, secret: &SecretInfo) -> Option<i64> {
        if self.json_ttl_property.is_empty() {
            return None;
        }
        let payload: Value = match serde_json::from_str(&secret.secret_value) {
            Ok(payload) => payload,
            Err(err) => {
                debug!(secret_name = %secret.secret_name, error = %err, "secret value is not JSON, no embedded ttl");
                return None;
            }
        };
        let ttl = payload.get(&self.json_ttl_property)?;
        let ttl = ttl.as_i64().or_else(|| {
            // 300000.0 is accepted; 1.5 is not
            ttl.as_f64().filter(|v| v.fract() == 0.0 && v.abs() < i64::MAX as f64).map(|v| v as i64)
        })?;
        (ttl > 0).then_some(ttl)
    }
}
