//! TCP reachability probe
//!
//! Latency is the time to complete a TCP handshake with the target's
//! endpoint. Anything that fails or exceeds the timeout is unreachable.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use secretcache_core::ReachabilityProbe;
use secretcache_domain::constants::{DEFAULT_ENDPOINT_PORT, DEFAULT_PROBE_TIMEOUT_MS};
use secretcache_domain::RegionTarget;
use tokio::net::TcpStream;
use tracing::debug;

use crate::http::endpoint_url;

#[derive(Debug, Clone)]
pub struct TcpProbe {
    timeout: Duration,
}

impl Default for TcpProbe {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_PROBE_TIMEOUT_MS))
    }
}

impl TcpProbe {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl ReachabilityProbe for TcpProbe {
    async fn probe(&self, target: &RegionTarget) -> Option<f64> {
        let url = endpoint_url(target).ok()?;
        let host = url.host_str()?.to_string();
        let port = url.port_or_known_default().unwrap_or(DEFAULT_ENDPOINT_PORT);

        let started = Instant::now();
        match tokio::time::timeout(self.timeout, TcpStream::connect((host.as_str(), port))).await {
            Ok(Ok(_stream)) => {
                let latency_ms = started.elapsed().as_secs_f64() * 1000.0;
                debug!(region_id = %target.region_id, %host, port, latency_ms, "Probe connected");
                Some(latency_ms)
            }
            Ok(Err(err)) => {
                debug!(region_id = %target.region_id, %host, port, error = %err, "Probe failed");
                None
            }
            Err(_) => {
                debug!(region_id = %target.region_id, %host, port, "Probe timed out");
                None
            }
        }
    }
}
