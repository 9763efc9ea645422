//! Remote fetch with multi-region resilience

pub mod client;
pub mod ports;

pub use client::{ResilientFetchClient, ResilientFetchClientBuilder};
pub use ports::{ReachabilityProbe, RegionClient, RegionClientFactory, SecretBackend};
