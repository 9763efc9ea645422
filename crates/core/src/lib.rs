//! # secretcache Core
//!
//! Caching and fetch orchestration - no I/O adapters.
//!
//! This crate contains:
//! - Port interfaces (traits) for stores, backends, region clients, probes,
//!   refresh strategies and cache hooks
//! - In-memory store, default refresh strategy and default hook
//! - The multi-region resilient fetch client
//! - The cache client with per-key locking and background refresh
//!
//! ## Architecture Principles
//! - Only depends on `secretcache-common` and `secretcache-domain`
//! - No filesystem, socket or HTTP code
//! - All external collaborators via traits

pub mod cache;
pub mod fetch;
pub mod hook;
pub mod refresh;
pub mod store;

pub use cache::{CacheClient, CacheClientBuilder};
pub use fetch::ports::{ReachabilityProbe, RegionClient, RegionClientFactory, SecretBackend};
pub use fetch::{ResilientFetchClient, ResilientFetchClientBuilder};
pub use hook::ports::CacheHook;
pub use hook::DefaultCacheHook;
pub use refresh::ports::RefreshStrategy;
pub use refresh::DefaultRefreshStrategy;
pub use store::ports::StoreStrategy;
pub use store::MemoryStore;
