//! # secretcache Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - Encrypted file-backed store
//! - HTTP region client and the variant-dispatching client factory
//! - TCP reachability probe
//! - Configuration loading (JSON / TOML)
//! - Tracing bootstrap
//!
//! ## Architecture
//! - Implements traits defined in `secretcache-core`
//! - Depends on `secretcache-common`, `secretcache-domain` and `secretcache-core`
//! - Contains all "impure" code (filesystem, sockets, HTTP)

pub mod assemble;
pub mod config;
pub mod errors;
pub mod http;
pub mod probe;
pub mod store;
pub mod telemetry;

// Re-export commonly used items
pub use assemble::from_config;
pub use errors::InfraError;
pub use http::{HttpRegionClient, RequestSigner, SignerProvider, StaticHeaderSigner, VariantClientFactory};
pub use probe::TcpProbe;
pub use store::FileStore;
pub use telemetry::init_tracing;
