//! # secretcache Domain
//!
//! Data model shared by every secretcache crate.
//!
//! This crate contains:
//! - Secret and cache entry types (`SecretInfo`, `CacheEntry`)
//! - Region targets and credentials handed to backend calls
//! - Error taxonomy and `Result` alias
//! - Configuration structures and domain constants
//!
//! ## Architecture
//! - No dependencies on other secretcache crates
//! - Only external dependencies allowed
//! - Pure data structures, no I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
