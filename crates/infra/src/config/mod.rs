//! Configuration loading
//!
//! Reads [`CacheClientConfig`](secretcache_domain::CacheClientConfig) from
//! JSON or TOML files.

pub mod loader;

// Re-export commonly used items
pub use loader::{load, load_from_file, probe_config_paths, CONFIG_PATH_ENV};
