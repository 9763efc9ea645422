//! Configuration loader
//!
//! Loads [`CacheClientConfig`] from a JSON or TOML file.
//!
//! ## Loading Strategy
//! 1. `SECRETCACHE_CONFIG`, when set, names the file to load
//! 2. Otherwise probes the standard locations below
//! 3. Format is chosen by file extension (`.json` or `.toml`)
//! 4. The parsed configuration is validated before it is returned
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./secretcache.toml` or `./secretcache.json` (current working directory)
//! 2. `../secretcache.toml` or `../secretcache.json` (parent directory)
//! 3. Next to the executable

use std::path::{Path, PathBuf};

use secretcache_domain::{CacheClientConfig, Result, SecretCacheError};

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "SECRETCACHE_CONFIG";

const FILE_STEMS: [&str; 2] = ["secretcache.toml", "secretcache.json"];

/// Load configuration from `SECRETCACHE_CONFIG` or the standard locations
///
/// # Errors
/// Returns `SecretCacheError::Config` if:
/// - No configuration file can be found
/// - File format is invalid
/// - The configuration fails validation
pub fn load() -> Result<CacheClientConfig> {
    match std::env::var(CONFIG_PATH_ENV) {
        Ok(path) if !path.is_empty() => {
            tracing::info!(env = CONFIG_PATH_ENV, path = %path, "Configuration path taken from environment");
            load_from_file(Some(PathBuf::from(path)))
        }
        _ => load_from_file(None),
    }
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
///
/// # Arguments
/// * `path` - Optional path to config file. If `None`, uses
///   [`probe_config_paths`].
///
/// # Errors
/// Returns `SecretCacheError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - The configuration fails validation
pub fn load_from_file(path: Option<PathBuf>) -> Result<CacheClientConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(SecretCacheError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            SecretCacheError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| SecretCacheError::Config(format!("Failed to read config file: {}", e)))?;

    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
///
/// # Errors
/// Returns `SecretCacheError::Config` if format is invalid or parsing fails.
fn parse_config(contents: &str, path: &Path) -> Result<CacheClientConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| SecretCacheError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| SecretCacheError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(SecretCacheError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe the standard locations for a configuration file
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd.clone());
        dirs.push(cwd.join(".."));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.push(exe_dir.to_path_buf());
        }
    }

    dirs.iter()
        .flat_map(|dir| FILE_STEMS.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}
