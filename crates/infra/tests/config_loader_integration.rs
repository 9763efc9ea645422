//! Integration tests for configuration loader
//!
//! Tests the end-to-end behavior of loading configuration from files.

use std::io::Write;
use std::path::PathBuf;

use secretcache_domain::{KmsVariant, SecretCacheError, StoreConfig};
use secretcache_infra::config;
use tempfile::NamedTempFile;

fn write_config(contents: &str, extension: &str) -> PathBuf {
    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(contents.as_bytes()).expect("Failed to write to temp file");
    let path = temp_file.path().with_extension(extension);
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");
    path
}

#[test]
fn test_load_full_toml_config() {
    let toml_content = r#"
stage = "ACSCurrent"
json_ttl_property = "refreshInterval"
wait_timeout_ms = 30000
probe_timeout_ms = 1500

[secret_ttls]
"prod/db" = 300000
"prod/api-key" = 60000

[store]
kind = "file"
path = "/var/cache/secretcache"
reload_on_start = true
salt = "0123456789abcdef"

[backoff]
max_attempts = 4
initial_interval_ms = 500
capacity_ms = 4000

[[regions]]
region_id = "cn-hangzhou"
vpc = true

[[regions]]
region_id = "kst-bj"
endpoint = "kst-bj.cryptoservice.kms.aliyuncs.com"
variant = "dedicated"
"#;

    let path = write_config(toml_content, "toml");
    let config = config::load_from_file(Some(path.clone())).expect("config loads");

    assert_eq!(config.json_ttl_property, "refreshInterval");
    assert_eq!(config.wait_timeout_ms, 30_000);
    assert_eq!(config.probe_timeout_ms, 1_500);
    assert_eq!(config.secret_ttls.get("prod/db"), Some(&300_000));
    assert_eq!(config.backoff.max_attempts, 4);
    assert_eq!(config.regions.len(), 2);
    assert!(config.regions[0].vpc);
    assert_eq!(config.regions[1].variant, KmsVariant::Dedicated);
    match config.store {
        StoreConfig::File { path, reload_on_start, salt } => {
            assert_eq!(path, PathBuf::from("/var/cache/secretcache"));
            assert!(reload_on_start);
            assert_eq!(salt, "0123456789abcdef");
        }
        other => panic!("expected file store, got {other:?}"),
    }

    std::fs::remove_file(path).ok();
}

#[test]
fn test_load_minimal_json_config_uses_defaults() {
    let path = write_config(r#"{ "regions": [{ "region_id": "cn-shanghai" }] }"#, "json");
    let config = config::load_from_file(Some(path.clone())).expect("config loads");

    assert_eq!(config.stage, "ACSCurrent");
    assert_eq!(config.json_ttl_property, "ttl");
    assert_eq!(config.store, StoreConfig::Memory);
    assert_eq!(config.wait_timeout_ms, 600_000);
    assert_eq!(config.backoff.initial_interval_ms, 2_000);

    std::fs::remove_file(path).ok();
}

#[test]
fn test_file_store_without_salt_is_rejected() {
    let path = write_config(
        r#"{ "regions": [{ "region_id": "cn-shanghai" }], "store": { "kind": "file", "salt": "" } }"#,
        "json",
    );

    let result = config::load_from_file(Some(path.clone()));
    assert!(matches!(result, Err(SecretCacheError::Config(msg)) if msg.contains("salt")));

    std::fs::remove_file(path).ok();
}

#[test]
fn test_invalid_toml_is_reported() {
    let path = write_config("[[regions]\nregion_id = ", "toml");

    let result = config::load_from_file(Some(path.clone()));
    assert!(matches!(result, Err(SecretCacheError::Config(msg)) if msg.contains("TOML")));

    std::fs::remove_file(path).ok();
}
