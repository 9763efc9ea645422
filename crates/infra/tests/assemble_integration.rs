//! End-to-end assembly from configuration against a mock service

use std::collections::HashMap;
use std::sync::Arc;

use secretcache_domain::{
    BackoffConfig, CacheClientConfig, Credential, RegionTarget, Result, SecretCacheError, StoreConfig,
};
use secretcache_infra::{from_config, FileStore, RequestSigner, StaticHeaderSigner, VariantClientFactory};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn factory() -> Arc<VariantClientFactory> {
    Arc::new(VariantClientFactory::new(Arc::new(
        |_: &RegionTarget, _: Option<&Credential>| -> Result<Arc<dyn RequestSigner>> {
            Ok(Arc::new(StaticHeaderSigner::new("authorization", "Bearer test-token")?))
        },
    )))
}

fn config(server: &MockServer, dir: &TempDir) -> CacheClientConfig {
    CacheClientConfig {
        secret_ttls: HashMap::from([("db".to_string(), 60_000)]),
        store: StoreConfig::File {
            path: dir.path().to_path_buf(),
            reload_on_start: false,
            salt: "pepper".into(),
        },
        regions: vec![RegionTarget::new("mock").with_endpoint(server.uri())],
        backoff: BackoffConfig { max_attempts: 2, initial_interval_ms: 5, capacity_ms: 10 },
        wait_timeout_ms: 5_000,
        ..Default::default()
    }
}

async fn mount_secret(server: &MockServer, name: &str, value: &str) {
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "SecretName": name })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "SecretName": name,
            "VersionId": "v1",
            "SecretData": value,
            "SecretDataType": "text"
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_preloads_and_persists_configured_secrets() {
    let server = MockServer::start().await;
    mount_secret(&server, "db", r#"{"password":"s3cret"}"#).await;
    let dir = TempDir::new().unwrap();

    let client = from_config(&config(&server, &dir), Some(Credential::access_key("id", "secret")), factory())
        .await
        .expect("client assembles");

    let preload_requests = server.received_requests().await.unwrap().len();
    assert_eq!(preload_requests, 1);
    assert!(dir.path().join("db").join("stage_acscurrent.json").exists());

    // Served from the cache, not the service.
    assert_eq!(client.get_string_value("db").await.unwrap(), r#"{"password":"s3cret"}"#);
    assert_eq!(server.received_requests().await.unwrap().len(), preload_requests);

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_restart_with_reload_reads_encrypted_cache() {
    let server = MockServer::start().await;
    mount_secret(&server, "db", "first-run").await;
    let dir = TempDir::new().unwrap();

    let mut cfg = config(&server, &dir);
    let first = from_config(&cfg, Some(Credential::access_key("id", "secret")), factory()).await.unwrap();
    first.close().await.unwrap();

    let raw = std::fs::read_to_string(dir.path().join("db").join("stage_acscurrent.json")).unwrap();
    assert!(!raw.contains("first-run"));

    let reader = FileStore::new(dir.path(), true, "pepper").unwrap();
    let restored = secretcache_core::StoreStrategy::get_cache_entry(&reader, "db").await.unwrap();
    assert_eq!(restored.secret_info.secret_value, "first-run");

    cfg.store = StoreConfig::File { path: dir.path().to_path_buf(), reload_on_start: true, salt: "pepper".into() };
    let second = from_config(&cfg, Some(Credential::access_key("id", "secret")), factory()).await.unwrap();
    assert_eq!(second.get_string_value("db").await.unwrap(), "first-run");
    second.close().await.unwrap();
}

#[tokio::test]
async fn test_standard_target_without_credential_is_rejected() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let result = from_config(&config(&server, &dir), None, factory()).await;

    assert!(matches!(result, Err(SecretCacheError::Config(_))));
}

#[tokio::test]
async fn test_invalid_config_is_rejected_before_any_request() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let mut cfg = config(&server, &dir);
    cfg.regions.clear();

    let result = from_config(&cfg, Some(Credential::access_key("id", "secret")), factory()).await;

    assert!(matches!(result, Err(SecretCacheError::Config(_))));
    assert!(server.received_requests().await.unwrap().is_empty());
}
