//! Config save/load roundtrip integration tests.
//!
//! These tests verify that configuration can be serialized, written to disk,
//! and loaded back with identical field values.

use careline_core::config::{Config, ContextPolicy, LogFormat};
use careline_core::ConfigError;
use std::path::Path;
use tempfile::TempDir;

#[test]
fn test_config_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("careline.json5");

    let config = Config::default();
    config.save(&path).unwrap();

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded, config);
    assert_eq!(loaded.chat.model, "llama3-8b-8192");
    assert_eq!(loaded.embeddings.dimension, 384);
}

#[test]
fn test_config_modify_and_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("careline.json5");

    let mut config = Config::default();
    config.chat.context_policy = ContextPolicy::TruncateOldest;
    config.retry.max_retries = 0;
    config.logging.format = LogFormat::Json;
    config.save(&path).unwrap();

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded.chat.context_policy, ContextPolicy::TruncateOldest);
    assert_eq!(loaded.retry.max_retries, 0);
    assert_eq!(loaded.logging.format, LogFormat::Json);
}

#[test]
fn test_partial_json5_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("careline.json5");
    std::fs::write(
        &path,
        r#"{
            // only override what differs
            chat: { context_policy: "truncate_oldest", },
            retry: { max_retries: 4 },
        }"#,
    )
    .unwrap();

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded.chat.context_policy, ContextPolicy::TruncateOldest);
    assert_eq!(loaded.chat.model, Config::default().chat.model);
    assert_eq!(loaded.retry.max_retries, 4);
    assert_eq!(loaded.embeddings, Config::default().embeddings);
}

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let config = Config::load_or_default(&dir.path().join("absent.json5")).unwrap();
    assert_eq!(config.chat.temperature, Config::default().chat.temperature);
}

#[test]
fn test_config_load_nonexistent() {
    let result = Config::load(Path::new("/nonexistent/careline.json5"));
    assert!(matches!(result, Err(ConfigError::NotFound(_))));
}

#[test]
fn test_config_parse_invalid() {
    assert!(Config::parse("not valid json").is_err());
}

#[test]
fn test_invalid_values_fail_validation() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("careline.json5");
    std::fs::write(&path, "{ embeddings: { dimension: 0 }, chat: { max_tokens: 9000 } }").unwrap();

    let err = Config::load_or_default(&path).unwrap_err().to_string();
    assert!(err.contains("embeddings.dimension"), "{}", err);
    assert!(err.contains("max_tokens"), "{}", err);
}
