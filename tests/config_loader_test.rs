//! Configuration loading: file layering, environment overrides, key fallbacks.

mod common;

use std::io::Write;

use codementor::domain::models::config::{CacheBackend, MemoryPolicy};
use codementor::infrastructure::config::{ConfigLoader, FALLBACK_KEY_ENV, PRIMARY_KEY_ENV};
use codementor::{ConfigError, LlmFacade};

fn write_config(dir: &tempfile::TempDir, yaml: &str) -> std::path::PathBuf {
    let path = dir.path().join("config.yaml");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(yaml.as_bytes()).unwrap();
    path
}

#[test]
fn test_env_overrides_file() {
    let dir = common::temp_dir();
    let path = write_config(&dir, "workflow:\n  memory_k: 2\n  memory_policy: always\n");

    temp_env::with_vars(
        [
            ("CODEMENTOR_WORKFLOW__MEMORY_K", Some("5")),
            ("CODEMENTOR_LLM__PRIMARY__MODEL", Some("tiny-model")),
            (PRIMARY_KEY_ENV, None),
            (FALLBACK_KEY_ENV, None),
        ],
        || {
            let config = ConfigLoader::load_from_file(&path).unwrap();
            assert_eq!(config.workflow.memory_k, 5);
            assert_eq!(config.workflow.memory_policy, MemoryPolicy::Always);
            assert_eq!(config.llm.primary.model, "tiny-model");
            assert_eq!(config.cache.backend, CacheBackend::Local);
        },
    );
}

#[test]
fn test_provider_keys_fall_back_to_plain_env_vars() {
    let dir = common::temp_dir();
    let path = write_config(&dir, "logging:\n  level: warn\n");

    temp_env::with_vars(
        [
            (PRIMARY_KEY_ENV, Some("gsk_from_env")),
            (FALLBACK_KEY_ENV, None),
        ],
        || {
            let config = ConfigLoader::load_from_file(&path).unwrap();
            assert_eq!(config.llm.primary.api_key.as_deref(), Some("gsk_from_env"));
            assert!(config.llm.fallback.api_key.is_none());

            let facade = LlmFacade::from_config(&config.llm).unwrap();
            assert!(facade.has_primary());
            assert!(!facade.has_fallback());
        },
    );
}

#[test]
fn test_file_key_wins_over_env_fallback() {
    let dir = common::temp_dir();
    let path = write_config(&dir, "llm:\n  fallback:\n    api_key: AIza_from_file\n    base_url: http://localhost:1/v1\n    model: m\n");

    temp_env::with_vars(
        [(FALLBACK_KEY_ENV, Some("AIza_from_env")), (PRIMARY_KEY_ENV, None)],
        || {
            let config = ConfigLoader::load_from_file(&path).unwrap();
            assert_eq!(config.llm.fallback.api_key.as_deref(), Some("AIza_from_file"));
        },
    );
}

#[test]
fn test_no_credentials_is_a_facade_error_not_a_load_error() {
    let dir = common::temp_dir();
    let path = write_config(&dir, "cache:\n  backend: disabled\n");

    temp_env::with_vars(
        [(PRIMARY_KEY_ENV, None::<&str>), (FALLBACK_KEY_ENV, None)],
        || {
            let config = ConfigLoader::load_from_file(&path).unwrap();
            assert_eq!(config.cache.backend, CacheBackend::Disabled);
            assert!(matches!(
                LlmFacade::from_config(&config.llm),
                Err(ConfigError::NoLlmCredentials)
            ));
        },
    );
}

#[test]
fn test_invalid_env_value_fails_validation() {
    let dir = common::temp_dir();
    let path = write_config(&dir, "{}\n");

    temp_env::with_var("CODEMENTOR_LOGGING__LEVEL", Some("chatty"), || {
        let err = ConfigLoader::load_from_file(&path).unwrap_err();
        assert!(format!("{err:#}").contains("chatty"));
    });
}
