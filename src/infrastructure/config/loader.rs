//! Layered configuration loading and validation.

use std::path::Path;

use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use thiserror::Error;

use crate::domain::models::config::{CacheBackend, Config};

/// Environment variable consulted when `llm.primary.api_key` is unset.
pub const PRIMARY_KEY_ENV: &str = "PRIMARY_LLM_API_KEY";
/// Environment variable consulted when `llm.fallback.api_key` is unset.
pub const FALLBACK_KEY_ENV: &str = "FALLBACK_LLM_API_KEY";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "No LLM credentials configured. Set {PRIMARY_KEY_ENV} and/or {FALLBACK_KEY_ENV} \
         (or llm.primary.api_key / llm.fallback.api_key)"
    )]
    /// Neither provider has an API key.
    NoLlmCredentials,

    /// Unknown log level.
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    /// Unknown log format.
    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    /// Unknown rotation policy.
    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidRotation(String),

    /// Zero cache TTL.
    #[error("Invalid default_ttl_secs: {0}. Must be positive")]
    InvalidTtl(u64),

    /// `memory_k` out of range.
    #[error("Invalid memory_k: {0}. Must be between 1 and 10")]
    InvalidMemoryK(usize),

    /// Context budget too small.
    #[error("Invalid max_context_chars: {0}. Must be at least 500")]
    InvalidContextBudget(usize),

    /// Too many retries.
    #[error("Invalid max_retries: {0}. Must be at most 5")]
    InvalidMaxRetries(u32),

    /// Zero request timeout.
    #[error("Invalid timeout_secs: {0}. Must be positive")]
    InvalidTimeout(u64),

    #[error(
        "Invalid backoff configuration: initial_backoff_ms ({0}) must be less than max_backoff_ms ({1})"
    )]
    /// Initial backoff not below the maximum.
    InvalidBackoff(u64, u64),

    /// Remote cache selected without a URL.
    #[error("cache.backend is 'remote' but cache.redis_url is not set")]
    MissingRedisUrl,

    /// Figment extraction failed.
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .codementor/config.yaml (project config)
    /// 3. .codementor/local.yaml (local overrides, optional)
    /// 4. Environment variables (CODEMENTOR_* prefix, `__` separates sections)
    ///
    /// Provider keys additionally fall back to `PRIMARY_LLM_API_KEY` and
    /// `FALLBACK_LLM_API_KEY`.
    pub fn load() -> Result<Config> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".codementor/config.yaml"))
            .merge(Yaml::file(".codementor/local.yaml"))
            .merge(Env::prefixed("CODEMENTOR_").split("__"));

        Self::finish(figment).context("Failed to extract configuration from figment")
    }

    /// Load configuration from a specific file, still honouring env overrides
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }
        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed("CODEMENTOR_").split("__"));

        Self::finish(figment).context(format!("Failed to load config from {}", path.display()))
    }

    /// Load from `path` when given, otherwise from the standard locations
    pub fn load_with(path: Option<&Path>) -> Result<Config> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Self::load(),
        }
    }

    fn finish(figment: Figment) -> Result<Config> {
        let mut config: Config = figment.extract()?;
        Self::apply_key_fallbacks(&mut config);
        Self::validate(&config)?;
        Ok(config)
    }

    fn apply_key_fallbacks(config: &mut Config) {
        if !config.llm.primary.has_credentials() {
            if let Ok(key) = std::env::var(PRIMARY_KEY_ENV) {
                config.llm.primary.api_key = Some(key);
            }
        }
        if !config.llm.fallback.has_credentials() {
            if let Ok(key) = std::env::var(FALLBACK_KEY_ENV) {
                config.llm.fallback.api_key = Some(key);
            }
        }
    }

    /// Validate configuration after loading
    ///
    /// Credentials are not checked here; the LLM facade raises
    /// [`ConfigError::NoLlmCredentials`] when it is constructed, so commands
    /// that never call a model still run without keys.
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        // Logging
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidRotation(config.logging.rotation.clone()));
        }

        // Cache
        if config.cache.default_ttl_secs == 0 {
            return Err(ConfigError::InvalidTtl(config.cache.default_ttl_secs));
        }

        if config.cache.backend == CacheBackend::Remote && config.cache.redis_url.is_none() {
            return Err(ConfigError::MissingRedisUrl);
        }

        if config.cache.backend == CacheBackend::Local && config.cache.local_dir.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "cache.local_dir cannot be empty".to_string(),
            ));
        }

        // Workflow
        if !(1..=10).contains(&config.workflow.memory_k) {
            return Err(ConfigError::InvalidMemoryK(config.workflow.memory_k));
        }

        if config.workflow.max_context_chars < 500 {
            return Err(ConfigError::InvalidContextBudget(
                config.workflow.max_context_chars,
            ));
        }

        // LLM
        if config.llm.max_retries > 5 {
            return Err(ConfigError::InvalidMaxRetries(config.llm.max_retries));
        }

        if config.llm.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout(config.llm.timeout_secs));
        }

        if config.llm.initial_backoff_ms >= config.llm.max_backoff_ms {
            return Err(ConfigError::InvalidBackoff(
                config.llm.initial_backoff_ms,
                config.llm.max_backoff_ms,
            ));
        }

        for (role, provider) in [("primary", &config.llm.primary), ("fallback", &config.llm.fallback)] {
            if provider.base_url.trim().is_empty() {
                return Err(ConfigError::ValidationFailed(format!(
                    "llm.{role}.base_url cannot be empty"
                )));
            }
            if provider.model.trim().is_empty() {
                return Err(ConfigError::ValidationFailed(format!(
                    "llm.{role}.model cannot be empty"
                )));
            }
        }

        Ok(())
    }
}
