//! Configuration management infrastructure
//!
//! Hierarchical configuration using figment:
//! - YAML file loading
//! - Environment variable overrides
//! - Provider key fallbacks
//! - Configuration validation

pub mod loader;

pub use loader::{ConfigError, ConfigLoader, FALLBACK_KEY_ENV, PRIMARY_KEY_ENV};
