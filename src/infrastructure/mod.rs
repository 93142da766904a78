//! Infrastructure layer
//!
//! Concrete implementations behind the domain ports:
//! - config: figment-based configuration loading and validation
//! - logging: tracing subscriber setup
//! - llm: chat providers, cool-downs and failover routing

pub mod config;
pub mod llm;
pub mod logging;
