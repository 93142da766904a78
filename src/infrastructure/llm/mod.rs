//! LLM provider infrastructure
//!
//! - `openai_compat`: reqwest client for OpenAI-compatible chat endpoints
//! - `retry`: provider-level backoff for transient failures
//! - `cooldown`: shared per-provider rate-limit timers
//! - `failover`: primary/fallback routing state machine
//! - `facade`: builds providers from config and hands out routed models

pub mod cooldown;
pub mod facade;
pub mod failover;
pub mod openai_compat;
pub mod retry;

pub use cooldown::{ProviderCooldowns, ProviderSlot};
pub use facade::LlmFacade;
pub use failover::FailoverChatModel;
pub use openai_compat::OpenAiCompatibleProvider;
pub use retry::RetryPolicy;
