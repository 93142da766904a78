//! Entry point for obtaining failover chat models.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use super::cooldown::ProviderCooldowns;
use super::failover::FailoverChatModel;
use super::openai_compat::OpenAiCompatibleProvider;
use crate::domain::models::config::{LlmConfig, ProviderConfig};
use crate::domain::ports::{ChatModel, ChatModelFactory, ChatProvider};
use crate::infrastructure::config::ConfigError;

/// Entry point for obtaining chat models.
///
/// Holds whichever providers have credentials plus the shared cool-down
/// timers. Every model it hands out routes through the same timers.
#[derive(Clone)]
pub struct LlmFacade {
    primary: Option<Arc<dyn ChatProvider>>,
    fallback: Option<Arc<dyn ChatProvider>>,
    cooldowns: Arc<ProviderCooldowns>,
}

impl LlmFacade {
    /// Assemble from already-built providers. At least one is required.
    pub fn new(
        primary: Option<Arc<dyn ChatProvider>>,
        fallback: Option<Arc<dyn ChatProvider>>,
        cooldowns: Arc<ProviderCooldowns>,
    ) -> Result<Self, ConfigError> {
        if primary.is_none() && fallback.is_none() {
            return Err(ConfigError::NoLlmCredentials);
        }
        Ok(Self {
            primary,
            fallback,
            cooldowns,
        })
    }

    /// Build OpenAI-compatible providers for every role with a credential.
    pub fn from_config(config: &LlmConfig) -> Result<Self, ConfigError> {
        let cooldowns = Arc::new(ProviderCooldowns::new(
            Duration::from_secs(config.primary_cooldown_secs),
            Duration::from_secs(config.fallback_cooldown_secs),
        ));

        let build = |role: &str,
                     provider: &ProviderConfig|
         -> Result<Option<Arc<dyn ChatProvider>>, ConfigError> {
            if !provider.has_credentials() {
                return Ok(None);
            }
            let built = OpenAiCompatibleProvider::new(role, provider, config)
                .map_err(|e| ConfigError::ValidationFailed(e.to_string()))?;
            Ok(Some(Arc::new(built) as Arc<dyn ChatProvider>))
        };

        let primary = build("primary", &config.primary)?;
        let fallback = build("fallback", &config.fallback)?;

        info!(
            primary = primary.is_some(),
            fallback = fallback.is_some(),
            "LLM facade initialized"
        );
        if primary.is_none() || fallback.is_none() {
            info!("running in single-provider mode");
        }

        Self::new(primary, fallback, cooldowns)
    }

    /// Shared cool-down tracker.
    pub fn cooldowns(&self) -> &Arc<ProviderCooldowns> {
        &self.cooldowns
    }

    /// Whether a primary provider is configured.
    pub const fn has_primary(&self) -> bool {
        self.primary.is_some()
    }

    /// Whether a fallback provider is configured.
    pub const fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// Concrete routed model, exposing the blocking path as well.
    pub fn chat_model(&self, temperature: f32) -> FailoverChatModel {
        FailoverChatModel::new(
            self.primary.clone(),
            self.fallback.clone(),
            Arc::clone(&self.cooldowns),
            temperature,
        )
    }
}

impl ChatModelFactory for LlmFacade {
    fn get_chat_model(&self, temperature: f32) -> Arc<dyn ChatModel> {
        Arc::new(self.chat_model(temperature))
    }
}
