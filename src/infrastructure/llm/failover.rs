//! Primary/fallback routing with per-provider cool-downs.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use super::cooldown::{ProviderCooldowns, ProviderSlot};
use crate::domain::errors::LlmError;
use crate::domain::ports::{ChatMessage, ChatModel, ChatProvider};

/// Chat model that routes each call across the configured providers.
///
/// Per call:
/// 1. every configured provider cooling down: fail fast with
///    [`LlmError::AllProvidersLimited`], no network call
/// 2. primary (if configured and available): a rate limit starts its
///    cool-down; any failure falls through
/// 3. fallback (if configured and available): a rate limit starts its
///    cool-down and yields `AllProvidersLimited`; other errors propagate
#[derive(Clone)]
pub struct FailoverChatModel {
    primary: Option<Arc<dyn ChatProvider>>,
    fallback: Option<Arc<dyn ChatProvider>>,
    cooldowns: Arc<ProviderCooldowns>,
    temperature: f32,
}

impl FailoverChatModel {
    /// Model routing over the given providers.
    pub fn new(
        primary: Option<Arc<dyn ChatProvider>>,
        fallback: Option<Arc<dyn ChatProvider>>,
        cooldowns: Arc<ProviderCooldowns>,
        temperature: f32,
    ) -> Self {
        Self {
            primary,
            fallback,
            cooldowns,
            temperature,
        }
    }

    /// Sampling temperature for every call.
    pub const fn temperature(&self) -> f32 {
        self.temperature
    }

    fn configured_slots(&self) -> impl Iterator<Item = ProviderSlot> + '_ {
        [
            self.primary.as_ref().map(|_| ProviderSlot::Primary),
            self.fallback.as_ref().map(|_| ProviderSlot::Fallback),
        ]
        .into_iter()
        .flatten()
    }

    /// Shortest remaining cool-down among the configured providers.
    fn shortest_wait(&self) -> Duration {
        self.configured_slots()
            .filter_map(|slot| self.cooldowns.remaining(slot))
            .min()
            .unwrap_or(Duration::ZERO)
    }

    fn all_limited(&self) -> LlmError {
        LlmError::AllProvidersLimited {
            retry_after: self.shortest_wait(),
        }
    }

    fn succeeded(&self, slot: ProviderSlot, text: String) -> String {
        self.cooldowns.record_success();
        debug!(provider = %slot, "chat completion succeeded");
        text
    }

    #[instrument(skip(self, messages), fields(temperature = self.temperature))]
    async fn route(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        if self
            .configured_slots()
            .all(|slot| self.cooldowns.is_limited(slot))
        {
            let err = self.all_limited();
            let count = self.cooldowns.record_both_limited();
            warn!(consecutive = count, error = %err, "all providers cooling down, failing fast");
            return Err(err);
        }

        let mut primary_error = None;

        if let Some(primary) = &self.primary {
            if !self.cooldowns.is_limited(ProviderSlot::Primary) {
                match primary.complete(messages, self.temperature).await {
                    Ok(text) => return Ok(self.succeeded(ProviderSlot::Primary, text)),
                    Err(err) => {
                        if err.is_rate_limit() {
                            let cooldown = self.cooldowns.mark_limited(ProviderSlot::Primary);
                            warn!(
                                provider = primary.name(),
                                cooldown_secs = cooldown.as_secs(),
                                error = %err,
                                "primary rate limited, falling back"
                            );
                        } else {
                            warn!(provider = primary.name(), error = %err, "primary failed, falling back");
                        }
                        primary_error = Some(err);
                    }
                }
            }
        }

        if let Some(fallback) = &self.fallback {
            if !self.cooldowns.is_limited(ProviderSlot::Fallback) {
                return match fallback.complete(messages, self.temperature).await {
                    Ok(text) => Ok(self.succeeded(ProviderSlot::Fallback, text)),
                    Err(err) if err.is_rate_limit() => {
                        let cooldown = self.cooldowns.mark_limited(ProviderSlot::Fallback);
                        warn!(
                            provider = fallback.name(),
                            cooldown_secs = cooldown.as_secs(),
                            error = %err,
                            "fallback rate limited"
                        );
                        Err(self.all_limited())
                    }
                    Err(err) => Err(err),
                };
            }
        }

        // No usable fallback: surface what the primary reported.
        match primary_error {
            Some(err) if !err.is_rate_limit() => Err(err),
            _ => Err(self.all_limited()),
        }
    }

    /// Blocking variant of [`ChatModel::invoke`] with identical routing.
    ///
    /// Spins up a current-thread runtime, so it must not be called from
    /// inside an async context.
    pub fn invoke_blocking(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        if tokio::runtime::Handle::try_current().is_ok() {
            return Err(LlmError::Runtime(
                "invoke_blocking called from inside an async runtime".to_string(),
            ));
        }
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| LlmError::Runtime(e.to_string()))?;
        runtime.block_on(self.route(messages))
    }
}

#[async_trait]
impl ChatModel for FailoverChatModel {
    async fn invoke(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        self.route(messages).await
    }
}
