//! Cache-aware execution of one structured agent call.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, instrument, warn};

use crate::domain::models::{CacheKey, StructuredOutput};
use crate::domain::ports::{ChatMessage, ChatModelFactory, ResponseCache};

/// Agents whose output depends only on the cache-key inputs.
///
/// Only these read and populate the response cache. An agent added here must
/// not fold anything outside its cache key into the prompt.
pub const DETERMINISTIC_AGENTS: [&str; 4] =
    ["pattern_detection", "learning", "difficulty", "weekly_report"];

/// Sampling temperature for agent calls.
pub const AGENT_TEMPERATURE: f32 = 0.2;

/// Whether `agent_name` runs at temperature 0 and is cached.
pub fn is_deterministic(agent_name: &str) -> bool {
    DETERMINISTIC_AGENTS.contains(&agent_name)
}

/// Runs agents against the chat model with response caching.
///
/// `run_agent` never fails: every error path is logged and ends in the
/// caller-supplied fallback.
#[derive(Clone)]
pub struct AgentRunner {
    chat: Arc<dyn ChatModelFactory>,
    cache: Arc<dyn ResponseCache>,
    temperature: f32,
}

impl AgentRunner {
    /// Runner over `chat` and `cache`.
    pub fn new(chat: Arc<dyn ChatModelFactory>, cache: Arc<dyn ResponseCache>) -> Self {
        Self {
            chat,
            cache,
            temperature: AGENT_TEMPERATURE,
        }
    }

    /// Temperature for non-deterministic agents.
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Cache used for deterministic agents.
    pub fn cache(&self) -> &Arc<dyn ResponseCache> {
        &self.cache
    }

    /// Run one agent; never fails, returns `fallback` on any error.
    #[instrument(skip(self, context, cache_key, system_prompt, fallback), fields(agent = agent_name))]
    pub async fn run_agent<T: StructuredOutput>(
        &self,
        agent_name: &str,
        context: &str,
        cache_key: &CacheKey,
        system_prompt: &str,
        fallback: T,
    ) -> T {
        let cacheable = is_deterministic(agent_name);

        if cacheable {
            if let Some(cached) = self.cache.get(cache_key).await {
                match T::from_value(cached) {
                    Ok(result) => {
                        debug!(agent = agent_name, cache_hit = true, "serving cached result");
                        return result;
                    }
                    Err(e) => {
                        warn!(agent = agent_name, error = %e, "cached result unusable, treating as miss");
                    }
                }
            }
        }

        let messages = [
            ChatMessage::system(format!(
                "{system_prompt}\n\nRespond with a single JSON object of the form: {}",
                T::schema_hint()
            )),
            ChatMessage::user(context),
        ];

        let started = Instant::now();
        let model = self.chat.get_chat_model(self.temperature);
        let raw = match model.invoke(&messages).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(agent = agent_name, error = %e, "model call failed, using fallback");
                return fallback;
            }
        };

        let result = match T::parse(&raw) {
            Ok(result) => result,
            Err(e) => {
                warn!(agent = agent_name, error = %e, "model output failed validation, using fallback");
                return fallback;
            }
        };

        if cacheable {
            match serde_json::to_value(&result) {
                Ok(value) => self.cache.set(cache_key, &value, None).await,
                Err(e) => warn!(agent = agent_name, error = %e, "result not cacheable"),
            }
        }

        info!(
            agent = agent_name,
            cache_hit = false,
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "agent completed"
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::cache::NullResponseCache;
    use crate::adapters::llm::{MockChatProvider, MockReply};
    use crate::domain::models::{DifficultyAction, DifficultyAdjustment, FeedbackResponse};
    use crate::domain::ports::ChatProvider;
    use crate::infrastructure::llm::{LlmFacade, ProviderCooldowns};

    fn runner(mock: Arc<MockChatProvider>) -> AgentRunner {
        let provider: Arc<dyn ChatProvider> = mock;
        let facade =
            LlmFacade::new(Some(provider), None, Arc::new(ProviderCooldowns::default())).unwrap();
        AgentRunner::new(Arc::new(facade), Arc::new(NullResponseCache::new()))
    }

    fn key() -> CacheKey {
        CacheKey::new("difficulty", "u1", "0".repeat(64))
    }

    #[test]
    fn test_deterministic_membership() {
        assert!(is_deterministic("learning"));
        assert!(is_deterministic("weekly_report"));
        assert!(!is_deterministic("feedback"));
        assert!(!is_deterministic("hint"));
    }

    #[tokio::test]
    async fn test_invalid_output_returns_fallback() {
        let mock = Arc::new(
            MockChatProvider::new("mock").with_default_reply(MockReply::text("not json at all")),
        );
        let result = runner(mock.clone())
            .run_agent(
                "difficulty",
                "ctx",
                &key(),
                "Adjust difficulty.",
                DifficultyAdjustment::fallback(),
            )
            .await;

        assert_eq!(result.action, DifficultyAction::Maintain);
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn test_model_error_returns_fallback() {
        let mock = Arc::new(
            MockChatProvider::new("mock").with_default_reply(MockReply::Fail("boom".to_string())),
        );
        let fallback = FeedbackResponse::fallback();
        let result = runner(mock)
            .run_agent("feedback", "ctx", &key(), "Explain.", fallback.clone())
            .await;
        assert_eq!(result, fallback);
    }

    #[tokio::test]
    async fn test_schema_hint_is_sent() {
        let mock = Arc::new(MockChatProvider::with_agent_defaults("mock"));
        let result = runner(mock.clone())
            .run_agent(
                "difficulty",
                "ctx",
                &key(),
                "Adjust difficulty.",
                DifficultyAdjustment::fallback(),
            )
            .await;

        assert_eq!(result.suggested_rating, Some(1000));
        assert_eq!(mock.calls_matching("Respond with a single JSON object"), 1);
    }
}
