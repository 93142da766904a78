//! Domain agents.
//!
//! Each agent builds its cache key from the submission, picks its system
//! prompt and hands both to the [`AgentRunner`](super::agent_runner::AgentRunner)
//! together with its fallback value.

pub mod difficulty;
pub mod feedback;
pub mod hint;
pub mod learning;
pub mod pattern;
pub mod prompts;
pub mod weekly_report;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::adapters::cache::kv::{InMemoryKv, KvBackend};
    use crate::adapters::cache::remote_cache::{RemoteResponseCache, DEFAULT_TTL};
    use crate::adapters::llm::MockChatProvider;
    use crate::domain::models::{FeedbackResponse, StructuredOutput, Submission, UserProfile};
    use crate::domain::ports::{ChatProvider, ResponseCache};
    use crate::infrastructure::llm::{LlmFacade, ProviderCooldowns};
    use crate::services::agent_runner::AgentRunner;

    fn setup() -> (Arc<MockChatProvider>, Arc<dyn ResponseCache>, AgentRunner) {
        let mock = Arc::new(MockChatProvider::with_agent_defaults("mock"));
        let provider: Arc<dyn ChatProvider> = mock.clone();
        let facade =
            LlmFacade::new(Some(provider), None, Arc::new(ProviderCooldowns::default())).unwrap();
        let kv: Arc<dyn KvBackend> = Arc::new(InMemoryKv::new());
        let cache: Arc<dyn ResponseCache> =
            Arc::new(RemoteResponseCache::new(Some(kv), DEFAULT_TTL));
        let runner = AgentRunner::new(Arc::new(facade), cache.clone());
        (mock, cache, runner)
    }

    #[tokio::test]
    async fn test_accepted_feedback_short_circuits() {
        let (mock, cache, runner) = setup();
        let submission = Submission::new("u1", "p1", "print(1)", "Accepted");

        let feedback = super::feedback::run(&runner, &submission, "ctx").await;

        assert_eq!(feedback, FeedbackResponse::accepted());
        assert_eq!(mock.calls(), 0);
        assert_eq!(cache.stats().hits + cache.stats().misses, 0);
    }

    #[tokio::test]
    async fn test_deterministic_agents_are_idempotent() {
        let (mock, cache, runner) = setup();
        let submission = Submission::new("u1", "p1", "print(1)", "Wrong Answer");

        let first = super::learning::run(&runner, &submission, "ctx").await;
        let second = super::learning::run(&runner, &submission, "ctx").await;

        assert_eq!(first, second);
        assert_eq!(mock.calls(), 1);
        assert_eq!(cache.stats().hits, 1);
    }

    #[tokio::test]
    async fn test_feedback_is_never_cached() {
        let (mock, cache, runner) = setup();
        let submission = Submission::new("u1", "p1", "print(1)", "Wrong Answer");

        super::feedback::run(&runner, &submission, "ctx").await;
        super::feedback::run(&runner, &submission, "ctx").await;

        assert_eq!(mock.calls(), 2);
        assert_eq!(cache.stats().writes, 0);
    }

    #[tokio::test]
    async fn test_pattern_key_tracks_history() {
        let (mock, _cache, runner) = setup();
        let submission = Submission::new("u1", "p1", "print(1)", "Wrong Answer");
        let profile = UserProfile {
            user_id: "u1".to_string(),
            recurring_mistakes: vec!["off-by-one".to_string()],
            ..UserProfile::default()
        };

        super::pattern::run(&runner, &submission, "ctx", &[], None).await;
        super::pattern::run(&runner, &submission, "ctx", &[], None).await;
        assert_eq!(mock.calls(), 1);

        super::pattern::run(&runner, &submission, "ctx", &[], Some(&profile)).await;
        assert_eq!(mock.calls(), 2);
    }

    #[tokio::test]
    async fn test_hint_uses_mock_reply() {
        let (_mock, _cache, runner) = setup();
        let submission = Submission::new("u1", "p1", "print(1)", "Wrong Answer");
        let feedback = FeedbackResponse::fallback();

        let hint = super::hint::run(&runner, &submission, "ctx", Some(&feedback)).await;
        assert_eq!(hint, "Make sure your function returns the value it computes.");
    }
}
