//! Mock chat provider for testing and offline runs.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::errors::LlmError;
use crate::domain::ports::{ChatMessage, ChatProvider};

/// What the mock answers with.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Successful completion text.
    Text(String),
    /// HTTP 429 equivalent.
    RateLimited,
    /// Non rate-limit failure with the given message.
    Fail(String),
}

impl MockReply {
    /// Shorthand for [`MockReply::Text`].
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }
}

/// Chat provider answering from a rule table.
///
/// The first rule whose needle occurs in any request message wins; otherwise
/// the default reply is used. Every call is counted and its messages are
/// recorded.
pub struct MockChatProvider {
    name: String,
    rules: Vec<(String, MockReply)>,
    default_reply: MockReply,
    delay: Option<Duration>,
    calls: AtomicUsize,
    requests: Mutex<Vec<String>>,
}

impl MockChatProvider {
    /// Mock with no rules that fails every call.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rules: Vec::new(),
            default_reply: MockReply::Fail("no mock rule matched".to_string()),
            delay: None,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Mock that answers every built-in agent with a valid canned result.
    pub fn with_agent_defaults(name: impl Into<String>) -> Self {
        Self::new(name)
            .with_rule(
                "\"edge_cases\"",
                MockReply::text(
                    r#"{"explanation": "The function returns None instead of the computed value, so every test prints the wrong answer.", "improvement_hint": "Return the computed result instead of None and test with the sample input.", "detected_pattern": "missing return value", "edge_cases": ["empty input", "single element"], "complexity_note": "O(n) is fine for the limits."}"#,
                ),
            )
            .with_rule(
                "\"confidence\"",
                MockReply::text(
                    r#"{"detected_pattern": "missing return value", "confidence": 0.7, "is_recurring": false, "evidence": ["function body ends without returning the result"]}"#,
                ),
            )
            .with_rule(
                "\"hint\": string",
                MockReply::text(r#"{"hint": "Make sure your function returns the value it computes."}"#),
            )
            .with_rule(
                "\"focus_topics\"",
                MockReply::text(
                    r#"{"focus_topics": ["function return values"], "recommended_practice": ["Solve two implementation problems rated 800"], "rationale": "The failure comes from control flow, not the algorithm."}"#,
                ),
            )
            .with_rule(
                "\"action\"",
                MockReply::text(
                    r#"{"action": "maintain", "suggested_rating": 1000, "rationale": "One implementation slip does not justify a change."}"#,
                ),
            )
            .with_rule(
                "\"next_week_goals\"",
                MockReply::text(
                    r#"{"summary": "Steady week with one recurring implementation slip.", "strengths": ["problem decomposition"], "areas_to_improve": ["returning results"], "recurring_patterns": ["missing return value"], "next_week_goals": ["Solve five implementation problems"]}"#,
                ),
            )
    }

    /// Answer with `reply` when the joined prompt contains `needle`.
    #[must_use]
    pub fn with_rule(mut self, needle: impl Into<String>, reply: MockReply) -> Self {
        self.rules.push((needle.into(), reply));
        self
    }

    /// Reply used when no rule matches.
    #[must_use]
    pub fn with_default_reply(mut self, reply: MockReply) -> Self {
        self.default_reply = reply;
        self
    }

    /// Sleep this long before answering.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of `complete` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of recorded requests containing `needle`.
    pub fn calls_matching(&self, needle: &str) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|request| request.contains(needle))
            .count()
    }

    fn reply_for(&self, joined: &str) -> &MockReply {
        self.rules
            .iter()
            .find(|(needle, _)| joined.contains(needle.as_str()))
            .map_or(&self.default_reply, |(_, reply)| reply)
    }
}

#[async_trait]
impl ChatProvider for MockChatProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(
        &self,
        messages: &[ChatMessage],
        _temperature: f32,
    ) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let joined = messages
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let reply = self.reply_for(&joined).clone();
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(joined);

        match reply {
            MockReply::Text(text) => Ok(text),
            MockReply::RateLimited => Err(LlmError::RateLimited {
                provider: self.name.clone(),
                message: "Too Many Requests".to_string(),
            }),
            MockReply::Fail(message) => Err(LlmError::Http {
                provider: self.name.clone(),
                status: 500,
                body: message,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rule_matching_and_counting() {
        let mock = MockChatProvider::new("mock")
            .with_rule("alpha", MockReply::text("A"))
            .with_default_reply(MockReply::text("default"));

        let a = mock
            .complete(&[ChatMessage::user("say alpha")], 0.0)
            .await
            .unwrap();
        let d = mock
            .complete(&[ChatMessage::user("something else")], 0.0)
            .await
            .unwrap();

        assert_eq!(a, "A");
        assert_eq!(d, "default");
        assert_eq!(mock.calls(), 2);
        assert_eq!(mock.calls_matching("alpha"), 1);
    }

    #[tokio::test]
    async fn test_rate_limited_reply() {
        let mock = MockChatProvider::new("mock").with_default_reply(MockReply::RateLimited);
        let err = mock
            .complete(&[ChatMessage::user("x")], 0.0)
            .await
            .unwrap_err();
        assert!(err.is_rate_limit());
    }
}
