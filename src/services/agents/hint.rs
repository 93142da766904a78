//! Short hint agent.

use super::prompts;
use crate::domain::models::{
    FeedbackResponse, HintResponse, StructuredOutput, Submission, MAX_HINT_CHARS,
};
use crate::services::agent_runner::AgentRunner;
use crate::services::cache_key::key_for;

/// Agent name used in cache keys and logs.
pub const AGENT_NAME: &str = "hint";

/// Hint used when compression fails: the feedback's improvement hint cut to
/// the hint length limit, or the static fallback without feedback.
pub fn fallback_hint(feedback: Option<&FeedbackResponse>) -> HintResponse {
    let Some(source) = feedback
        .map(|f| f.improvement_hint.trim())
        .filter(|h| !h.is_empty())
    else {
        return HintResponse::fallback();
    };

    if source.chars().count() <= MAX_HINT_CHARS {
        return HintResponse {
            hint: source.to_string(),
        };
    }
    let mut hint: String = source.chars().take(MAX_HINT_CHARS - 3).collect();
    hint.push_str("...");
    HintResponse { hint }
}

/// Compress the feedback's improvement hint into one short hint. Without
/// feedback the hint is derived from the context alone.
pub async fn run(
    runner: &AgentRunner,
    submission: &Submission,
    context: &str,
    feedback: Option<&FeedbackResponse>,
) -> String {
    let input = match feedback {
        Some(feedback) => format!(
            "{context}\n\n## Advice to compress\n{}",
            feedback.improvement_hint
        ),
        None => context.to_string(),
    };

    runner
        .run_agent(
            AGENT_NAME,
            &input,
            &key_for(AGENT_NAME, submission),
            prompts::HINT,
            fallback_hint(feedback),
        )
        .await
        .hint
}
