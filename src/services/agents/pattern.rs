//! Mistake pattern detection agent.

use std::collections::BTreeSet;

use super::prompts;
use crate::domain::models::{PatternDetection, StructuredOutput, Submission, UserProfile};
use crate::services::agent_runner::AgentRunner;
use crate::services::cache_key::key_for;

/// Agent name used in cache keys and logs.
pub const AGENT_NAME: &str = "pattern_detection";

/// Order-independent fingerprint of the user's mistake history.
///
/// Empty when there is no history, which leaves the cache key unchanged.
pub fn history_fingerprint(memory: &[String], profile: Option<&UserProfile>) -> String {
    let entries: BTreeSet<&str> = memory
        .iter()
        .map(String::as_str)
        .chain(
            profile
                .into_iter()
                .flat_map(|p| p.recurring_mistakes.iter().map(String::as_str)),
        )
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .collect();
    entries.into_iter().collect::<Vec<_>>().join("\n")
}

/// Classify the failure against the user's history.
///
/// The cache key folds in the history fingerprint, so the same submission
/// re-evaluates once the user's history changes.
pub async fn run(
    runner: &AgentRunner,
    submission: &Submission,
    context: &str,
    memory: &[String],
    profile: Option<&UserProfile>,
) -> PatternDetection {
    let key = key_for(AGENT_NAME, submission).personalized(&history_fingerprint(memory, profile));
    runner
        .run_agent(
            AGENT_NAME,
            context,
            &key,
            prompts::PATTERN_DETECTION,
            PatternDetection::fallback(),
        )
        .await
}
