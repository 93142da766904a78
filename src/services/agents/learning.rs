//! Learning recommendation agent.

use super::prompts;
use crate::domain::models::{LearningRecommendation, StructuredOutput, Submission};
use crate::services::agent_runner::AgentRunner;
use crate::services::cache_key::key_for;

/// Agent name used in cache keys and logs.
pub const AGENT_NAME: &str = "learning";

/// Recommend topics for `submission`.
pub async fn run(
    runner: &AgentRunner,
    submission: &Submission,
    context: &str,
) -> LearningRecommendation {
    runner
        .run_agent(
            AGENT_NAME,
            context,
            &key_for(AGENT_NAME, submission),
            prompts::LEARNING,
            LearningRecommendation::fallback(),
        )
        .await
}
