//! Difficulty adjustment agent.

use super::prompts;
use crate::domain::models::{DifficultyAdjustment, StructuredOutput, Submission};
use crate::services::agent_runner::AgentRunner;
use crate::services::cache_key::key_for;

/// Agent name used in cache keys and logs.
pub const AGENT_NAME: &str = "difficulty";

/// Suggest how the difficulty of upcoming problems should change.
/// Falls back to `maintain`.
pub async fn run(
    runner: &AgentRunner,
    submission: &Submission,
    context: &str,
) -> DifficultyAdjustment {
    runner
        .run_agent(
            AGENT_NAME,
            context,
            &key_for(AGENT_NAME, submission),
            prompts::DIFFICULTY,
            DifficultyAdjustment::fallback(),
        )
        .await
}
