//! Weekly progress report agent.

use super::prompts;
use crate::domain::models::{StructuredOutput, Submission, WeeklyReport};
use crate::services::agent_runner::AgentRunner;
use crate::services::cache_key::key_for;

/// Agent name used in cache keys and logs.
pub const AGENT_NAME: &str = "weekly_report";

/// Summarize the week around `submission`.
pub async fn run(runner: &AgentRunner, submission: &Submission, context: &str) -> WeeklyReport {
    runner
        .run_agent(
            AGENT_NAME,
            context,
            &key_for(AGENT_NAME, submission),
            prompts::WEEKLY_REPORT,
            WeeklyReport::fallback(),
        )
        .await
}
