//! Verdict explanation agent.

use tracing::debug;

use super::prompts;
use crate::domain::models::{FeedbackResponse, StructuredOutput, Submission};
use crate::services::agent_runner::AgentRunner;
use crate::services::cache_key::key_for;

/// Agent name used in cache keys and logs.
pub const AGENT_NAME: &str = "feedback";

/// Explain the verdict. Accepted submissions get fixed feedback without a
/// cache lookup or model call.
pub async fn run(runner: &AgentRunner, submission: &Submission, context: &str) -> FeedbackResponse {
    if submission.verdict.is_accepted() {
        debug!(agent = AGENT_NAME, "accepted submission, skipping model call");
        return FeedbackResponse::accepted();
    }

    runner
        .run_agent(
            AGENT_NAME,
            context,
            &key_for(AGENT_NAME, submission),
            prompts::FEEDBACK,
            FeedbackResponse::fallback(),
        )
        .await
}
