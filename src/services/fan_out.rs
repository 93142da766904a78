//! Concurrent learning and difficulty stage.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::domain::models::{
    DifficultyAdjustment, LearningRecommendation, Stage, Submission, WorkflowState,
};
use crate::services::agent_runner::AgentRunner;
use crate::services::agents;

/// Worker pool size for the fan-out stage.
pub const FAN_OUT_WORKERS: usize = 2;

/// Results of the fan-out stage. A field is `None` when its agent was not
/// flagged or its task panicked.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FanOutResult {
    /// Learning output, `None` if that branch failed.
    pub learning: Option<LearningRecommendation>,
    /// Difficulty output, `None` if that branch failed.
    pub difficulty: Option<DifficultyAdjustment>,
}

enum AgentOutput {
    Learning(LearningRecommendation),
    Difficulty(DifficultyAdjustment),
}

/// Run the flagged learning and difficulty agents on a bounded pool and join
/// both. A single flag still goes through the pool.
pub async fn run_fan_out(runner: &AgentRunner, state: &WorkflowState) -> FanOutResult {
    let flagged: Vec<Stage> = [Stage::Learning, Stage::Difficulty]
        .into_iter()
        .filter(|stage| state.should_run(*stage))
        .collect();
    if flagged.is_empty() {
        return FanOutResult::default();
    }

    let semaphore = Arc::new(Semaphore::new(FAN_OUT_WORKERS));
    let submission = Arc::new(state.submission.clone());
    let context: Arc<str> = Arc::from(state.context.as_str());
    let mut handles = Vec::with_capacity(flagged.len());

    for stage in flagged {
        let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
            warn!(stage = %stage, "fan-out pool closed");
            continue;
        };
        let runner = runner.clone();
        let submission = Arc::clone(&submission);
        let context = Arc::clone(&context);

        let handle = tokio::spawn(async move {
            let _permit = permit;
            run_stage(stage, &runner, &submission, &context).await
        });
        handles.push((stage, handle));
    }

    let mut result = FanOutResult::default();
    for (stage, handle) in handles {
        match handle.await {
            Ok(AgentOutput::Learning(learning)) => result.learning = Some(learning),
            Ok(AgentOutput::Difficulty(difficulty)) => result.difficulty = Some(difficulty),
            Err(e) => warn!(stage = %stage, error = %e, "fan-out task failed"),
        }
    }

    debug!(
        learning = result.learning.is_some(),
        difficulty = result.difficulty.is_some(),
        "fan-out joined"
    );
    result
}

async fn run_stage(
    stage: Stage,
    runner: &AgentRunner,
    submission: &Submission,
    context: &str,
) -> AgentOutput {
    if stage == Stage::Learning {
        AgentOutput::Learning(agents::learning::run(runner, submission, context).await)
    } else {
        AgentOutput::Difficulty(agents::difficulty::run(runner, submission, context).await)
    }
}
