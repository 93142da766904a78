//! Deterministic stage planning.

use tracing::debug;

use crate::domain::models::config::{HintPolicy, MemoryPolicy};
use crate::domain::models::{ExecutionPlan, Stage, Verdict};

/// Decides which gated stages run for a submission.
#[derive(Debug, Clone, Copy, Default)]
pub struct Orchestrator {
    memory_policy: MemoryPolicy,
    hint_policy: HintPolicy,
}

impl Orchestrator {
    /// Orchestrator with the given policies.
    pub const fn new(memory_policy: MemoryPolicy, hint_policy: HintPolicy) -> Self {
        Self {
            memory_policy,
            hint_policy,
        }
    }

    /// Compute the execution plan. Pure apart from a debug log line.
    ///
    /// Feedback always runs. Pattern detection, learning and difficulty run
    /// only for failed submissions. Hint and memory storage follow their
    /// policies. The weekly report runs only when requested.
    pub fn plan(&self, verdict: &Verdict, request_weekly_report: bool) -> ExecutionPlan {
        let failed = verdict.is_failure();

        let plan = ExecutionPlan::new()
            .with(Stage::Feedback, true)
            .with(Stage::PatternDetection, failed)
            .with(
                Stage::Hint,
                failed || matches!(self.hint_policy, HintPolicy::Always),
            )
            .with(Stage::Learning, failed)
            .with(Stage::Difficulty, failed)
            .with(Stage::WeeklyReport, request_weekly_report)
            .with(
                Stage::StoreMemory,
                failed || matches!(self.memory_policy, MemoryPolicy::Always),
            );

        debug!(verdict = %verdict, plan = ?plan, "execution plan");
        plan
    }
}
