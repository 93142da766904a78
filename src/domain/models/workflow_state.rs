//! State threaded through the workflow stages.

use serde::{Deserialize, Serialize};

use super::agent_output::{
    DifficultyAdjustment, FeedbackResponse, LearningRecommendation, PatternDetection,
    WeeklyReport,
};
use super::plan::{ExecutionPlan, Stage};
use super::problem::{ProblemContext, UserProfile};
use super::submission::Submission;

/// State threaded through one synchronous-then-asynchronous workflow run.
///
/// Stages only ever fill fields in; nothing is removed once set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowState {
    /// Input submission.
    pub submission: Submission,
    /// Caller asked for a weekly report.
    #[serde(default)]
    pub request_weekly_report: bool,

    /// Stage flags, set by the orchestrator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<ExecutionPlan>,
    /// Retrieved memory snippets.
    #[serde(default)]
    pub memory: Vec<String>,
    /// Catalog entry for the problem.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub problem: Option<ProblemContext>,
    /// Submitting user's profile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<UserProfile>,
    /// Assembled agent context.
    #[serde(default)]
    pub context: String,

    /// Feedback agent output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<FeedbackResponse>,
    /// Pattern agent output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<PatternDetection>,
    /// Hint text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Learning agent output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub learning: Option<LearningRecommendation>,
    /// Difficulty agent output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<DifficultyAdjustment>,
    /// Weekly report output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekly_report: Option<WeeklyReport>,
    /// Whether the mistake summary reached memory.
    #[serde(default)]
    pub memory_stored: bool,
}

impl WorkflowState {
    /// Fresh state for `submission`.
    pub fn new(submission: Submission, request_weekly_report: bool) -> Self {
        Self {
            submission,
            request_weekly_report,
            plan: None,
            memory: Vec::new(),
            problem: None,
            profile: None,
            context: String::new(),
            feedback: None,
            pattern: None,
            hint: None,
            learning: None,
            difficulty: None,
            weekly_report: None,
            memory_stored: false,
        }
    }

    /// Whether the plan flags `stage` to run. False before planning.
    pub fn should_run(&self, stage: Stage) -> bool {
        self.plan.as_ref().is_some_and(|plan| plan.should_run(stage))
    }

    /// Detected pattern name, if pattern detection produced one.
    pub fn detected_pattern(&self) -> Option<&str> {
        self.pattern
            .as_ref()
            .and_then(|p| p.detected_pattern.as_deref())
            .or_else(|| {
                self.feedback
                    .as_ref()
                    .and_then(|f| f.detected_pattern.as_deref())
            })
    }
}
