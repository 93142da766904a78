//! Workflow stages and execution plans.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Named stage of the feedback workflow.
///
/// Declaration order matches execution order, so iterating a
/// [`BTreeMap<Stage, _>`] walks stages the way the workflows run them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Fetch past mistakes.
    RetrieveMemory,
    /// Choose stages.
    Plan,
    /// Assemble agent context.
    BuildContext,
    /// Explain the verdict.
    Feedback,
    /// Classify the mistake.
    PatternDetection,
    /// Short hint.
    Hint,
    /// Topic recommendations.
    Learning,
    /// Difficulty adjustment.
    Difficulty,
    /// Weekly progress report.
    WeeklyReport,
    /// Persist the mistake summary.
    StoreMemory,
}

impl Stage {
    /// Stages that consult a plan flag.
    pub const GATED: [Self; 7] = [
        Self::Feedback,
        Self::PatternDetection,
        Self::Hint,
        Self::Learning,
        Self::Difficulty,
        Self::WeeklyReport,
        Self::StoreMemory,
    ];

    /// Snake-case stage name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RetrieveMemory => "retrieve_memory",
            Self::Plan => "plan",
            Self::BuildContext => "build_context",
            Self::Feedback => "feedback",
            Self::PatternDetection => "pattern_detection",
            Self::Hint => "hint",
            Self::Learning => "learning",
            Self::Difficulty => "difficulty",
            Self::WeeklyReport => "weekly_report",
            Self::StoreMemory => "store_memory",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-request decision of which gated stages execute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExecutionPlan {
    flags: BTreeMap<Stage, bool>,
}

impl ExecutionPlan {
    /// Plan with every gated stage off.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the flag for `stage`.
    pub fn with(mut self, stage: Stage, run: bool) -> Self {
        self.flags.insert(stage, run);
        self
    }

    /// Whether `stage` is flagged to run. Stages absent from the plan do not run.
    pub fn should_run(&self, stage: Stage) -> bool {
        self.flags.get(&stage).copied().unwrap_or(false)
    }

    /// Stages flagged to run, in execution order.
    pub fn enabled(&self) -> impl Iterator<Item = Stage> + '_ {
        self.flags
            .iter()
            .filter(|(_, run)| **run)
            .map(|(stage, _)| *stage)
    }

    /// Flags in execution order.
    pub fn iter(&self) -> impl Iterator<Item = (Stage, bool)> + '_ {
        self.flags.iter().map(|(stage, run)| (*stage, *run))
    }
}
