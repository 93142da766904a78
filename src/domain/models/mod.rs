//! Domain types shared by services and adapters.

pub mod agent_output;
pub mod cache;
pub mod config;
pub mod plan;
pub mod problem;
pub mod submission;
pub mod workflow_state;

pub use agent_output::{
    DifficultyAction, DifficultyAdjustment, FeedbackResponse, HintResponse,
    LearningRecommendation, PatternDetection, StructuredOutput, WeeklyReport, MAX_HINT_CHARS,
};
pub use cache::{CacheKey, CacheStats};
pub use config::{
    CacheBackend, CacheConfig, Config, HintPolicy, LlmConfig, LoggingConfig, MemoryPolicy,
    ProviderConfig, WorkflowConfig,
};
pub use plan::{ExecutionPlan, Stage};
pub use problem::{ProblemContext, ProfileStats, UserProfile};
pub use submission::{Submission, Verdict};
pub use workflow_state::WorkflowState;
