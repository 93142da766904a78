//! Workflow services: agents, orchestration and pipeline wiring.

pub mod agent_runner;
pub mod agents;
pub mod async_workflow;
pub mod cache_key;
pub mod context_builder;
pub mod fan_out;
pub mod orchestrator;
pub mod pipeline;
pub mod sync_workflow;

pub use agent_runner::{AgentRunner, DETERMINISTIC_AGENTS};
pub use async_workflow::AsyncWorkflow;
pub use cache_key::build_cache_key;
pub use context_builder::{build_context, truncate_context};
pub use fan_out::{run_fan_out, FanOutResult};
pub use orchestrator::Orchestrator;
pub use pipeline::{FeedbackPipeline, FeedbackRequest, PipelineBuilder};
pub use sync_workflow::SyncWorkflow;
