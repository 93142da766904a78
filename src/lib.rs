//! codementor - feedback pipeline for competitive programming submissions
//!
//! Given a graded submission, codementor explains the verdict, compresses the
//! advice into a hint, detects recurring mistake patterns and, in the
//! background, recommends topics, adjusts difficulty and writes progress
//! reports. Results are personalized from the user's mistake memory.
//!
//! # Architecture
//!
//! The crate follows Hexagonal Architecture:
//!
//! - **Domain Layer** (`domain`): models, port traits and error types
//! - **Service Layer** (`services`): agents, workflows and the pipeline entry point
//! - **Adapters** (`adapters`): response caches, memory, catalog and profile stores
//! - **Infrastructure Layer** (`infrastructure`): configuration, logging, LLM providers
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```ignore
//! use codementor::{ConfigLoader, FeedbackRequest, PipelineBuilder, Submission};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let pipeline = PipelineBuilder::new(ConfigLoader::load()?).build().await?;
//!     let submission = Submission::new("u1", "1000A", "print(1)", "Wrong Answer");
//!     let state = pipeline.submit(FeedbackRequest::new(submission)).await;
//!     println!("{:?}", state.hint);
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

pub use domain::errors::{LlmError, SchemaError};
pub use domain::models::{
    CacheKey, Config, ExecutionPlan, Stage, StructuredOutput, Submission, Verdict, WorkflowState,
};
pub use domain::ports::{ChatModelFactory, MemoryRetriever, MemoryStore, ResponseCache};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use infrastructure::llm::LlmFacade;
pub use services::{
    build_cache_key, AgentRunner, FeedbackPipeline, FeedbackRequest, Orchestrator,
    PipelineBuilder,
};
