//! Best-effort background workflow run after the caller has its response.
//!
//! Stages: `learning → difficulty → weekly_report → store_memory`. With
//! fan-out enabled learning and difficulty run concurrently. Each stage is
//! isolated: an error or panic leaves its field empty and the next stage
//! still runs.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tracing::{debug, error, info, instrument, warn};

use crate::domain::models::{Stage, WorkflowState};
use crate::domain::ports::MemoryStore;
use crate::services::agent_runner::AgentRunner;
use crate::services::agents;
use crate::services::fan_out::run_fan_out;

/// Detached background stages run after the sync response.
pub struct AsyncWorkflow {
    runner: AgentRunner,
    store: Arc<dyn MemoryStore>,
    parallel_fan_out: bool,
}

/// Await `stage`, turning a panic into `None`.
async fn guarded<T>(stage: Stage, fut: impl Future<Output = T>) -> Option<T> {
    match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(value) => Some(value),
        Err(panic) => {
            error!(stage = %stage, panic = ?panic, "background stage panicked");
            None
        }
    }
}

impl AsyncWorkflow {
    /// Workflow over `runner`, writing memory to `store`.
    pub fn new(runner: AgentRunner, store: Arc<dyn MemoryStore>, parallel_fan_out: bool) -> Self {
        Self {
            runner,
            store,
            parallel_fan_out,
        }
    }

    /// Start the workflow on a detached task. Nothing is returned and nothing
    /// is retried; failures are only logged.
    pub fn spawn_detached(self: Arc<Self>, state: WorkflowState) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            warn!("no async runtime, background workflow skipped");
            return;
        };
        handle.spawn(async move {
            if let Err(panic) = AssertUnwindSafe(self.run(state)).catch_unwind().await {
                error!(panic = ?panic, "background workflow panicked");
            }
        });
    }

    /// Run every stage to completion and return the final state.
    #[instrument(skip_all, fields(user_id = %state.submission.user_id, problem_id = %state.submission.problem_id))]
    pub async fn run(&self, mut state: WorkflowState) -> WorkflowState {
        if self.parallel_fan_out {
            if let Some(result) = guarded(Stage::Learning, run_fan_out(&self.runner, &state)).await
            {
                state.learning = result.learning;
                state.difficulty = result.difficulty;
            }
        } else {
            self.learning(&mut state).await;
            self.difficulty(&mut state).await;
        }
        self.weekly_report(&mut state).await;
        self.store_memory(&mut state).await;

        info!(
            learning = state.learning.is_some(),
            difficulty = state.difficulty.is_some(),
            weekly_report = state.weekly_report.is_some(),
            memory_stored = state.memory_stored,
            "background workflow completed"
        );
        state
    }

    async fn learning(&self, state: &mut WorkflowState) {
        if !state.should_run(Stage::Learning) {
            return;
        }
        state.learning = guarded(
            Stage::Learning,
            agents::learning::run(&self.runner, &state.submission, &state.context),
        )
        .await;
    }

    async fn difficulty(&self, state: &mut WorkflowState) {
        if !state.should_run(Stage::Difficulty) {
            return;
        }
        state.difficulty = guarded(
            Stage::Difficulty,
            agents::difficulty::run(&self.runner, &state.submission, &state.context),
        )
        .await;
    }

    async fn weekly_report(&self, state: &mut WorkflowState) {
        if !state.should_run(Stage::WeeklyReport) {
            return;
        }
        state.weekly_report = guarded(
            Stage::WeeklyReport,
            agents::weekly_report::run(&self.runner, &state.submission, &state.context),
        )
        .await;
    }

    /// Forward the improvement hint to the memory store. Requires feedback.
    async fn store_memory(&self, state: &mut WorkflowState) {
        if !state.should_run(Stage::StoreMemory) {
            return;
        }
        let Some(feedback) = &state.feedback else {
            debug!(stage = %Stage::StoreMemory, "no feedback to store");
            return;
        };

        let submission = &state.submission;
        let stored = guarded(
            Stage::StoreMemory,
            self.store.store(
                &submission.user_id,
                &submission.problem_id,
                &submission.category,
                &feedback.improvement_hint,
            ),
        )
        .await;

        match stored {
            Some(Ok(())) => state.memory_stored = true,
            Some(Err(e)) => warn!(stage = %Stage::StoreMemory, error = %e, "memory store failed"),
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::adapters::cache::NullResponseCache;
    use crate::adapters::llm::MockChatProvider;
    use crate::adapters::memory::InMemoryMistakeMemory;
    use crate::domain::errors::LlmError;
    use crate::domain::models::{ExecutionPlan, FeedbackResponse, StructuredOutput, Submission};
    use crate::domain::ports::{ChatMessage, ChatProvider};
    use crate::infrastructure::llm::{LlmFacade, ProviderCooldowns};

    struct PanickingStore;

    #[async_trait]
    impl MemoryStore for PanickingStore {
        async fn store(&self, _: &str, _: &str, _: &str, _: &str) -> anyhow::Result<()> {
            panic!("store exploded")
        }
    }

    /// Panics on learning prompts, answers everything else like the mock.
    struct LearningPanics(MockChatProvider);

    #[async_trait]
    impl ChatProvider for LearningPanics {
        fn name(&self) -> &str {
            "learning-panics"
        }

        async fn complete(
            &self,
            messages: &[ChatMessage],
            temperature: f32,
        ) -> Result<String, LlmError> {
            if messages.iter().any(|m| m.content.contains("\"focus_topics\"")) {
                panic!("learning agent exploded");
            }
            self.0.complete(messages, temperature).await
        }
    }

    fn runner() -> AgentRunner {
        runner_with(Arc::new(MockChatProvider::with_agent_defaults("mock")))
    }

    fn runner_with(provider: Arc<dyn ChatProvider>) -> AgentRunner {
        let facade =
            LlmFacade::new(Some(provider), None, Arc::new(ProviderCooldowns::default())).unwrap();
        AgentRunner::new(Arc::new(facade), Arc::new(NullResponseCache::new()))
    }

    fn failed_state() -> WorkflowState {
        let mut state = WorkflowState::new(Submission::new("u1", "p1", "x", "WA"), true);
        state.plan = Some(
            ExecutionPlan::new()
                .with(Stage::Learning, true)
                .with(Stage::Difficulty, true)
                .with(Stage::WeeklyReport, true)
                .with(Stage::StoreMemory, true),
        );
        state.feedback = Some(FeedbackResponse::fallback());
        state
    }

    #[tokio::test]
    async fn test_sequential_run_fills_every_field() {
        let store = Arc::new(InMemoryMistakeMemory::new());
        let workflow = AsyncWorkflow::new(runner(), store.clone(), false);

        let state = workflow.run(failed_state()).await;

        assert!(state.learning.is_some());
        assert!(state.difficulty.is_some());
        assert!(state.weekly_report.is_some());
        assert!(state.memory_stored);
        assert_eq!(store.count("u1").await, 1);
    }

    #[tokio::test]
    async fn test_sequential_learning_panic_still_runs_difficulty() {
        let provider = Arc::new(LearningPanics(MockChatProvider::with_agent_defaults("mock")));
        let store = Arc::new(InMemoryMistakeMemory::new());
        let workflow = AsyncWorkflow::new(runner_with(provider), store.clone(), false);

        let state = workflow.run(failed_state()).await;

        assert!(state.learning.is_none());
        assert!(state.difficulty.is_some());
        assert!(state.weekly_report.is_some());
        assert!(state.memory_stored);
        assert_eq!(store.count("u1").await, 1);
    }

    #[tokio::test]
    async fn test_panicking_store_is_isolated() {
        let workflow = AsyncWorkflow::new(runner(), Arc::new(PanickingStore), true);

        let state = workflow.run(failed_state()).await;

        assert!(state.learning.is_some());
        assert!(state.difficulty.is_some());
        assert!(!state.memory_stored);
    }

    #[tokio::test]
    async fn test_store_requires_feedback() {
        let store = Arc::new(InMemoryMistakeMemory::new());
        let workflow = AsyncWorkflow::new(runner(), store.clone(), true);
        let mut state = failed_state();
        state.feedback = None;

        let state = workflow.run(state).await;

        assert!(!state.memory_stored);
        assert_eq!(store.count("u1").await, 0);
    }
}
