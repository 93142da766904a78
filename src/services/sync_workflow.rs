//! Latency-bound workflow run before the caller gets a response.
//!
//! Stages run in a fixed order:
//! `retrieve_memory → plan → build_context → feedback → pattern_detection → hint`.
//! Every stage after `plan` checks its plan flag and passes the state through
//! untouched when the flag is off.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::domain::models::config::WorkflowConfig;
use crate::domain::models::{ProblemContext, Stage, UserProfile, WorkflowState};
use crate::domain::ports::{MemoryRetriever, ProblemCatalog, UserProfileStore};
use crate::services::agent_runner::AgentRunner;
use crate::services::agents;
use crate::services::context_builder::{build_context, truncate_context};
use crate::services::orchestrator::Orchestrator;

/// Request-path stages up to and including the hint.
pub struct SyncWorkflow {
    runner: AgentRunner,
    orchestrator: Orchestrator,
    retriever: Arc<dyn MemoryRetriever>,
    catalog: Option<Arc<dyn ProblemCatalog>>,
    profiles: Option<Arc<dyn UserProfileStore>>,
    memory_k: usize,
    max_context_chars: usize,
}

impl SyncWorkflow {
    /// Workflow over `runner` and `retriever`.
    pub fn new(
        runner: AgentRunner,
        retriever: Arc<dyn MemoryRetriever>,
        config: &WorkflowConfig,
    ) -> Self {
        Self {
            runner,
            orchestrator: Orchestrator::new(config.memory_policy, config.hint_policy),
            retriever,
            catalog: None,
            profiles: None,
            memory_k: config.memory_k,
            max_context_chars: config.max_context_chars,
        }
    }

    /// Attach a problem catalog.
    #[must_use]
    pub fn with_catalog(mut self, catalog: Arc<dyn ProblemCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Attach a profile store.
    #[must_use]
    pub fn with_profiles(mut self, profiles: Arc<dyn UserProfileStore>) -> Self {
        self.profiles = Some(profiles);
        self
    }

    /// Run every stage and return the populated state.
    #[instrument(skip_all, fields(user_id = %state.submission.user_id, problem_id = %state.submission.problem_id))]
    pub async fn run(&self, mut state: WorkflowState) -> WorkflowState {
        self.retrieve_memory(&mut state).await;
        self.plan(&mut state);
        self.build_context(&mut state).await;
        self.feedback(&mut state).await;
        self.pattern_detection(&mut state).await;
        self.hint(&mut state).await;

        info!(
            verdict = %state.submission.verdict,
            pattern = state.detected_pattern().unwrap_or("none"),
            hint = state.hint.is_some(),
            "sync workflow completed"
        );
        state
    }

    async fn retrieve_memory(&self, state: &mut WorkflowState) {
        let query = state.submission.memory_query();
        state.memory = match self
            .retriever
            .retrieve(&state.submission.user_id, &query, self.memory_k)
            .await
        {
            Ok(memory) => memory,
            Err(e) => {
                warn!(stage = %Stage::RetrieveMemory, error = %e, "memory retrieval failed, continuing without memory");
                Vec::new()
            }
        };
        debug!(stage = %Stage::RetrieveMemory, query = %query, found = state.memory.len(), "memory retrieved");
    }

    fn plan(&self, state: &mut WorkflowState) {
        state.plan = Some(
            self.orchestrator
                .plan(&state.submission.verdict, state.request_weekly_report),
        );
    }

    async fn build_context(&self, state: &mut WorkflowState) {
        state.problem = self.lookup_problem(&state.submission.problem_id).await;
        state.profile = self.lookup_profile(&state.submission.user_id).await;

        let context = build_context(
            &state.submission,
            &state.memory,
            state.problem.as_ref(),
            state.profile.as_ref(),
        );
        state.context = truncate_context(&context, self.max_context_chars);
        debug!(stage = %Stage::BuildContext, chars = state.context.chars().count(), "context built");
    }

    async fn lookup_problem(&self, problem_id: &str) -> Option<ProblemContext> {
        let catalog = self.catalog.as_ref()?;
        catalog.get_problem(problem_id).await.unwrap_or_else(|e| {
            warn!(problem_id, error = %e, "problem lookup failed");
            None
        })
    }

    async fn lookup_profile(&self, user_id: &str) -> Option<UserProfile> {
        let profiles = self.profiles.as_ref()?;
        profiles.get_profile(user_id).await.unwrap_or_else(|e| {
            warn!(user_id, error = %e, "profile lookup failed");
            None
        })
    }

    async fn feedback(&self, state: &mut WorkflowState) {
        if !state.should_run(Stage::Feedback) {
            return;
        }
        state.feedback =
            Some(agents::feedback::run(&self.runner, &state.submission, &state.context).await);
    }

    async fn pattern_detection(&self, state: &mut WorkflowState) {
        if !state.should_run(Stage::PatternDetection) {
            return;
        }
        state.pattern = Some(
            agents::pattern::run(
                &self.runner,
                &state.submission,
                &state.context,
                &state.memory,
                state.profile.as_ref(),
            )
            .await,
        );
    }

    async fn hint(&self, state: &mut WorkflowState) {
        if !state.should_run(Stage::Hint) {
            return;
        }
        state.hint = Some(
            agents::hint::run(
                &self.runner,
                &state.submission,
                &state.context,
                state.feedback.as_ref(),
            )
            .await,
        );
    }
}
