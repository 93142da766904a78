//! Pipeline entry point wiring both workflows behind one request call.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::adapters::cache::build_response_cache;
use crate::adapters::memory::NullMistakeMemory;
use crate::domain::models::{CacheStats, Config, Submission, WorkflowState};
use crate::domain::ports::{
    ChatModelFactory, MemoryRetriever, MemoryStore, ProblemCatalog, ResponseCache,
    UserProfileStore,
};
use crate::infrastructure::config::ConfigError;
use crate::infrastructure::llm::LlmFacade;
use crate::services::agent_runner::AgentRunner;
use crate::services::async_workflow::AsyncWorkflow;
use crate::services::sync_workflow::SyncWorkflow;

/// One feedback request as accepted at the boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRequest {
    /// Submission to analyze.
    #[serde(flatten)]
    pub submission: Submission,
    /// Also produce a weekly report.
    #[serde(default)]
    pub request_weekly_report: bool,
}

impl FeedbackRequest {
    /// Request without a weekly report.
    pub fn new(submission: Submission) -> Self {
        Self {
            submission,
            request_weekly_report: false,
        }
    }

    /// Set the weekly report flag.
    #[must_use]
    pub const fn with_weekly_report(mut self, requested: bool) -> Self {
        self.request_weekly_report = requested;
        self
    }

    fn into_state(self) -> WorkflowState {
        let mut submission = self.submission;
        submission.request_id.get_or_insert_with(Uuid::new_v4);
        submission.submitted_at.get_or_insert_with(chrono::Utc::now);
        WorkflowState::new(submission, self.request_weekly_report)
    }
}

/// Long-lived pipeline. Build once and share.
pub struct FeedbackPipeline {
    sync: SyncWorkflow,
    background: Arc<AsyncWorkflow>,
    cache: Arc<dyn ResponseCache>,
}

impl FeedbackPipeline {
    /// Run the synchronous workflow, hand a copy of the enriched state to the
    /// background workflow and return without waiting for it.
    #[instrument(skip_all, fields(user_id = %request.submission.user_id))]
    pub async fn submit(&self, request: FeedbackRequest) -> WorkflowState {
        let state = self.sync.run(request.into_state()).await;
        Arc::clone(&self.background).spawn_detached(state.clone());
        state
    }

    /// Run both workflows inline and return the final state.
    pub async fn run_to_completion(&self, request: FeedbackRequest) -> WorkflowState {
        let state = self.sync.run(request.into_state()).await;
        self.background.run(state).await
    }

    /// Drop every cached agent result for `user_id`.
    pub async fn invalidate_user_cache(&self, user_id: &str) -> usize {
        let removed = self.cache.invalidate_user(user_id).await;
        info!(user_id, removed, cache = self.cache.name(), "user cache invalidated");
        removed
    }

    /// Counters of the shared response cache.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Shared response cache.
    pub fn cache(&self) -> &Arc<dyn ResponseCache> {
        &self.cache
    }
}

/// Assembles a [`FeedbackPipeline`] from configuration plus optional
/// collaborator overrides.
pub struct PipelineBuilder {
    config: Config,
    chat: Option<Arc<dyn ChatModelFactory>>,
    cache: Option<Arc<dyn ResponseCache>>,
    retriever: Option<Arc<dyn MemoryRetriever>>,
    store: Option<Arc<dyn MemoryStore>>,
    catalog: Option<Arc<dyn ProblemCatalog>>,
    profiles: Option<Arc<dyn UserProfileStore>>,
}

impl PipelineBuilder {
    /// Builder over `config` with default adapters.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            chat: None,
            cache: None,
            retriever: None,
            store: None,
            catalog: None,
            profiles: None,
        }
    }

    /// Use this chat model source instead of building providers from config.
    #[must_use]
    pub fn with_chat(mut self, chat: Arc<dyn ChatModelFactory>) -> Self {
        self.chat = Some(chat);
        self
    }

    /// Override the response cache.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<dyn ResponseCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Use one collaborator for both memory retrieval and storage.
    #[must_use]
    pub fn with_memory<M>(mut self, memory: Arc<M>) -> Self
    where
        M: MemoryRetriever + MemoryStore + 'static,
    {
        let retriever: Arc<dyn MemoryRetriever> = memory.clone();
        let store: Arc<dyn MemoryStore> = memory;
        self.retriever = Some(retriever);
        self.store = Some(store);
        self
    }

    /// Override the memory retriever.
    #[must_use]
    pub fn with_retriever(mut self, retriever: Arc<dyn MemoryRetriever>) -> Self {
        self.retriever = Some(retriever);
        self
    }

    /// Override the memory store.
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn MemoryStore>) -> Self {
        self.store = Some(store);
        self
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

    /// Build the pipeline. Fails only when no chat model source was given
    /// and no provider has credentials.
    pub async fn build(self) -> Result<FeedbackPipeline, ConfigError> {
        let chat: Arc<dyn ChatModelFactory> = match self.chat {
            Some(chat) => chat,
            None => Arc::new(LlmFacade::from_config(&self.config.llm)?),
        };
        let cache = match self.cache {
            Some(cache) => cache,
            None => build_response_cache(&self.config.cache).await,
        };
        let null_memory = Arc::new(NullMistakeMemory::new());
        let retriever = self
            .retriever
            .unwrap_or_else(|| null_memory.clone() as Arc<dyn MemoryRetriever>);
        let store = self
            .store
            .unwrap_or_else(|| null_memory as Arc<dyn MemoryStore>);

        let runner = AgentRunner::new(chat, Arc::clone(&cache));
        let workflow = &self.config.workflow;

        let mut sync = SyncWorkflow::new(runner.clone(), retriever, workflow);
        if let Some(catalog) = self.catalog {
            sync = sync.with_catalog(catalog);
        }
        if let Some(profiles) = self.profiles {
            sync = sync.with_profiles(profiles);
        }
        let background = Arc::new(AsyncWorkflow::new(runner, store, workflow.parallel_fan_out));

        info!(
            cache = cache.name(),
            memory_k = workflow.memory_k,
            parallel_fan_out = workflow.parallel_fan_out,
            ttl_secs = self.config.cache.default_ttl_secs,
            "feedback pipeline ready"
        );

        Ok(FeedbackPipeline {
            sync,
            background,
            cache,
        })
    }
}
