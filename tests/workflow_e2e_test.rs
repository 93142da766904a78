//! End-to-end runs of the feedback pipeline over mock providers.

mod common;

use std::sync::Arc;

use codementor::adapters::catalog::InMemoryProblemCatalog;
use codementor::adapters::llm::{MockChatProvider, MockReply};
use codementor::adapters::memory::InMemoryMistakeMemory;
use codementor::adapters::profile::InMemoryProfileStore;
use codementor::domain::models::agent_output::FeedbackResponse;
use codementor::domain::models::{Config, ProblemContext, StructuredOutput, UserProfile};
use codementor::domain::ports::{ChatModelFactory, ProblemCatalog, UserProfileStore};
use codementor::{FeedbackPipeline, FeedbackRequest, PipelineBuilder};

use common::mock_data;

async fn pipeline(
    mock: Arc<MockChatProvider>,
    memory: Arc<InMemoryMistakeMemory>,
) -> FeedbackPipeline {
    let chat: Arc<dyn ChatModelFactory> = Arc::new(common::facade_with(mock));
    PipelineBuilder::new(Config::default())
        .with_chat(chat)
        .with_cache(common::memory_cache())
        .with_memory(memory)
        .build()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_accepted_submission_needs_no_model() {
    common::setup_test_logging();
    let mock = Arc::new(MockChatProvider::with_agent_defaults("mock"));
    let memory = Arc::new(InMemoryMistakeMemory::new());
    let pipeline = pipeline(Arc::clone(&mock), Arc::clone(&memory)).await;

    let state = pipeline
        .run_to_completion(FeedbackRequest::new(mock_data::accepted("alice")))
        .await;

    assert_eq!(state.feedback, Some(FeedbackResponse::accepted()));
    assert!(state.pattern.is_none());
    assert!(state.hint.is_none());
    assert!(state.learning.is_none());
    assert!(state.difficulty.is_none());
    assert!(state.weekly_report.is_none());
    assert!(!state.memory_stored);
    assert_eq!(mock.calls(), 0);
    assert_eq!(memory.count("alice").await, 0);
}

#[tokio::test]
async fn test_failed_submission_runs_every_stage() {
    let mock = Arc::new(MockChatProvider::with_agent_defaults("mock"));
    let memory = Arc::new(InMemoryMistakeMemory::new());
    let pipeline = pipeline(Arc::clone(&mock), Arc::clone(&memory)).await;

    let state = pipeline
        .run_to_completion(FeedbackRequest::new(mock_data::wrong_answer("bob")))
        .await;

    let feedback = state.feedback.as_ref().unwrap();
    assert!(feedback.explanation.contains("returns None"));
    assert_eq!(
        state.pattern.as_ref().unwrap().detected_pattern.as_deref(),
        Some("missing return value")
    );
    assert_eq!(
        state.hint.as_deref(),
        Some("Make sure your function returns the value it computes.")
    );
    assert_eq!(
        state.learning.as_ref().unwrap().focus_topics,
        vec!["function return values".to_string()]
    );
    assert!(state.difficulty.is_some());
    assert!(state.weekly_report.is_none());
    assert!(state.memory_stored);
    assert_eq!(memory.count("bob").await, 1);
}

#[tokio::test]
async fn test_second_submission_sees_stored_mistake() {
    let mock = Arc::new(MockChatProvider::with_agent_defaults("mock"));
    let memory = Arc::new(InMemoryMistakeMemory::new());
    let pipeline = pipeline(Arc::clone(&mock), Arc::clone(&memory)).await;

    let first = pipeline
        .run_to_completion(FeedbackRequest::new(mock_data::wrong_answer("carol")))
        .await;
    assert!(first.memory.is_empty());

    let second = pipeline
        .run_to_completion(FeedbackRequest::new(mock_data::wrong_answer("carol")))
        .await;

    assert_eq!(second.memory.len(), 1);
    assert!(second.memory[0].contains("1352C"));
    assert!(second.context.contains("## Past mistakes"));
    // History changed, so pattern detection was asked again.
    assert_eq!(mock.calls_matching("\"confidence\""), 2);
    // Learning and difficulty were served from the cache.
    assert_eq!(mock.calls_matching("\"focus_topics\""), 1);
    assert_eq!(mock.calls_matching("\"action\""), 1);
    assert!(pipeline.cache_stats().hits >= 2);
}

#[tokio::test]
async fn test_weekly_report_on_request() {
    let mock = Arc::new(MockChatProvider::with_agent_defaults("mock"));
    let memory = Arc::new(InMemoryMistakeMemory::new());
    let pipeline = pipeline(Arc::clone(&mock), memory).await;

    let state = pipeline
        .run_to_completion(
            FeedbackRequest::new(mock_data::accepted("dave")).with_weekly_report(true),
        )
        .await;

    let report = state.weekly_report.unwrap();
    assert_eq!(report.next_week_goals.len(), 1);
    assert!(state.learning.is_none());
    assert_eq!(mock.calls(), 1);
}

#[tokio::test]
async fn test_submit_returns_before_background_work() {
    let mock = Arc::new(MockChatProvider::with_agent_defaults("mock"));
    let memory = Arc::new(InMemoryMistakeMemory::new());
    let pipeline = pipeline(Arc::clone(&mock), Arc::clone(&memory)).await;

    let state = pipeline
        .submit(FeedbackRequest::new(mock_data::wrong_answer("erin")))
        .await;

    assert!(state.feedback.is_some());
    assert!(state.hint.is_some());
    assert!(state.learning.is_none());
    assert!(state.difficulty.is_none());
    assert!(!state.memory_stored);

    let stored = common::wait_for(
        || {
            let memory = Arc::clone(&memory);
            async move { memory.count("erin").await == 1 }
        },
        5_000,
    )
    .await;
    assert!(stored, "background workflow never stored the mistake");
}

#[tokio::test]
async fn test_rate_limited_providers_degrade_to_fallbacks() {
    let mock = Arc::new(MockChatProvider::new("mock").with_default_reply(MockReply::RateLimited));
    let memory = Arc::new(InMemoryMistakeMemory::new());
    let pipeline = pipeline(Arc::clone(&mock), Arc::clone(&memory)).await;

    let state = pipeline
        .run_to_completion(FeedbackRequest::new(mock_data::wrong_answer("frank")))
        .await;

    assert_eq!(state.feedback, Some(FeedbackResponse::fallback()));
    assert!(state.hint.as_deref().is_some_and(|hint| !hint.is_empty()));
    assert!(state.learning.is_some());
    assert!(state.difficulty.is_some());
    // Only the first call reached the provider; the rest failed fast.
    assert_eq!(mock.calls(), 1);
    // Fallback feedback still feeds memory.
    assert_eq!(memory.count("frank").await, 1);
}

#[tokio::test]
async fn test_catalog_and_profile_enrich_context() {
    let mock = Arc::new(MockChatProvider::with_agent_defaults("mock"));
    let catalog: Arc<dyn ProblemCatalog> = Arc::new(InMemoryProblemCatalog::from_problems([
        ProblemContext {
            problem_id: "1352C".to_string(),
            title: Some("K-th Not Divisible by n".to_string()),
            difficulty: Some(1200),
            tags: vec!["math".to_string(), "binary search".to_string()],
            ..ProblemContext::default()
        },
    ]));
    let profiles = Arc::new(InMemoryProfileStore::new());
    profiles
        .upsert(UserProfile {
            user_id: "gina".to_string(),
            weak_topics: vec!["binary search".to_string()],
            ..UserProfile::default()
        })
        .await;
    let profiles: Arc<dyn UserProfileStore> = profiles;

    let chat: Arc<dyn ChatModelFactory> = Arc::new(common::facade_with(mock));
    let pipeline = PipelineBuilder::new(Config::default())
        .with_chat(chat)
        .with_cache(common::memory_cache())
        .with_catalog(catalog)
        .with_profiles(profiles)
        .build()
        .await
        .unwrap();

    let state = pipeline
        .submit(FeedbackRequest::new(mock_data::wrong_answer("gina")))
        .await;

    assert_eq!(state.problem.as_ref().unwrap().difficulty, Some(1200));
    assert!(state.context.contains("K-th Not Divisible by n"));
    assert!(state.context.contains("binary search"));
    assert_eq!(state.profile.as_ref().unwrap().user_id, "gina");
}

#[tokio::test]
async fn test_invalidate_user_cache_forces_fresh_calls() {
    let mock = Arc::new(MockChatProvider::with_agent_defaults("mock"));
    let memory = Arc::new(InMemoryMistakeMemory::new());
    let pipeline = pipeline(Arc::clone(&mock), memory).await;
    let request = FeedbackRequest::new(mock_data::wrong_answer("hank"));

    pipeline.run_to_completion(request.clone()).await;
    assert!(pipeline.invalidate_user_cache("hank").await >= 2);
    assert_eq!(pipeline.invalidate_user_cache("nobody").await, 0);

    pipeline.run_to_completion(request).await;
    assert_eq!(mock.calls_matching("\"focus_topics\""), 2);
}
