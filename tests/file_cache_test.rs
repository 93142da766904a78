//! Local file cache behaviour through the public cache port.

mod common;

use std::sync::Arc;
use std::time::Duration;

use codementor::adapters::cache::{build_response_cache, FileResponseCache};
use codementor::adapters::llm::MockChatProvider;
use codementor::domain::models::agent_output::LearningRecommendation;
use codementor::domain::models::config::{CacheBackend, CacheConfig};
use codementor::domain::models::StructuredOutput;
use codementor::domain::ports::{ChatModelFactory, ResponseCache};
use codementor::services::cache_key::key_for;
use codementor::AgentRunner;
use serde_json::json;

#[tokio::test]
async fn test_entries_survive_a_new_instance() {
    let dir = common::temp_dir();
    let submission = common::mock_data::wrong_answer("u1");
    let key = key_for("learning", &submission);

    let first = FileResponseCache::new(dir.path(), Some(Duration::from_secs(3600)));
    first.set(&key, &json!({"focus_topics": ["dp"]}), None).await;

    let second = FileResponseCache::new(dir.path(), Some(Duration::from_secs(3600)));
    assert_eq!(second.get(&key).await, Some(json!({"focus_topics": ["dp"]})));
    assert_eq!(second.stats().hits, 1);
}

#[tokio::test]
async fn test_invalidate_user_keeps_other_users() {
    let dir = common::temp_dir();
    let cache = FileResponseCache::new(dir.path(), None);

    let alice = common::mock_data::wrong_answer("alice");
    let bob = common::mock_data::wrong_answer("bob");
    for agent in ["learning", "difficulty", "pattern_detection"] {
        cache.set(&key_for(agent, &alice), &json!({"agent": agent}), None).await;
    }
    cache.set(&key_for("learning", &bob), &json!({"agent": "learning"}), None).await;

    assert_eq!(cache.invalidate_user("alice").await, 3);
    assert_eq!(cache.invalidate_user("alice").await, 0);
    assert!(cache.get(&key_for("learning", &alice)).await.is_none());
    assert!(cache.get(&key_for("learning", &bob)).await.is_some());
}

#[tokio::test]
async fn test_user_ids_with_separators_do_not_collide() {
    let dir = common::temp_dir();
    let cache = FileResponseCache::new(dir.path(), None);

    let dotted = common::mock_data::wrong_answer("a.b");
    let plain = common::mock_data::wrong_answer("a");
    cache.set(&key_for("learning", &dotted), &json!(1), None).await;
    cache.set(&key_for("learning", &plain), &json!(2), None).await;

    assert_eq!(cache.invalidate_user("a").await, 1);
    assert_eq!(cache.get(&key_for("learning", &dotted)).await, Some(json!(1)));
}

#[tokio::test]
async fn test_missing_directory_is_created_on_write() {
    let dir = common::temp_dir();
    let nested = dir.path().join("deep").join("cache");
    let cache = FileResponseCache::new(&nested, None);
    let key = key_for("difficulty", &common::mock_data::wrong_answer("u1"));

    assert_eq!(cache.invalidate_user("u1").await, 0);
    cache.set(&key, &json!({"action": "maintain"}), None).await;
    assert!(nested.exists());
    assert!(cache.get(&key).await.is_some());
}

#[tokio::test]
async fn test_runner_reuses_file_cache_across_restarts() {
    let dir = common::temp_dir();
    let config = CacheConfig {
        backend: CacheBackend::Local,
        local_dir: dir.path().to_string_lossy().into_owned(),
        ..CacheConfig::default()
    };
    let submission = common::mock_data::wrong_answer("u1");
    let key = key_for("learning", &submission);

    let mock = Arc::new(MockChatProvider::with_agent_defaults("mock"));
    let chat: Arc<dyn ChatModelFactory> = Arc::new(common::facade_with(Arc::clone(&mock)));

    let cache: Arc<dyn ResponseCache> = build_response_cache(&config).await;
    assert_eq!(cache.name(), "local");
    let runner = AgentRunner::new(Arc::clone(&chat), cache);
    let first: LearningRecommendation = runner
        .run_agent("learning", "context", &key, "Recommend topics.", LearningRecommendation::fallback())
        .await;

    // Fresh cache instance over the same directory.
    let restarted = AgentRunner::new(chat, build_response_cache(&config).await);
    let second: LearningRecommendation = restarted
        .run_agent("learning", "context", &key, "Recommend topics.", LearningRecommendation::fallback())
        .await;

    assert_eq!(first, second);
    assert_eq!(mock.calls(), 1);
}
