//! Common test utilities for integration tests
//!
//! Provides shared fixtures, helpers, and test utilities used across
//! multiple integration test files.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use codementor::adapters::cache::{InMemoryKv, KvBackend, RemoteResponseCache};
use codementor::adapters::llm::MockChatProvider;
use codementor::domain::models::{Config, Submission};
use codementor::domain::ports::{ChatProvider, ResponseCache};
use codementor::infrastructure::llm::{LlmFacade, ProviderCooldowns};
use tempfile::TempDir;

/// Create a temporary directory for test isolation
///
/// Returns a TempDir that will be cleaned up when dropped.
#[allow(dead_code)]
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
/// Call this at the beginning of tests that need logging.
#[allow(dead_code)]
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Wait for an async condition to be true with timeout
///
/// Polls the predicate every 25ms until it returns true or timeout is reached.
#[allow(dead_code)]
pub async fn wait_for<F, Fut>(mut predicate: F, timeout_ms: u64) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let start = Instant::now();
    let timeout = Duration::from_millis(timeout_ms);

    while start.elapsed() < timeout {
        if predicate().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }

    false
}

/// Facade with a single primary provider.
#[allow(dead_code)]
pub fn facade_with(mock: Arc<MockChatProvider>) -> LlmFacade {
    let provider: Arc<dyn ChatProvider> = mock;
    LlmFacade::new(Some(provider), None, Arc::new(ProviderCooldowns::default()))
        .expect("one provider is enough")
}

/// Remote-style cache over an in-process key/value backend.
#[allow(dead_code)]
pub fn memory_cache() -> Arc<dyn ResponseCache> {
    let kv: Arc<dyn KvBackend> = Arc::new(InMemoryKv::new());
    Arc::new(RemoteResponseCache::new(Some(kv), Duration::from_secs(3600)))
}

/// Configuration that needs no credentials or disk.
#[allow(dead_code)]
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.llm.primary.api_key = Some("test-key".to_string());
    config
}

/// Mock data generators
pub mod mock_data {
    use super::Submission;

    /// Failed submission with a typical off-by-one bug
    #[allow(dead_code)]
    pub fn wrong_answer(user_id: &str) -> Submission {
        Submission::new(
            user_id,
            "1352C",
            "def kth(n, k):\n    return k + (k - 1) // (n - 1) - 1",
            "Wrong Answer",
        )
        .with_category("math")
        .with_language("python")
        .with_error_type("off-by-one")
        .with_constraints("1 <= n, k <= 1e9")
    }

    /// Accepted submission
    #[allow(dead_code)]
    pub fn accepted(user_id: &str) -> Submission {
        Submission::new(user_id, "4A", "w = int(input())\nprint('YES' if w > 2 and w % 2 == 0 else 'NO')", "Accepted")
            .with_category("math")
            .with_language("python")
    }
}
