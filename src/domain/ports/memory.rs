//! Mistake-memory ports.
//!
//! Both are best-effort collaborators: callers degrade retrieval failures to
//! an empty list and swallow storage failures.

use async_trait::async_trait;

/// Read side of the mistake memory.
#[async_trait]
pub trait MemoryRetriever: Send + Sync {
    /// Up to `k` past-mistake summaries relevant to `query`, most relevant first.
    async fn retrieve(&self, user_id: &str, query: &str, k: usize) -> anyhow::Result<Vec<String>>;
}

/// Write side of the mistake memory.
#[async_trait]
pub trait MemoryStore: Send + Sync {
    /// Record one mistake summary.
    async fn store(
        &self,
        user_id: &str,
        problem_id: &str,
        category: &str,
        mistake_summary: &str,
    ) -> anyhow::Result<()>;
}
