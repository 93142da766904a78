//! Cached wrapper for ProblemCatalog using a moka TTL cache.
//!
//! Problem metadata is effectively static, so found problems are kept for
//! ten minutes in a cache bounded to 100 entries. Misses are not cached.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use moka::future::Cache;

use crate::domain::models::ProblemContext;
use crate::domain::ports::ProblemCatalog;

/// Default TTL for cached problems.
const PROBLEM_CACHE_TTL_SECS: u64 = 600;

/// Maximum number of cached problems.
const PROBLEM_CACHE_MAX_CAPACITY: u64 = 100;

/// Problem catalog decorator with a bounded in-process cache.
pub struct CachedProblemCatalog<C: ProblemCatalog> {
    inner: Arc<C>,
    by_id: Cache<String, Arc<ProblemContext>>,
}

impl<C: ProblemCatalog> CachedProblemCatalog<C> {
    /// Wrap `inner` with the default TTL.
    pub fn new(inner: Arc<C>) -> Self {
        Self::with_ttl(inner, Duration::from_secs(PROBLEM_CACHE_TTL_SECS))
    }

    /// Wrap `inner` with a custom TTL.
    pub fn with_ttl(inner: Arc<C>, ttl: Duration) -> Self {
        let by_id = Cache::builder()
            .max_capacity(PROBLEM_CACHE_MAX_CAPACITY)
            .time_to_live(ttl)
            .build();
        Self { inner, by_id }
    }
}

#[async_trait]
impl<C: ProblemCatalog + 'static> ProblemCatalog for CachedProblemCatalog<C> {
    async fn get_problem(&self, problem_id: &str) -> Result<Option<ProblemContext>> {
        if let Some(cached) = self.by_id.get(problem_id).await {
            return Ok(Some((*cached).clone()));
        }

        let result = self.inner.get_problem(problem_id).await?;
        if let Some(ref problem) = result {
            self.by_id
                .insert(problem_id.to_string(), Arc::new(problem.clone()))
                .await;
        }
        Ok(result)
    }
}
