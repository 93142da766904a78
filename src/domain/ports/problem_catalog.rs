//! Problem metadata lookup port.

use async_trait::async_trait;

use crate::domain::models::ProblemContext;

/// Lookup of problem metadata by id.
#[async_trait]
pub trait ProblemCatalog: Send + Sync {
    /// Metadata for `problem_id`, or `None` if unknown.
    async fn get_problem(&self, problem_id: &str) -> anyhow::Result<Option<ProblemContext>>;
}
