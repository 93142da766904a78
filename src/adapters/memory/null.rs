//! Null mistake memory.
//!
//! Used when memory features are disabled: retrieval is always empty and
//! storage drops everything.

use async_trait::async_trait;

use crate::domain::ports::{MemoryRetriever, MemoryStore};

/// Memory that stores nothing and retrieves nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullMistakeMemory;

impl NullMistakeMemory {
    /// New no-op memory.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MemoryRetriever for NullMistakeMemory {
    async fn retrieve(&self, _user_id: &str, _query: &str, _k: usize) -> anyhow::Result<Vec<String>> {
        Ok(Vec::new())
    }
}

#[async_trait]
impl MemoryStore for NullMistakeMemory {
    async fn store(
        &self,
        _user_id: &str,
        _problem_id: &str,
        _category: &str,
        _mistake_summary: &str,
    ) -> anyhow::Result<()> {
        Ok(())
    }
}
