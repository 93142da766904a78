//! Process-local mistake memory.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::ports::{MemoryRetriever, MemoryStore};

#[derive(Debug, Clone)]
struct MemoryEntry {
    problem_id: String,
    category: String,
    summary: String,
    stored_at: DateTime<Utc>,
}

impl MemoryEntry {
    fn snippet(&self) -> String {
        if self.category.is_empty() {
            format!("{}: {}", self.problem_id, self.summary)
        } else {
            format!("[{}] {}: {}", self.category, self.problem_id, self.summary)
        }
    }
}

/// Process-local mistake memory with token-overlap ranking.
///
/// Stands in for a vector store: entries are ranked by how many query tokens
/// they share, newest first on ties.
#[derive(Debug, Default)]
pub struct InMemoryMistakeMemory {
    entries: RwLock<HashMap<String, Vec<MemoryEntry>>>,
}

impl InMemoryMistakeMemory {
    /// Empty memory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries stored for `user_id`.
    pub async fn count(&self, user_id: &str) -> usize {
        self.entries
            .read()
            .await
            .get(user_id)
            .map_or(0, Vec::len)
    }
}

fn tokens(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() > 1)
        .map(str::to_lowercase)
        .collect()
}

#[async_trait]
impl MemoryRetriever for InMemoryMistakeMemory {
    async fn retrieve(&self, user_id: &str, query: &str, k: usize) -> anyhow::Result<Vec<String>> {
        let entries = self.entries.read().await;
        let Some(user_entries) = entries.get(user_id) else {
            return Ok(Vec::new());
        };

        let query_tokens = tokens(query);
        let mut scored: Vec<(usize, &MemoryEntry)> = user_entries
            .iter()
            .map(|entry| {
                let entry_tokens = tokens(&format!("{} {}", entry.category, entry.summary));
                (query_tokens.intersection(&entry_tokens).count(), entry)
            })
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0).then(b.1.stored_at.cmp(&a.1.stored_at)));

        Ok(scored
            .into_iter()
            .take(k)
            .map(|(_, entry)| entry.snippet())
            .collect())
    }
}

#[async_trait]
impl MemoryStore for InMemoryMistakeMemory {
    async fn store(
        &self,
        user_id: &str,
        problem_id: &str,
        category: &str,
        mistake_summary: &str,
    ) -> anyhow::Result<()> {
        if mistake_summary.trim().is_empty() {
            anyhow::bail!("refusing to store an empty mistake summary");
        }
        self.entries
            .write()
            .await
            .entry(user_id.to_string())
            .or_default()
            .push(MemoryEntry {
                problem_id: problem_id.to_string(),
                category: category.to_string(),
                summary: mistake_summary.to_string(),
                stored_at: Utc::now(),
            });
        Ok(())
    }
}
