//! Problem catalog held in memory, optionally loaded from JSON.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::domain::models::ProblemContext;
use crate::domain::ports::ProblemCatalog;

/// Problem catalog held in memory, optionally loaded from a JSON array file.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProblemCatalog {
    problems: HashMap<String, ProblemContext>,
}

impl InMemoryProblemCatalog {
    /// Empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog seeded with `problems`, keyed by problem id.
    pub fn from_problems(problems: impl IntoIterator<Item = ProblemContext>) -> Self {
        Self {
            problems: problems
                .into_iter()
                .map(|p| (p.problem_id.clone(), p))
                .collect(),
        }
    }

    /// Load a JSON array of problems.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read problem catalog {}", path.display()))?;
        let problems: Vec<ProblemContext> = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid problem catalog JSON in {}", path.display()))?;
        Ok(Self::from_problems(problems))
    }

    /// Number of known problems.
    pub fn len(&self) -> usize {
        self.problems.len()
    }

    /// True when the catalog holds no problems.
    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }
}

#[async_trait]
impl ProblemCatalog for InMemoryProblemCatalog {
    async fn get_problem(&self, problem_id: &str) -> Result<Option<ProblemContext>> {
        Ok(self.problems.get(problem_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_load_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"problem_id": "1000A", "title": "Sum", "difficulty": 800, "tags": ["math"]}}]"#
        )
        .unwrap();

        let catalog = InMemoryProblemCatalog::load_json(file.path()).unwrap();
        assert_eq!(catalog.len(), 1);
        let problem = catalog.get_problem("1000A").await.unwrap().unwrap();
        assert_eq!(problem.title.as_deref(), Some("Sum"));
        assert!(catalog.get_problem("missing").await.unwrap().is_none());
    }

    #[test]
    fn test_load_invalid_json_fails() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ not an array").unwrap();
        assert!(InMemoryProblemCatalog::load_json(file.path()).is_err());
    }
}
