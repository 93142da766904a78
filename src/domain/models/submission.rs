//! Submissions and judge verdicts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Grading outcome of a code submission.
///
/// Parsing is lenient: judge-specific spellings such as `OK`, `WA`,
/// `TIME_LIMIT_EXCEEDED` or `Wrong answer on test 3` map onto the canonical
/// variants. Anything unrecognized is kept verbatim in `Other` and treated as
/// a failure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Verdict {
    /// AC.
    Accepted,
    /// WA.
    WrongAnswer,
    /// TLE.
    TimeLimitExceeded,
    /// MLE.
    MemoryLimitExceeded,
    /// RE.
    RuntimeError,
    /// CE.
    CompilationError,
    /// Any other judge label, kept verbatim.
    Other(String),
}

impl Verdict {
    /// Parse a verdict string from any judge.
    pub fn parse(raw: &str) -> Self {
        let normalized: String = raw
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c == '_' || c == '-' { ' ' } else { c })
            .collect();
        let normalized = normalized.split_whitespace().collect::<Vec<_>>().join(" ");

        match normalized.as_str() {
            "accepted" | "ac" | "ok" | "passed" => Self::Accepted,
            "wa" => Self::WrongAnswer,
            "tle" => Self::TimeLimitExceeded,
            "mle" => Self::MemoryLimitExceeded,
            "re" | "rte" => Self::RuntimeError,
            "ce" => Self::CompilationError,
            s if s.starts_with("wrong answer") => Self::WrongAnswer,
            s if s.starts_with("time limit") => Self::TimeLimitExceeded,
            s if s.starts_with("memory limit") => Self::MemoryLimitExceeded,
            s if s.starts_with("runtime error") => Self::RuntimeError,
            s if s.starts_with("compilation error") || s.starts_with("compile error") => {
                Self::CompilationError
            }
            _ => Self::Other(raw.trim().to_string()),
        }
    }

    /// Whether the submission passed.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    /// Whether the submission failed (every non-accepted verdict).
    pub fn is_failure(&self) -> bool {
        !self.is_accepted()
    }

    /// Canonical display label.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Accepted => "Accepted",
            Self::WrongAnswer => "Wrong Answer",
            Self::TimeLimitExceeded => "Time Limit Exceeded",
            Self::MemoryLimitExceeded => "Memory Limit Exceeded",
            Self::RuntimeError => "Runtime Error",
            Self::CompilationError => "Compilation Error",
            Self::Other(raw) => raw,
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Verdict {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<&str> for Verdict {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<Verdict> for String {
    fn from(verdict: Verdict) -> Self {
        verdict.as_str().to_string()
    }
}

/// A graded code submission: the required entry fields of a workflow run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    /// Submitting user.
    pub user_id: String,
    /// Problem id.
    pub problem_id: String,
    /// Problem category or primary tag (e.g. "dp", "graphs").
    #[serde(default)]
    pub category: String,
    /// Problem constraints as free text.
    #[serde(default)]
    pub constraints: String,
    /// Submitted source code.
    pub code: String,
    /// Source language.
    #[serde(default = "default_language")]
    pub language: String,
    /// Judge verdict.
    pub verdict: Verdict,
    /// Finer-grained failure label from the judge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,

    /// Incidental metadata. Never part of any cache key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
    /// Caller-supplied correlation id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<Uuid>,
}

fn default_language() -> String {
    "unknown".to_string()
}

impl Submission {
    /// Create a submission with the required fields; everything else empty.
    pub fn new(
        user_id: impl Into<String>,
        problem_id: impl Into<String>,
        code: impl Into<String>,
        verdict: impl Into<Verdict>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            problem_id: problem_id.into(),
            category: String::new(),
            constraints: String::new(),
            code: code.into(),
            language: default_language(),
            verdict: verdict.into(),
            error_type: None,
            submitted_at: None,
            request_id: None,
        }
    }

    /// Set the category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Set the language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Set the error type.
    pub fn with_error_type(mut self, error_type: impl Into<String>) -> Self {
        self.error_type = Some(error_type.into());
        self
    }

    /// Set the constraints text.
    pub fn with_constraints(mut self, constraints: impl Into<String>) -> Self {
        self.constraints = constraints.into();
        self
    }

    /// Full request payload as a JSON mapping, incidental metadata included.
    ///
    /// The cache key builder extracts only its normalized fields from this.
    pub fn cache_payload(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// Memory retrieval query: category plus error type.
    pub fn memory_query(&self) -> String {
        match self.error_type.as_deref() {
            Some(error) if !error.is_empty() => format!("{} {}", self.category, error)
                .trim()
                .to_string(),
            _ => format!("{} {}", self.category, self.verdict).trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_parsing() {
        assert_eq!(Verdict::parse("Accepted"), Verdict::Accepted);
        assert_eq!(Verdict::parse("OK"), Verdict::Accepted);
        assert_eq!(Verdict::parse("WRONG_ANSWER"), Verdict::WrongAnswer);
        assert_eq!(Verdict::parse("Wrong answer on test 3"), Verdict::WrongAnswer);
        assert_eq!(Verdict::parse("TLE"), Verdict::TimeLimitExceeded);
        assert_eq!(Verdict::parse("memory-limit-exceeded"), Verdict::MemoryLimitExceeded);
        assert_eq!(Verdict::parse("Runtime Error"), Verdict::RuntimeError);
        assert_eq!(Verdict::parse("CE"), Verdict::CompilationError);
        assert_eq!(
            Verdict::parse("Idleness limit exceeded"),
            Verdict::Other("Idleness limit exceeded".to_string())
        );
    }

    #[test]
    fn test_verdict_failure() {
        assert!(!Verdict::Accepted.is_failure());
        assert!(Verdict::WrongAnswer.is_failure());
        assert!(Verdict::Other("Skipped".to_string()).is_failure());
    }

    #[test]
    fn test_verdict_serde_roundtrip_uses_label() {
        let json = serde_json::to_string(&Verdict::TimeLimitExceeded).unwrap();
        assert_eq!(json, "\"Time Limit Exceeded\"");
        let back: Verdict = serde_json::from_str("\"TIME_LIMIT_EXCEEDED\"").unwrap();
        assert_eq!(back, Verdict::TimeLimitExceeded);
    }

    #[test]
    fn test_submission_deserialize_defaults() {
        let json = r#"{
            "user_id": "u1",
            "problem_id": "1000A",
            "code": "print(1)",
            "verdict": "Wrong Answer"
        }"#;
        let submission: Submission = serde_json::from_str(json).unwrap();
        assert_eq!(submission.language, "unknown");
        assert!(submission.category.is_empty());
        assert!(submission.error_type.is_none());
        assert!(submission.verdict.is_failure());
    }

    #[test]
    fn test_memory_query() {
        let submission = Submission::new("u1", "p1", "code", "Wrong Answer")
            .with_category("dp")
            .with_error_type("off-by-one");
        assert_eq!(submission.memory_query(), "dp off-by-one");

        let no_error = Submission::new("u1", "p1", "code", "TLE").with_category("graphs");
        assert_eq!(no_error.memory_query(), "graphs Time Limit Exceeded");
    }
}
