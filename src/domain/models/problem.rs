//! Problem and user profile context.

use serde::{Deserialize, Serialize};

/// Problem metadata used to ground agent context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemContext {
    /// Catalog id such as `1352C`.
    pub problem_id: String,
    /// Display title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Problem rating.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<u32>,
    /// Topic tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Intended solution outline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_approach: Option<String>,
    /// Input limits as text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<String>,
    /// Known pitfalls.
    #[serde(default)]
    pub common_mistakes: Vec<String>,
}

/// Aggregated learning history of one user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Profile owner.
    pub user_id: String,
    /// Mistakes the user repeats.
    #[serde(default)]
    pub recurring_mistakes: Vec<String>,
    /// Topics with low acceptance.
    #[serde(default)]
    pub weak_topics: Vec<String>,
    /// Habits observed across submissions.
    #[serde(default)]
    pub behavioral_patterns: Vec<String>,
    /// Aggregate submission counts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<ProfileStats>,
    /// Verdict of the previous submission.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_verdict: Option<String>,
}

impl UserProfile {
    /// True when the profile carries nothing worth showing to an agent.
    pub fn is_empty(&self) -> bool {
        self.recurring_mistakes.is_empty()
            && self.weak_topics.is_empty()
            && self.behavioral_patterns.is_empty()
            && self.stats.is_none()
            && self.last_verdict.is_none()
    }
}

/// Submission totals for a user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileStats {
    /// All graded submissions.
    pub total_submissions: u32,
    /// Accepted submissions.
    pub accepted: u32,
    /// Current rating, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u32>,
}

impl ProfileStats {
    /// Accepted over total, `0.0` with no submissions.
    pub fn acceptance_rate(&self) -> f64 {
        if self.total_submissions == 0 {
            0.0
        } else {
            f64::from(self.accepted) / f64::from(self.total_submissions)
        }
    }
}
