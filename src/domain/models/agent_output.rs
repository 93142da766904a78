//! Structured outputs produced by the domain agents.
//!
//! Every output type implements [`StructuredOutput`], which gives the agent
//! runner one generic way to describe, parse, validate and default a result.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::errors::SchemaError;

/// Maximum length of a compressed hint, in characters.
pub const MAX_HINT_CHARS: usize = 280;

/// A schema-validated agent result.
pub trait StructuredOutput:
    Serialize + DeserializeOwned + Clone + Send + Sync + std::fmt::Debug + 'static
{
    /// JSON shape the model is instructed to produce.
    fn schema_hint() -> &'static str;

    /// Static schema-valid default used when live inference fails.
    fn fallback() -> Self;

    /// Semantic checks beyond what deserialization enforces.
    fn validate(&self) -> Result<(), SchemaError> {
        Ok(())
    }

    /// Build from an already-parsed JSON value (e.g. a cache entry).
    fn from_value(value: Value) -> Result<Self, SchemaError> {
        let parsed: Self = serde_json::from_value(value)?;
        parsed.validate()?;
        Ok(parsed)
    }

    /// Parse raw model text: strip markdown fences, locate the JSON object,
    /// deserialize and validate.
    fn parse(raw: &str) -> Result<Self, SchemaError> {
        let stripped = strip_markdown_code_blocks(raw);
        let json = extract_json_object(&stripped).ok_or(SchemaError::NoJsonObject)?;
        let parsed: Self = serde_json::from_str(json)?;
        parsed.validate()?;
        Ok(parsed)
    }
}

/// Remove a surrounding ```` ```json ... ``` ```` fence if present.
pub fn strip_markdown_code_blocks(output: &str) -> String {
    let trimmed = output.trim();
    if trimmed.len() >= 6 && trimmed.starts_with("```") && trimmed.ends_with("```") {
        let start = trimmed.find('\n').map_or(3, |pos| pos + 1);
        let end = trimmed.rfind("\n```").unwrap_or(trimmed.len() - 3);
        if start <= end {
            return trimmed[start..end].trim().to_string();
        }
    }
    trimmed.to_string()
}

/// Slice from the first `{` to the last `}`.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

/// Explanation and improvement advice for one submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackResponse {
    /// Why the submission got its verdict.
    pub explanation: String,
    /// One actionable fix.
    pub improvement_hint: String,
    /// Mistake pattern, if one stands out.
    #[serde(default)]
    pub detected_pattern: Option<String>,
    /// Inputs worth testing.
    #[serde(default)]
    pub edge_cases: Vec<String>,
    /// Remark on time or memory complexity.
    #[serde(default)]
    pub complexity_note: Option<String>,
}

impl FeedbackResponse {
    /// Fixed feedback for accepted submissions.
    pub fn accepted() -> Self {
        Self {
            explanation: "Your solution was accepted. All tests passed.".to_string(),
            improvement_hint: "Consider reviewing time and memory usage or trying a harder problem."
                .to_string(),
            detected_pattern: None,
            edge_cases: Vec::new(),
            complexity_note: None,
        }
    }
}

impl StructuredOutput for FeedbackResponse {
    fn schema_hint() -> &'static str {
        r#"{"explanation": string, "improvement_hint": string, "detected_pattern": string | null, "edge_cases": [string], "complexity_note": string | null}"#
    }

    fn fallback() -> Self {
        Self {
            explanation: "We could not analyze this submission in detail right now. \
                          Compare your output with the expected output on small cases."
                .to_string(),
            improvement_hint: "Re-read the constraints and test boundary inputs such as the \
                               smallest and largest allowed values."
                .to_string(),
            detected_pattern: None,
            edge_cases: Vec::new(),
            complexity_note: None,
        }
    }

    fn validate(&self) -> Result<(), SchemaError> {
        if self.explanation.trim().is_empty() {
            return Err(SchemaError::invalid("explanation", "must not be empty"));
        }
        if self.improvement_hint.trim().is_empty() {
            return Err(SchemaError::invalid("improvement_hint", "must not be empty"));
        }
        Ok(())
    }
}

/// Recurring-mistake classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternDetection {
    /// Pattern name, if any was recognised.
    #[serde(default)]
    pub detected_pattern: Option<String>,
    /// Confidence in `[0, 1]`.
    #[serde(default)]
    pub confidence: f64,
    /// Whether the pattern matches earlier mistakes.
    #[serde(default)]
    pub is_recurring: bool,
    /// Code fragments or memory lines backing the call.
    #[serde(default)]
    pub evidence: Vec<String>,
}

impl StructuredOutput for PatternDetection {
    fn schema_hint() -> &'static str {
        r#"{"detected_pattern": string | null, "confidence": number between 0 and 1, "is_recurring": boolean, "evidence": [string]}"#
    }

    fn fallback() -> Self {
        Self {
            detected_pattern: None,
            confidence: 0.0,
            is_recurring: false,
            evidence: Vec::new(),
        }
    }

    fn validate(&self) -> Result<(), SchemaError> {
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(SchemaError::invalid(
                "confidence",
                format!("{} is outside 0..=1", self.confidence),
            ));
        }
        Ok(())
    }
}

/// One short actionable hint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintResponse {
    /// Single short hint.
    pub hint: String,
}

impl StructuredOutput for HintResponse {
    fn schema_hint() -> &'static str {
        r#"{"hint": string (at most 280 characters)}"#
    }

    fn fallback() -> Self {
        Self {
            hint: "Check the edge cases: empty input, a single element, and the maximum \
                   constraint values."
                .to_string(),
        }
    }

    fn validate(&self) -> Result<(), SchemaError> {
        let chars = self.hint.trim().chars().count();
        if chars == 0 {
            return Err(SchemaError::invalid("hint", "must not be empty"));
        }
        if chars > MAX_HINT_CHARS {
            return Err(SchemaError::invalid(
                "hint",
                format!("{chars} characters exceeds {MAX_HINT_CHARS}"),
            ));
        }
        Ok(())
    }
}

/// Topics and practice suggestions for the next sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningRecommendation {
    /// Topics to study next.
    #[serde(default)]
    pub focus_topics: Vec<String>,
    /// Concrete practice suggestions.
    #[serde(default)]
    pub recommended_practice: Vec<String>,
    /// Why these topics.
    pub rationale: String,
}

impl StructuredOutput for LearningRecommendation {
    fn schema_hint() -> &'static str {
        r#"{"focus_topics": [string], "recommended_practice": [string], "rationale": string}"#
    }

    fn fallback() -> Self {
        Self {
            focus_topics: Vec::new(),
            recommended_practice: Vec::new(),
            rationale: "insufficient signal to recommend topics".to_string(),
        }
    }
}

/// Direction of the next difficulty step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyAction {
    /// Harder problems.
    Increase,
    /// Same level.
    Maintain,
    /// Easier problems.
    Decrease,
}

impl DifficultyAction {
    /// Lowercase wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Increase => "increase",
            Self::Maintain => "maintain",
            Self::Decrease => "decrease",
        }
    }
}

/// Suggested change to the difficulty of upcoming problems.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyAdjustment {
    /// Recommended direction.
    pub action: DifficultyAction,
    /// Target problem rating, if the model gave one.
    #[serde(default)]
    pub suggested_rating: Option<u32>,
    /// Why this direction.
    pub rationale: String,
}

impl StructuredOutput for DifficultyAdjustment {
    fn schema_hint() -> &'static str {
        r#"{"action": "increase" | "maintain" | "decrease", "suggested_rating": integer | null, "rationale": string}"#
    }

    fn fallback() -> Self {
        Self {
            action: DifficultyAction::Maintain,
            suggested_rating: None,
            rationale: "insufficient signal to adjust difficulty".to_string(),
        }
    }
}

/// Periodic progress summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyReport {
    /// One-paragraph overview.
    pub summary: String,
    /// What went well.
    #[serde(default)]
    pub strengths: Vec<String>,
    /// What to work on.
    #[serde(default)]
    pub areas_to_improve: Vec<String>,
    /// Mistakes seen more than once.
    #[serde(default)]
    pub recurring_patterns: Vec<String>,
    /// Goals for the coming week.
    #[serde(default)]
    pub next_week_goals: Vec<String>,
}

impl StructuredOutput for WeeklyReport {
    fn schema_hint() -> &'static str {
        r#"{"summary": string, "strengths": [string], "areas_to_improve": [string], "recurring_patterns": [string], "next_week_goals": [string]}"#
    }

    fn fallback() -> Self {
        Self {
            summary: "Not enough activity to summarize this week.".to_string(),
            strengths: Vec::new(),
            areas_to_improve: Vec::new(),
            recurring_patterns: Vec::new(),
            next_week_goals: Vec::new(),
        }
    }

    fn validate(&self) -> Result<(), SchemaError> {
        if self.summary.trim().is_empty() {
            return Err(SchemaError::invalid("summary", "must not be empty"));
        }
        Ok(())
    }
}
