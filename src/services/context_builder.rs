//! Assembles the natural-language context block handed to every agent.
//!
//! Sections, in order: problem, user profile, past mistakes, current
//! submission, followed by a fixed analysis instruction block. Absent fields
//! are omitted; absent sections say so explicitly.

use std::fmt::Write as _;

use crate::domain::models::{ProblemContext, Submission, UserProfile};

/// Default character budget applied by callers after [`build_context`].
pub const DEFAULT_MAX_CONTEXT_CHARS: usize = 3500;

/// Marker appended when [`truncate_context`] cuts text.
const TRUNCATION_MARKER: &str = "\n[context truncated]";

/// Appended verbatim to every context.
pub const ANALYSIS_INSTRUCTIONS: &str = "\
## Instructions
- Base the analysis on the submission, the problem and the user's history above.
- Name the most likely root cause of the verdict before suggesting fixes.
- Prefer hints that lead the user to the fix over giving the full solution.
- Mention boundary inputs that the code would mishandle.
- If the user repeats a past mistake, say so plainly.";

const NO_HISTORY: &str = "No history is available for this user yet.";
const NO_MEMORY: &str = "No similar past mistakes were found.";

/// Build the agent context. Pure; never fails.
pub fn build_context(
    submission: &Submission,
    user_memory: &[String],
    problem: Option<&ProblemContext>,
    profile: Option<&UserProfile>,
) -> String {
    let mut out = String::with_capacity(2048);

    out.push_str("## Problem\n");
    write_problem(&mut out, submission, problem);

    out.push_str("\n## User profile\n");
    match profile.filter(|p| !p.is_empty()) {
        Some(profile) => write_profile(&mut out, profile),
        None => {
            out.push_str(NO_HISTORY);
            out.push('\n');
        }
    }

    out.push_str("\n## Past mistakes\n");
    if user_memory.is_empty() {
        out.push_str(NO_MEMORY);
        out.push('\n');
    } else {
        for (i, entry) in user_memory.iter().enumerate() {
            let _ = writeln!(out, "{}. {}", i + 1, entry.trim());
        }
    }

    out.push_str("\n## Current submission\n");
    let _ = writeln!(out, "Language: {}", submission.language);
    let _ = writeln!(out, "Verdict: {}", submission.verdict);
    if let Some(error) = submission.error_type.as_deref().filter(|e| !e.is_empty()) {
        let _ = writeln!(out, "Error type: {error}");
    }
    let _ = writeln!(out, "Code:\n```\n{}\n```", submission.code.trim_end());

    out.push('\n');
    out.push_str(ANALYSIS_INSTRUCTIONS);
    out
}

fn write_problem(out: &mut String, submission: &Submission, problem: Option<&ProblemContext>) {
    let _ = writeln!(out, "Id: {}", submission.problem_id);
    if let Some(title) = problem.and_then(|p| p.title.as_deref()) {
        let _ = writeln!(out, "Title: {title}");
    }
    if let Some(difficulty) = problem.and_then(|p| p.difficulty) {
        let _ = writeln!(out, "Difficulty: {difficulty}");
    }

    let tags = problem.map(|p| p.tags.as_slice()).unwrap_or_default();
    if !tags.is_empty() {
        let _ = writeln!(out, "Tags: {}", tags.join(", "));
    } else if !submission.category.is_empty() {
        let _ = writeln!(out, "Category: {}", submission.category);
    }

    if let Some(approach) = problem.and_then(|p| p.expected_approach.as_deref()) {
        let _ = writeln!(out, "Expected approach: {approach}");
    }

    let constraints = problem
        .and_then(|p| p.constraints.as_deref())
        .filter(|c| !c.is_empty())
        .unwrap_or(submission.constraints.as_str());
    if !constraints.is_empty() {
        let _ = writeln!(out, "Constraints: {constraints}");
    }

    let mistakes = problem.map(|p| p.common_mistakes.as_slice()).unwrap_or_default();
    if !mistakes.is_empty() {
        let _ = writeln!(out, "Common mistakes: {}", mistakes.join("; "));
    }
}

fn write_profile(out: &mut String, profile: &UserProfile) {
    if !profile.recurring_mistakes.is_empty() {
        let _ = writeln!(out, "Recurring mistakes: {}", profile.recurring_mistakes.join("; "));
    }
    if !profile.weak_topics.is_empty() {
        let _ = writeln!(out, "Weak topics: {}", profile.weak_topics.join(", "));
    }
    if !profile.behavioral_patterns.is_empty() {
        let _ = writeln!(
            out,
            "Behavioral patterns: {}",
            profile.behavioral_patterns.join("; ")
        );
    }
    if let Some(stats) = &profile.stats {
        let _ = write!(
            out,
            "Submissions: {} ({} accepted, {:.0}% acceptance)",
            stats.total_submissions,
            stats.accepted,
            stats.acceptance_rate() * 100.0
        );
        if let Some(rating) = stats.rating {
            let _ = write!(out, ", rating {rating}");
        }
        out.push('\n');
    }
    if let Some(verdict) = profile.last_verdict.as_deref() {
        let _ = writeln!(out, "Last verdict: {verdict}");
    }
}

/// Bound `text` to `max_chars` characters.
///
/// Cuts at the last newline in the kept prefix when one exists in its second
/// half, and appends a truncation marker. The result never exceeds
/// `max_chars` characters and never splits a UTF-8 sequence.
pub fn truncate_context(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let marker_chars = TRUNCATION_MARKER.chars().count();
    if max_chars <= marker_chars {
        return text.chars().take(max_chars).collect();
    }

    let keep = max_chars - marker_chars;
    let cut = text.char_indices().nth(keep).map_or(text.len(), |(i, _)| i);
    let prefix = &text[..cut];
    let prefix = match prefix.rfind('\n') {
        Some(newline) if newline >= cut / 2 => &prefix[..newline],
        _ => prefix,
    };

    format!("{prefix}{TRUNCATION_MARKER}")
}
