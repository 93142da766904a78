//! `codementor analyze`: run the pipeline on one submission.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use crate::adapters::catalog::{CachedProblemCatalog, InMemoryProblemCatalog};
use crate::adapters::llm::MockChatProvider;
use crate::adapters::memory::InMemoryMistakeMemory;
use crate::cli::output::{bullet_section, output, CommandOutput};
use crate::domain::models::{Config, WorkflowState};
use crate::domain::ports::ChatProvider;
use crate::infrastructure::llm::{LlmFacade, ProviderCooldowns};
use crate::services::{FeedbackRequest, PipelineBuilder};

/// Arguments for `analyze`.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Submission JSON file
    pub file: PathBuf,

    /// Also produce the weekly progress report
    #[arg(long)]
    pub weekly_report: bool,

    /// Problem catalog JSON file (array of problems)
    #[arg(long)]
    pub problems: Option<PathBuf>,

    /// Run the background workflow inline and include its results
    #[arg(long)]
    pub wait: bool,

    /// Answer from canned model replies instead of calling providers
    #[arg(long)]
    pub offline: bool,
}

/// Result of `analyze`.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct AnalyzeOutput {
    /// Final workflow state.
    pub state: WorkflowState,
}

impl CommandOutput for AnalyzeOutput {
    fn to_human(&self) -> String {
        let state = &self.state;
        let submission = &state.submission;
        let mut sections = vec![format!(
            "Submission {} by {}: {}",
            submission.problem_id, submission.user_id, submission.verdict
        )];

        if let Some(feedback) = &state.feedback {
            sections.push(format!("Explanation:\n  {}", feedback.explanation));
            sections.push(format!("Improvement:\n  {}", feedback.improvement_hint));
            sections.push(bullet_section("Edge cases", &feedback.edge_cases));
            if let Some(note) = &feedback.complexity_note {
                sections.push(format!("Complexity:\n  {note}"));
            }
        }
        if let Some(pattern) = &state.pattern {
            let label = pattern.detected_pattern.as_deref().unwrap_or("none");
            let recurring = if pattern.is_recurring { ", recurring" } else { "" };
            sections.push(format!(
                "Pattern: {label} (confidence {:.2}{recurring})",
                pattern.confidence
            ));
        }
        if let Some(hint) = &state.hint {
            sections.push(format!("Hint: {hint}"));
        }
        if let Some(learning) = &state.learning {
            sections.push(bullet_section("Focus topics", &learning.focus_topics));
            sections.push(bullet_section("Practice", &learning.recommended_practice));
        }
        if let Some(difficulty) = &state.difficulty {
            let action = difficulty.action.as_str();
            let rating = difficulty
                .suggested_rating
                .map(|r| format!(" (target rating {r})"))
                .unwrap_or_default();
            sections.push(format!(
                "Difficulty: {action}{rating}\n  {}",
                difficulty.rationale
            ));
        }
        if let Some(report) = &state.weekly_report {
            sections.push(format!("Weekly report:\n  {}", report.summary));
            sections.push(bullet_section("Next week", &report.next_week_goals));
        }

        sections.retain(|s| !s.is_empty());
        sections.join("\n\n")
    }
}

fn offline_facade() -> Result<LlmFacade> {
    let provider: Arc<dyn ChatProvider> = Arc::new(MockChatProvider::with_agent_defaults("offline"));
    Ok(LlmFacade::new(
        Some(provider),
        None,
        Arc::new(ProviderCooldowns::default()),
    )?)
}

/// Run the feedback pipeline for one submission file.
pub async fn execute(args: AnalyzeArgs, config: Config, json_mode: bool) -> Result<()> {
    let raw = tokio::fs::read_to_string(&args.file)
        .await
        .with_context(|| format!("Failed to read submission file {}", args.file.display()))?;
    let mut request: FeedbackRequest = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid submission JSON in {}", args.file.display()))?;
    request.request_weekly_report |= args.weekly_report;

    let mut builder =
        PipelineBuilder::new(config).with_memory(Arc::new(InMemoryMistakeMemory::new()));
    if args.offline {
        builder = builder.with_chat(Arc::new(offline_facade()?));
    }
    if let Some(path) = &args.problems {
        let catalog = InMemoryProblemCatalog::load_json(path)?;
        builder = builder.with_catalog(Arc::new(CachedProblemCatalog::new(Arc::new(catalog))));
    }
    let pipeline = builder
        .build()
        .await
        .context("Failed to build feedback pipeline")?;

    let state = if args.wait {
        pipeline.run_to_completion(request).await
    } else {
        pipeline.submit(request).await
    };

    output(&AnalyzeOutput { state }, json_mode);
    Ok(())
}
