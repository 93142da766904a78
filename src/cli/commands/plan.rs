//! `codementor plan`: show which stages a verdict triggers.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{Config, ExecutionPlan, Verdict};
use crate::services::Orchestrator;

/// Arguments for `plan`.
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Verdict as reported by the judge (e.g. "Accepted", "WA", "TLE")
    #[arg(short, long)]
    pub verdict: String,

    /// Request the weekly report
    #[arg(long)]
    pub weekly_report: bool,
}

/// Result of `plan`.
#[derive(Debug, Serialize)]
pub struct PlanOutput {
    /// Parsed verdict.
    pub verdict: Verdict,
    /// Stage flags the orchestrator chose.
    pub plan: ExecutionPlan,
}

impl CommandOutput for PlanOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![format!("Execution plan for {}:", self.verdict)];
        for (stage, run) in self.plan.iter() {
            let mark = if run { "run" } else { "skip" };
            lines.push(format!("  {:<20} {mark}", stage.as_str()));
        }
        lines.join("\n")
    }
}

/// Print the execution plan for a verdict without calling any model.
pub async fn execute(args: PlanArgs, config: Config, json_mode: bool) -> Result<()> {
    let orchestrator =
        Orchestrator::new(config.workflow.memory_policy, config.workflow.hint_policy);
    let verdict = Verdict::parse(&args.verdict);
    let plan = orchestrator.plan(&verdict, args.weekly_report);

    output(&PlanOutput { verdict, plan }, json_mode);
    Ok(())
}
