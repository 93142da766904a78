//! Command-line interface.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::analyze::AnalyzeArgs;
use commands::cache::CacheArgs;
use commands::config::ConfigArgs;
use commands::plan::PlanArgs;

/// Top-level command line.
#[derive(Parser, Debug)]
#[command(name = "codementor")]
#[command(about = "Feedback pipeline for competitive programming submissions", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to .codementor/config.yaml)
    #[arg(short, long, global = true, env = "CODEMENTOR_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the feedback pipeline on a submission file
    Analyze(AnalyzeArgs),
    /// Show the execution plan for a verdict
    Plan(PlanArgs),
    /// Response cache maintenance
    Cache(CacheArgs),
    /// Configuration inspection
    Config(ConfigArgs),
}

/// Print `err` in the selected output mode and exit non-zero.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        let body = serde_json::json!({
            "error": err.to_string(),
            "causes": err.chain().skip(1).map(ToString::to_string).collect::<Vec<_>>(),
        });
        eprintln!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("Error: {err}");
        for cause in err.chain().skip(1) {
            eprintln!("  caused by: {cause}");
        }
    }
    std::process::exit(1)
}
