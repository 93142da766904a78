//! `codementor config`: inspect the effective configuration.

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;

/// Arguments for `config`.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Config subcommand to run.
    #[command(subcommand)]
    pub command: ConfigCommands,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the merged configuration with API keys redacted
    Show,
}

/// Result of `config show`.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct ConfigOutput {
    /// Effective merged configuration.
    pub config: Config,
}

impl CommandOutput for ConfigOutput {
    fn to_human(&self) -> String {
        serde_yaml::to_string(&self.config).unwrap_or_default()
    }
}

/// Run a config subcommand.
pub async fn execute(args: ConfigArgs, config: Config, json_mode: bool) -> Result<()> {
    match args.command {
        ConfigCommands::Show => {
            let out = ConfigOutput {
                config: config.redacted(),
            };
            output(&out, json_mode);
        }
    }
    Ok(())
}
