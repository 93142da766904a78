//! codementor CLI entry point.

use clap::Parser;

use codementor::cli::{handle_error, Cli, Commands};
use codementor::infrastructure::config::ConfigLoader;
use codementor::infrastructure::logging::{LogConfig, LoggerImpl};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match ConfigLoader::load_with(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => handle_error(err, cli.json),
    };

    let _logger = match LoggerImpl::init(&LogConfig::from(&config.logging)) {
        Ok(logger) => logger,
        Err(err) => handle_error(err, cli.json),
    };

    let result = match cli.command {
        Commands::Analyze(args) => {
            codementor::cli::commands::analyze::execute(args, config, cli.json).await
        }
        Commands::Plan(args) => codementor::cli::commands::plan::execute(args, config, cli.json).await,
        Commands::Cache(args) => {
            codementor::cli::commands::cache::execute(args, config, cli.json).await
        }
        Commands::Config(args) => {
            codementor::cli::commands::config::execute(args, config, cli.json).await
        }
    };

    if let Err(err) = result {
        handle_error(err, cli.json);
    }
}
