//! ovrgen -- weekly filtered OpenVAS report generation.
//!
//! Entry point: parse arguments, load configuration once, initialize
//! logging, dispatch to the command handler, and map errors to exit codes.

mod cli;
mod commands;
mod error;
mod logging;
mod output;

use clap::Parser;
use colored::Colorize;

use ovrgen_core::config::{GeneralConfig, OvrgenConfig};

use cli::{Cli, Commands};
use error::CliError;
use output::OutputWriter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = tokio::select! {
        result = run(cli) => result,
        _ = tokio::signal::ctrl_c() => Err(CliError::Interrupted),
    };

    if let Err(e) = result {
        eprintln!("{} {e}", "error:".red().bold());
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let loaded = OvrgenConfig::load(&cli.config).await;

    let general = match &loaded {
        Ok(config) => config.general.clone(),
        Err(_) => GeneralConfig::default(),
    };
    logging::init_tracing(&general, cli.log_level.as_deref())
        .map_err(|e| CliError::Command(e.to_string()))?;

    tracing::debug!(config = %cli.config.display(), "ovrgen starting");

    let writer = OutputWriter::new(cli.output);

    match cli.command {
        Commands::Config(args) => commands::config::execute(args, &cli.config, loaded, &writer),
        Commands::Run(args) => commands::run::execute(args, loaded?, &writer).await,
        Commands::Reports(args) => commands::reports::execute(args, loaded?, &writer).await,
        Commands::Feeds(args) => commands::feeds::execute(args, loaded?, &writer).await,
        Commands::Collect(args) => commands::collect::execute(args, loaded?, &writer).await,
    }
}
