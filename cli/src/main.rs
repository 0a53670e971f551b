//! CLI entrypoint for loom
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod commands;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use commands::{Cli, Command};
use loom_infrastructure::{ConfigLoader, FileConfig, Scenario};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level, RUST_LOG wins when set
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")?
    };

    for warning in config.ensure_valid()? {
        warn!("{}", warning.message);
    }

    if !config.output.color {
        colored::control::set_override(false);
    }

    match cli.command {
        Command::Run { scenario, stream } => run(&scenario, stream, &config).await,
        Command::Config => {
            ConfigLoader::print_config_sources();
            println!();
            println!("{:#?}", config);
            Ok(())
        }
    }
}

async fn run(path: &Path, stream: bool, config: &FileConfig) -> Result<()> {
    let scenario = Scenario::load(path)?;
    let stream = stream || config.output.stream;

    // === Dependency Injection ===
    let platform = Arc::new(scenario.platform());
    let agent = scenario.build_agent(platform.clone(), &config.agent);

    info!(model = %agent.model(), stream, "Running scenario");

    let mut result = agent
        .call(scenario.conversation(), scenario.options(stream))
        .await?;
    output::print_result(&mut result, &config.output).await?;

    if platform.remaining() > 0 {
        warn!(
            unused = platform.remaining(),
            "Scenario has scripted turns that were never requested"
        );
    }

    Ok(())
}
