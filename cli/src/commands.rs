//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for loom
#[derive(Parser, Debug)]
#[command(name = "loom")]
#[command(author, version, about = "Tool-calling agent runner with streaming splice support")]
#[command(long_about = r#"
Loom drives a model through tool-calling turns until it produces a final
answer, buffered or streamed.

`loom run` replays a scenario file: the model turns are scripted, the
tools are canned, and everything in between (tool execution, iteration
limits, stream splicing, source and token accounting) runs for real.

Configuration files are loaded from (in priority order):
1. LOOM_* environment variables (LOOM_AGENT__MAX_TOOL_ITERATIONS=3)
2. --config <path>     Explicit config file
3. ./loom.toml         Project-level config
4. ~/.config/loom/config.toml   Global config

Example:
  loom run scenarios/weather.toml
  loom run --stream -vv scenarios/mayor.toml
  loom config
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a scenario file through the agent
    Run {
        /// Scenario file (TOML)
        #[arg(value_name = "SCENARIO")]
        scenario: PathBuf,

        /// Stream the answer instead of waiting for the full response
        #[arg(short, long)]
        stream: bool,
    },

    /// Show configuration file locations and the effective configuration
    Config,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run() {
        let cli = Cli::try_parse_from(["loom", "run", "--stream", "-vv", "mayor.toml"]).unwrap();

        assert_eq!(cli.verbose, 2);
        let Command::Run { scenario, stream } = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(scenario, PathBuf::from("mayor.toml"));
        assert!(stream);
    }

    #[test]
    fn test_parse_config_with_global_flags() {
        let cli = Cli::try_parse_from(["loom", "--no-config", "config"]).unwrap();

        assert!(cli.no_config);
        assert!(matches!(cli.command, Command::Config));
    }

    #[test]
    fn test_run_requires_scenario() {
        assert!(Cli::try_parse_from(["loom", "run"]).is_err());
    }
}
