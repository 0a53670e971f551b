//! Configuration file loading for loom
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `LOOM_` environment variables (`LOOM_AGENT__MODEL=...`)
//! 2. `--config <path>` specified file
//! 3. Project root: `./loom.toml` or `./.loom.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/loom/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigError, ConfigIssue, ConfigIssueCode, FileAgentConfig, FileConfig, FileOutputConfig,
    Severity,
};
pub use loader::ConfigLoader;
