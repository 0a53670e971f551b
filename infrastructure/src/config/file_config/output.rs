//! Output configuration from TOML (`[output]` section)

use serde::{Deserialize, Serialize};

/// Raw output configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Request streamed results by default
    pub stream: bool,
    /// Print aggregated token usage after the answer
    pub show_usage: bool,
    /// Print collected sources after the answer
    pub show_sources: bool,
    /// Enable colored terminal output
    pub color: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            stream: false,
            show_usage: true,
            show_sources: true,
            color: true,
        }
    }
}
