//! Simulation scripts
//!
//! A script is a list of viewer actions replayed against a session:
//!
//! ```yaml
//! steps:
//!   - position: 29.0
//!   - position: 31.0
//!   - answer: { question: q-basics, option: 1 }
//!   - wait_ms: 2000
//!   - ended
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use uplay::catalog::AssetFormat;

/// One viewer action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptStep {
    /// Player reports this position (seconds)
    Position(f64),
    /// Submit an option for a question
    Answer { question: String, option: usize },
    /// Dismiss a question without answering
    Skip(String),
    /// Advance the simulated clock
    WaitMs(u64),
    Pause,
    Resume,
    /// Player reports end of media
    Ended,
    /// Print a stats snapshot
    Stats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub steps: Vec<ScriptStep>,
}

impl Script {
    /// Parse a script in the given format
    pub fn parse(format: AssetFormat, content: &str) -> Result<Self> {
        let script: Script = match format {
            AssetFormat::Json => serde_json::from_str(content)?,
            AssetFormat::Yaml => serde_yaml::from_str(content)?,
            AssetFormat::Toml => toml::from_str(content)?,
        };
        Ok(script)
    }

    /// Load a script, choosing the format by extension
    pub fn from_file(path: &Path) -> Result<Self> {
        let format = AssetFormat::from_path(path).with_context(|| {
            format!(
                "Unsupported script file extension (expected .json, .yaml, .yml or .toml): {}",
                path.display()
            )
        })?;

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script file: {}", path.display()))?;

        Self::parse(format, &content)
            .with_context(|| format!("Failed to parse script file: {}", path.display()))
    }
}
