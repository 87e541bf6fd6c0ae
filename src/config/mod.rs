//! Configuration loading and management

mod io;
mod settings;

pub use settings::EngineSettings;

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Engine tunables (`[engine]` table)
    #[serde(default)]
    pub engine: EngineSettings,
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load configuration for a directory
    /// Looks for: <dir>/.uplay/config.toml, then ~/.uplay/config.toml
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let local_path = Self::local_config_path(dir);
        if local_path.exists() {
            return Self::from_file(&local_path);
        }

        let global_path = Self::global_config_path();
        if global_path.exists() {
            return Self::from_file(&global_path);
        }

        tracing::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load from an explicit path if given, otherwise search `dir`
    pub fn load(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        let config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => Self::from_dir(dir)?,
        };

        config
            .engine
            .validate()
            .context("Invalid [engine] settings")?;

        Ok(config)
    }
}
