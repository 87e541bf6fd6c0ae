//! Init command implementation

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

use uplay::config::Config;

/// Default configuration content for uplay init
pub const DEFAULT_CONFIG: &str = r#"# uplay configuration
# ====================
#
# Engine tunables for interactive playback sessions.

[engine]
# How long answer feedback stays on screen before playback resumes
feedback_delay_ms = 2000

# Nominal interval between player position updates (a typical timeupdate cadence)
update_period_ms = 250

# A forward step longer than update_period_ms * contiguity_factor counts as a seek.
# Events inside a seeked-over range never fire.
contiguity_factor = 1.5

# Seconds before a question that doesn't set time_limit_seconds is skipped.
# Set to 0 to let such questions wait indefinitely.
default_question_time_limit_secs = 20.0
"#;

/// Write a default config to `config_path`, or `<work_dir>/.uplay/config.toml`
pub async fn init_command(work_dir: &Path, config_path: Option<PathBuf>, force: bool) -> Result<()> {
    let config_path = config_path.unwrap_or_else(|| Config::local_config_path(work_dir));

    if config_path.exists() && !force {
        bail!(
            "Configuration already exists: {}\nUse --force to overwrite.",
            config_path.display()
        );
    }

    // Create parent directory (if any)
    if let Some(parent) = config_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;
    println!("Created: {}", config_path.display());

    Ok(())
}
