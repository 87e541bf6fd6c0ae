use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "uplay")]
#[command(about = "Interactive playback event engine - checkpoints and quizzes synced to video")]
#[command(version)]
struct Cli {
    /// Directory to resolve .uplay/config.toml from (defaults to current directory)
    #[arg(short, long, global = true)]
    path: Option<PathBuf>,

    /// Path to the config file (overrides the .uplay/config.toml lookup)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and validate a video asset, then print its event timeline
    Validate {
        /// Asset file (.json, .yaml, .yml or .toml)
        asset: PathBuf,
    },

    /// Replay a scripted viewing session against an asset
    Simulate {
        /// Asset file (.json, .yaml, .yml or .toml)
        asset: PathBuf,

        /// Script file listing the viewer's actions
        script: PathBuf,

        /// Override the configured position update period
        #[arg(long)]
        update_period_ms: Option<u64>,

        /// Print the final stats as JSON
        #[arg(long)]
        json: bool,
    },

    /// Initialize a new .uplay/config.toml configuration file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    // Determine the working directory
    let work_dir = cli.path.unwrap_or_else(|| PathBuf::from("."));

    match cli.command {
        Commands::Validate { asset } => {
            cli::validate::validate_command(&asset).await?;
        }
        Commands::Simulate {
            asset,
            script,
            update_period_ms,
            json,
        } => {
            let options = cli::simulate::SimulateOptions {
                config_path: cli.config,
                update_period_ms,
                json,
            };
            cli::simulate::simulate_command(&work_dir, &asset, &script, options).await?;
        }
        Commands::Init { force } => {
            cli::init::init_command(&work_dir, cli.config, force).await?;
        }
    }

    Ok(())
}
