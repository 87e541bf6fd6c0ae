//! Validate command implementation

use anyhow::Result;
use std::path::Path;

use uplay::catalog;
use uplay::RewardKind;

/// Load an asset and print its event timeline
pub async fn validate_command(asset_path: &Path) -> Result<()> {
    let asset = catalog::load_asset_file(asset_path)?;

    println!(
        "Asset '{}'{} - {:.1}s",
        asset.id(),
        asset
            .title()
            .map(|t| format!(" ({})", t))
            .unwrap_or_default(),
        asset.duration_seconds()
    );

    if asset.checkpoints().is_empty() {
        println!("\nNo checkpoints.");
    } else {
        println!("\nCheckpoints ({}):", asset.checkpoints().len());
        for checkpoint in asset.checkpoints() {
            println!(
                "  {:>8.2}s  {}  +{} {}",
                checkpoint.timestamp_seconds,
                checkpoint.label(),
                checkpoint.reward_amount,
                checkpoint.reward_kind
            );
        }
    }

    if asset.questions().is_empty() {
        println!("\nNo questions.");
    } else {
        println!("\nQuestions ({}):", asset.questions().len());
        for question in asset.questions() {
            println!(
                "  {:>8.2}s  {} (±{}s, {} options)  +{} {}",
                question.timestamp_seconds,
                question.id,
                question.tolerance_seconds,
                question.options.len(),
                question.reward_amount,
                RewardKind::Primary
            );
            if !question.prompt.is_empty() {
                println!("    {}", question.prompt);
            }
            if let Some(limit) = question.time_limit_seconds {
                println!("    Time limit: {}s", limit);
            }
        }
    }

    println!(
        "\nRewards available: {} primary, {} secondary",
        asset.reward_available(RewardKind::Primary),
        asset.reward_available(RewardKind::Secondary)
    );

    Ok(())
}
