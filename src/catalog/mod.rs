//! Event catalog: loading and validation of video assets
//!
//! A raw asset is deserialized from JSON, YAML or TOML and then validated
//! into an immutable [`VideoAsset`]. All invariants the engine relies on at
//! runtime are checked here, once:
//!
//! - duration is positive and finite
//! - ids are non-empty and unique across checkpoints and questions
//! - every timestamp lies within `[0, duration]`
//! - every `correct_index` addresses an existing option
//! - tolerances and time limits are sane
//!
//! # Example asset (YAML)
//!
//! ```yaml
//! id: intro-video
//! duration_seconds: 120
//! checkpoints:
//!   - id: cp-halfway
//!     timestamp_seconds: 60
//!     reward_amount: 5
//! questions:
//!   - id: q-basics
//!     timestamp_seconds: 90
//!     options: ["A", "B", "C"]
//!     correct_index: 1
//!     reward_amount: 10
//! ```

mod error;

pub use error::ValidationError;

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{Checkpoint, MAX_QUESTION_TIME_LIMIT_SECS, Question, VideoAsset};

/// Unvalidated asset as read from a file or received from a host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawVideoAsset {
    pub id: String,

    #[serde(default)]
    pub title: Option<String>,

    pub duration_seconds: f64,

    #[serde(default)]
    pub checkpoints: Vec<Checkpoint>,

    #[serde(default)]
    pub questions: Vec<Question>,
}

/// Validate a raw asset into an immutable [`VideoAsset`]
pub fn load_asset(raw: RawVideoAsset) -> Result<VideoAsset, ValidationError> {
    let RawVideoAsset {
        id,
        title,
        duration_seconds: duration,
        mut checkpoints,
        mut questions,
    } = raw;

    if !duration.is_finite() || duration <= 0.0 {
        return Err(ValidationError::InvalidDuration(duration));
    }
    if id.trim().is_empty() {
        return Err(ValidationError::EmptyId("asset"));
    }

    let mut seen: HashSet<&str> = HashSet::new();

    for checkpoint in &checkpoints {
        if checkpoint.id.trim().is_empty() {
            return Err(ValidationError::EmptyId("checkpoint"));
        }
        if !seen.insert(checkpoint.id.as_str()) {
            return Err(ValidationError::DuplicateId(checkpoint.id.clone()));
        }
        check_timestamp(&checkpoint.id, checkpoint.timestamp_seconds, duration)?;
    }

    for question in &questions {
        if question.id.trim().is_empty() {
            return Err(ValidationError::EmptyId("question"));
        }
        if !seen.insert(question.id.as_str()) {
            return Err(ValidationError::DuplicateId(question.id.clone()));
        }
        check_timestamp(&question.id, question.timestamp_seconds, duration)?;

        if !question.tolerance_seconds.is_finite() || question.tolerance_seconds < 0.0 {
            return Err(ValidationError::InvalidTolerance {
                id: question.id.clone(),
                tolerance: question.tolerance_seconds,
            });
        }
        if question.correct_index >= question.options.len() {
            return Err(ValidationError::CorrectIndexOutOfRange {
                id: question.id.clone(),
                index: question.correct_index,
                options: question.options.len(),
            });
        }
        if let Some(limit) = question.time_limit_seconds {
            if !limit.is_finite() || limit <= 0.0 || limit > MAX_QUESTION_TIME_LIMIT_SECS {
                return Err(ValidationError::InvalidTimeLimit {
                    id: question.id.clone(),
                    seconds: limit,
                });
            }
        }
    }

    // Stable sort: events sharing a timestamp keep their declaration order
    checkpoints.sort_by(|a, b| a.timestamp_seconds.total_cmp(&b.timestamp_seconds));
    questions.sort_by(|a, b| a.timestamp_seconds.total_cmp(&b.timestamp_seconds));

    tracing::debug!(
        "Loaded asset '{}': {} checkpoint(s), {} question(s), {}s",
        id,
        checkpoints.len(),
        questions.len(),
        duration
    );

    Ok(VideoAsset::from_validated_parts(
        id,
        title,
        duration,
        checkpoints,
        questions,
    ))
}

fn check_timestamp(id: &str, timestamp: f64, duration: f64) -> Result<(), ValidationError> {
    if timestamp.is_finite() && (0.0..=duration).contains(&timestamp) {
        Ok(())
    } else {
        Err(ValidationError::TimestampOutOfRange {
            id: id.to_string(),
            timestamp,
            duration,
        })
    }
}

/// Serialization format of an asset file, chosen by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetFormat {
    Json,
    Yaml,
    Toml,
}

impl AssetFormat {
    /// Detect the format from a path's extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }

    /// Parse raw asset content in this format
    pub fn parse(&self, content: &str) -> Result<RawVideoAsset> {
        let raw: RawVideoAsset = match self {
            Self::Json => serde_json::from_str(content)?,
            Self::Yaml => serde_yaml::from_str(content)?,
            Self::Toml => toml::from_str(content)?,
        };
        Ok(raw)
    }
}

/// Read, parse and validate an asset file
pub fn load_asset_file(path: &Path) -> Result<VideoAsset> {
    let format = AssetFormat::from_path(path).with_context(|| {
        format!(
            "Unsupported asset file extension (expected .json, .yaml, .yml or .toml): {}",
            path.display()
        )
    })?;

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read asset file: {}", path.display()))?;

    let raw = format
        .parse(&content)
        .with_context(|| format!("Failed to parse asset file: {}", path.display()))?;

    let asset =
        load_asset(raw).with_context(|| format!("Invalid asset file: {}", path.display()))?;

    Ok(asset)
}
