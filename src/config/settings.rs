//! Settings configuration types

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{MAX_QUESTION_TIME_LIMIT_SECS, Question};
use crate::catalog::ValidationError;

/// Engine tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// How long the answer feedback stays on screen before playback resumes
    /// Default: 2000
    #[serde(default = "default_feedback_delay_ms")]
    pub feedback_delay_ms: u64,

    /// Nominal interval between transport position updates
    /// Default: 250 (a typical `timeupdate` cadence)
    #[serde(default = "default_update_period_ms")]
    pub update_period_ms: u64,

    /// Slack applied to `update_period_ms` when classifying a forward step as
    /// normal playback. Steps longer than `period × factor` are seeks.
    /// Must be at least 1.0.
    #[serde(default = "default_contiguity_factor")]
    pub contiguity_factor: f64,

    /// Time limit for questions that don't define their own; the question is
    /// skipped when it runs out. `0` lets such questions wait indefinitely.
    /// Default: 20
    #[serde(default = "default_question_time_limit_secs")]
    pub default_question_time_limit_secs: Option<f64>,
}

fn default_feedback_delay_ms() -> u64 {
    2000
}

fn default_update_period_ms() -> u64 {
    250
}

fn default_contiguity_factor() -> f64 {
    1.5
}

fn default_question_time_limit_secs() -> Option<f64> {
    Some(20.0)
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            feedback_delay_ms: default_feedback_delay_ms(),
            update_period_ms: default_update_period_ms(),
            contiguity_factor: default_contiguity_factor(),
            default_question_time_limit_secs: default_question_time_limit_secs(),
        }
    }
}

impl EngineSettings {
    pub fn feedback_delay(&self) -> Duration {
        Duration::from_millis(self.feedback_delay_ms)
    }

    pub fn update_period(&self) -> Duration {
        Duration::from_millis(self.update_period_ms)
    }

    /// Effective time limit for a question, if any
    pub fn question_time_limit(&self, question: &Question) -> Option<Duration> {
        let seconds = question
            .time_limit_seconds
            .or(self.default_question_time_limit_secs)
            .filter(|s| *s > 0.0)?;
        Duration::try_from_secs_f64(seconds.min(MAX_QUESTION_TIME_LIMIT_SECS)).ok()
    }

    /// Reject settings the engine cannot run with
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.update_period_ms == 0 {
            return Err(ValidationError::InvalidSetting {
                name: "update_period_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        if !self.contiguity_factor.is_finite() || self.contiguity_factor < 1.0 {
            return Err(ValidationError::InvalidSetting {
                name: "contiguity_factor",
                reason: format!("must be finite and >= 1.0, got {}", self.contiguity_factor),
            });
        }
        if let Some(limit) = self.default_question_time_limit_secs {
            if !limit.is_finite() || limit < 0.0 || limit > MAX_QUESTION_TIME_LIMIT_SECS {
                return Err(ValidationError::InvalidSetting {
                    name: "default_question_time_limit_secs",
                    reason: format!(
                        "must be between 0 and {} seconds, got {}",
                        MAX_QUESTION_TIME_LIMIT_SECS, limit
                    ),
                });
            }
        }
        Ok(())
    }
}
