//! Completion statistics
//!
//! Derived on demand from the asset, the session state and the current
//! position. Nothing here is stored, so mid-session and final snapshots can
//! never disagree with the ledger or the fired/answered flags.

use serde::{Deserialize, Serialize};

use super::levels;
use super::session::{Resolution, SessionState};
use crate::VideoAsset;

/// Snapshot of session progress and accuracy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionStats {
    pub position_seconds: f64,
    pub duration_seconds: f64,
    /// `position / duration`, clamped to `[0, 1]`
    pub watched_fraction: f64,
    pub checkpoints_fired: usize,
    pub checkpoints_total: usize,
    /// Questions resolved with a submitted option
    pub questions_answered: usize,
    pub questions_correct: usize,
    /// Questions skipped by the user or timed out
    pub questions_skipped: usize,
    pub questions_total: usize,
    /// `correct / answered`, 0 when nothing was answered
    pub accuracy: f64,
    /// Consecutive correct answers ending with the latest resolution
    pub current_streak: u32,
    pub best_streak: u32,
    pub total_primary_reward: u64,
    pub total_secondary_reward: u64,
    /// Experience from answered questions
    pub experience: u64,
    pub level: u32,
}

impl CompletionStats {
    /// Accuracy as a whole percentage
    pub fn accuracy_percent(&self) -> u32 {
        (self.accuracy * 100.0).round() as u32
    }
}

/// Compute a stats snapshot; pure and deterministic
pub fn compute_stats(
    asset: &VideoAsset,
    state: &SessionState,
    current_position: f64,
) -> CompletionStats {
    let duration = asset.duration_seconds();
    let watched_fraction = if current_position.is_finite() {
        (current_position / duration).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let checkpoints_fired = state.checkpoints().iter().filter(|c| c.fired).count();

    let mut questions_answered = 0;
    let mut questions_correct = 0;
    let mut questions_skipped = 0;
    for status in state.questions() {
        match status.resolution {
            Some(Resolution::Answered) => {
                questions_answered += 1;
                if status.is_correct == Some(true) {
                    questions_correct += 1;
                }
            }
            Some(Resolution::Skipped | Resolution::TimedOut) => questions_skipped += 1,
            None => {}
        }
    }

    let accuracy = if questions_answered == 0 {
        0.0
    } else {
        questions_correct as f64 / questions_answered as f64
    };

    let (current_streak, best_streak) = streaks(state);
    let experience = levels::experience(asset, state);

    CompletionStats {
        position_seconds: current_position,
        duration_seconds: duration,
        watched_fraction,
        checkpoints_fired,
        checkpoints_total: asset.checkpoints().len(),
        questions_answered,
        questions_correct,
        questions_skipped,
        questions_total: asset.questions().len(),
        accuracy,
        current_streak,
        best_streak,
        total_primary_reward: state.ledger().total_primary(),
        total_secondary_reward: state.ledger().total_secondary(),
        experience,
        level: levels::level_for_xp(experience),
    }
}

/// Current and best run of correct answers, in resolution order.
/// Wrong answers, skips and time-outs all break the run.
fn streaks(state: &SessionState) -> (u32, u32) {
    let mut current = 0u32;
    let mut best = 0u32;

    for &index in state.resolution_order() {
        let correct = state
            .questions()
            .get(index)
            .is_some_and(|q| q.is_correct == Some(true));
        if correct {
            current += 1;
            best = best.max(current);
        } else {
            current = 0;
        }
    }

    (current, best)
}
