//! Boundary contracts with the hosting application

use super::handle::AnswerOutcome;
use super::stats::CompletionStats;
use crate::{EngineState, Question, RewardKind};

/// The media player driven by a session
///
/// `play`/`pause` are fire-and-forget: the transport acknowledges them through
/// later position updates, which the host forwards to
/// [`EngineHandle::on_position_update`](super::EngineHandle::on_position_update).
pub trait MediaTransport: Send {
    /// Current playback position in seconds
    fn current_position(&self) -> f64;

    /// Media duration in seconds (may be NaN while metadata is loading)
    fn duration(&self) -> f64;

    fn play(&mut self);

    fn pause(&mut self);
}

/// Notifications emitted by a session. Every method defaults to a no-op.
#[allow(unused_variables)]
pub trait SessionObserver: Send {
    /// Watched fraction after each accepted position update
    fn on_progress(&mut self, fraction: f64) {}

    /// A question paused playback and awaits an answer
    fn on_question_triggered(&mut self, question: &Question) {}

    /// An answer, skip or time-out resolved the active question
    fn on_question_resolved(&mut self, question: &Question, outcome: &AnswerOutcome) {}

    /// Reward sink
    fn on_reward_earned(&mut self, amount: u32, kind: RewardKind, reason: &str) {}

    fn on_state_changed(&mut self, state: &EngineState) {}

    /// An answer raised the session's level to `level`
    fn on_level_up(&mut self, level: u32) {}

    /// Completion sink; called once when the media ends
    fn on_complete(&mut self, stats: &CompletionStats) {}
}

/// Observer that ignores every notification
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl SessionObserver for NoopObserver {}
