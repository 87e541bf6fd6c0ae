//! Per-session mutable state
//!
//! Status vectors are index-aligned with the asset's checkpoint and question
//! lists, so the immutable [`VideoAsset`] can be shared between sessions while
//! each session tracks its own fired/answered flags.

use serde::{Deserialize, Serialize};

use super::ledger::RewardLedger;
use crate::VideoAsset;

/// How a question left the active state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// The user submitted an option
    Answered,
    /// The user dismissed the question
    Skipped,
    /// The time limit elapsed without an answer
    TimedOut,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckpointStatus {
    pub fired: bool,
    /// Media position of the tick that fired the checkpoint
    pub fired_at: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionStatus {
    /// Set once the question is resolved in any way; it never triggers again
    pub answered: bool,
    pub selected_index: Option<usize>,
    pub is_correct: Option<bool>,
    pub resolution: Option<Resolution>,
    /// Media position at which the question was last triggered
    pub triggered_at: Option<f64>,
}

/// Fired/answered flags and the reward ledger of one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    checkpoints: Vec<CheckpointStatus>,
    questions: Vec<QuestionStatus>,
    /// Question indexes in the order they were resolved
    resolution_order: Vec<usize>,
    ledger: RewardLedger,
}

impl SessionState {
    pub fn new(asset: &VideoAsset) -> Self {
        Self {
            checkpoints: vec![CheckpointStatus::default(); asset.checkpoints().len()],
            questions: vec![QuestionStatus::default(); asset.questions().len()],
            resolution_order: Vec::new(),
            ledger: RewardLedger::new(),
        }
    }

    pub fn checkpoints(&self) -> &[CheckpointStatus] {
        &self.checkpoints
    }

    pub fn questions(&self) -> &[QuestionStatus] {
        &self.questions
    }

    pub fn is_fired(&self, index: usize) -> bool {
        self.checkpoints.get(index).is_some_and(|c| c.fired)
    }

    pub fn is_answered(&self, index: usize) -> bool {
        self.questions.get(index).is_some_and(|q| q.answered)
    }

    pub fn resolution_order(&self) -> &[usize] {
        &self.resolution_order
    }

    pub fn ledger(&self) -> &RewardLedger {
        &self.ledger
    }

    pub(crate) fn ledger_mut(&mut self) -> &mut RewardLedger {
        &mut self.ledger
    }

    /// Flip a checkpoint's fired flag. Returns `true` only on the first call.
    pub(crate) fn mark_checkpoint_fired(&mut self, index: usize, at_seconds: f64) -> bool {
        match self.checkpoints.get_mut(index) {
            Some(status) if !status.fired => {
                status.fired = true;
                status.fired_at = Some(at_seconds);
                true
            }
            _ => false,
        }
    }

    pub(crate) fn mark_question_triggered(&mut self, index: usize, at_seconds: f64) {
        if let Some(status) = self.questions.get_mut(index) {
            status.triggered_at = Some(at_seconds);
        }
    }

    /// Resolve a question. Returns `false` if it was already resolved.
    pub(crate) fn resolve_question(
        &mut self,
        index: usize,
        resolution: Resolution,
        selected_index: Option<usize>,
        is_correct: bool,
    ) -> bool {
        let Some(status) = self.questions.get_mut(index) else {
            return false;
        };
        if status.answered {
            return false;
        }

        status.answered = true;
        status.selected_index = selected_index;
        status.is_correct = Some(is_correct);
        status.resolution = Some(resolution);
        self.resolution_order.push(index);
        true
    }
}
