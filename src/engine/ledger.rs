//! Reward ledger
//!
//! Append-only record of every reward earned in a session. Totals only ever
//! grow. Exactly-once crediting of checkpoints is guaranteed by the session
//! state's fired flags, which are checked before the ledger is invoked.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Checkpoint, EventId, Question, RewardKind};

/// What earned a reward
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum RewardSource {
    Checkpoint(EventId),
    Question(EventId),
}

/// A single reward credited to the session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardEntry {
    pub source: RewardSource,
    pub amount: u32,
    pub kind: RewardKind,
    /// Media position at which the reward was earned
    pub at_seconds: f64,
    /// Human-readable reason, forwarded to the reward sink
    pub reason: String,
    /// Wall-clock time the entry was recorded
    pub recorded_at: DateTime<Utc>,
}

/// Running totals plus full history of rewards
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RewardLedger {
    total_primary: u64,
    total_secondary: u64,
    history: Vec<RewardEntry>,
}

impl RewardLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_primary(&self) -> u64 {
        self.total_primary
    }

    pub fn total_secondary(&self) -> u64 {
        self.total_secondary
    }

    pub fn total(&self, kind: RewardKind) -> u64 {
        match kind {
            RewardKind::Primary => self.total_primary,
            RewardKind::Secondary => self.total_secondary,
        }
    }

    /// Every credited reward, oldest first
    pub fn history(&self) -> &[RewardEntry] {
        &self.history
    }

    /// Credit a fired checkpoint
    ///
    /// Returns the recorded entry, or `None` when the reward amount is zero.
    pub fn apply_checkpoint_fire(
        &mut self,
        checkpoint: &Checkpoint,
        at_seconds: f64,
    ) -> Option<RewardEntry> {
        self.record(
            RewardSource::Checkpoint(checkpoint.id.clone()),
            checkpoint.reward_amount,
            checkpoint.reward_kind,
            at_seconds,
            format!("Checkpoint: {}", checkpoint.label()),
        )
    }

    /// Credit an answer: both reward kinds when correct, nothing otherwise
    pub fn apply_answer(
        &mut self,
        question: &Question,
        selected_index: usize,
        at_seconds: f64,
    ) -> Vec<RewardEntry> {
        if !question.is_correct(selected_index) {
            return Vec::new();
        }

        let source = RewardSource::Question(question.id.clone());
        let reason = format!("Correct answer: {}", question.id);

        [
            (question.reward_amount, RewardKind::Primary),
            (question.secondary_reward_amount, RewardKind::Secondary),
        ]
        .into_iter()
        .filter_map(|(amount, kind)| {
            self.record(source.clone(), amount, kind, at_seconds, reason.clone())
        })
        .collect()
    }

    fn record(
        &mut self,
        source: RewardSource,
        amount: u32,
        kind: RewardKind,
        at_seconds: f64,
        reason: String,
    ) -> Option<RewardEntry> {
        if amount == 0 {
            return None;
        }

        match kind {
            RewardKind::Primary => self.total_primary += u64::from(amount),
            RewardKind::Secondary => self.total_secondary += u64::from(amount),
        }

        let entry = RewardEntry {
            source,
            amount,
            kind,
            at_seconds,
            reason,
            recorded_at: Utc::now(),
        };
        self.history.push(entry.clone());
        Some(entry)
    }
}
