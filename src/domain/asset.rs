use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{EventId, RewardKind};

/// Default half-width of a question's trigger window, in seconds
pub(crate) const DEFAULT_QUESTION_TOLERANCE_SECS: f64 = 0.5;

/// Longest accepted question time limit (one day), in seconds
pub const MAX_QUESTION_TIME_LIMIT_SECS: f64 = 86_400.0;

fn default_tolerance() -> f64 {
    DEFAULT_QUESTION_TOLERANCE_SECS
}

/// A one-shot timestamped reward that needs no user response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Unique identifier within the asset
    pub id: EventId,

    /// Media position at which the checkpoint is reached
    pub timestamp_seconds: f64,

    /// Amount credited when the checkpoint fires
    #[serde(default)]
    pub reward_amount: u32,

    /// Currency of the reward
    #[serde(default)]
    pub reward_kind: RewardKind,

    /// Human-readable label, used in reward reasons
    #[serde(default)]
    pub title: Option<String>,
}

impl Checkpoint {
    /// Label used when reporting rewards for this checkpoint
    pub fn label(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.id)
    }
}

/// A one-shot interactive question that pauses playback until resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Unique identifier within the asset
    pub id: EventId,

    /// Media position the question is anchored to
    pub timestamp_seconds: f64,

    /// Half-width of the trigger window around `timestamp_seconds`
    #[serde(default = "default_tolerance")]
    pub tolerance_seconds: f64,

    /// Question text shown to the user
    #[serde(default)]
    pub prompt: String,

    /// Answer options, addressed by index
    pub options: Vec<String>,

    /// Index into `options` of the correct answer
    pub correct_index: usize,

    /// Primary reward for a correct answer
    #[serde(default)]
    pub reward_amount: u32,

    /// Secondary reward for a correct answer
    #[serde(default)]
    pub secondary_reward_amount: u32,

    /// Seconds the user has to answer before the question is skipped.
    /// Falls back to the engine's configured default when unset.
    #[serde(default)]
    pub time_limit_seconds: Option<f64>,

    /// Shown after the answer is revealed
    #[serde(default)]
    pub explanation: Option<String>,
}

impl Question {
    /// Whether `selected_index` is the correct option
    pub fn is_correct(&self, selected_index: usize) -> bool {
        selected_index == self.correct_index
    }

    /// Trigger window `[timestamp - tolerance, timestamp + tolerance]`
    pub fn window(&self) -> (f64, f64) {
        (
            self.timestamp_seconds - self.tolerance_seconds,
            self.timestamp_seconds + self.tolerance_seconds,
        )
    }
}

/// Position of an event inside the asset's ordered lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventRef {
    Checkpoint(usize),
    Question(usize),
}

/// Validated, immutable description of a video and its gamification events
///
/// Only constructed through [`crate::catalog::load_asset`], so every instance
/// satisfies: positive finite duration, unique ids across checkpoints and
/// questions, timestamps within `[0, duration]`, and valid `correct_index`.
/// Checkpoints and questions are sorted by timestamp.
///
/// Shared read-only between sessions via `Arc<VideoAsset>`.
#[derive(Debug, Clone, Serialize)]
pub struct VideoAsset {
    id: String,
    title: Option<String>,
    duration_seconds: f64,
    checkpoints: Vec<Checkpoint>,
    questions: Vec<Question>,
    #[serde(skip)]
    index: HashMap<EventId, EventRef>,
}

impl VideoAsset {
    /// Assemble an asset from parts that already passed validation
    pub(crate) fn from_validated_parts(
        id: String,
        title: Option<String>,
        duration_seconds: f64,
        checkpoints: Vec<Checkpoint>,
        questions: Vec<Question>,
    ) -> Self {
        let index = checkpoints
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id.clone(), EventRef::Checkpoint(i)))
            .chain(
                questions
                    .iter()
                    .enumerate()
                    .map(|(i, q)| (q.id.clone(), EventRef::Question(i))),
            )
            .collect();

        Self {
            id,
            title,
            duration_seconds,
            checkpoints,
            questions,
            index,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }

    /// Checkpoints in timestamp order
    pub fn checkpoints(&self) -> &[Checkpoint] {
        &self.checkpoints
    }

    /// Questions in timestamp order
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Resolve an event id to its position in the ordered lists
    pub fn lookup(&self, id: &str) -> Option<EventRef> {
        self.index.get(id).copied()
    }

    pub fn question_index(&self, id: &str) -> Option<usize> {
        match self.lookup(id)? {
            EventRef::Question(i) => Some(i),
            EventRef::Checkpoint(_) => None,
        }
    }

    pub fn checkpoint_index(&self, id: &str) -> Option<usize> {
        match self.lookup(id)? {
            EventRef::Checkpoint(i) => Some(i),
            EventRef::Question(_) => None,
        }
    }

    /// Total reward of the given kind a perfect session can earn
    pub fn reward_available(&self, kind: RewardKind) -> u64 {
        let from_checkpoints: u64 = self
            .checkpoints
            .iter()
            .filter(|c| c.reward_kind == kind)
            .map(|c| u64::from(c.reward_amount))
            .sum();
        let from_questions: u64 = self
            .questions
            .iter()
            .map(|q| match kind {
                RewardKind::Primary => u64::from(q.reward_amount),
                RewardKind::Secondary => u64::from(q.secondary_reward_amount),
            })
            .sum();
        from_checkpoints + from_questions
    }
}
