//! Core domain types for uplay

mod asset;
mod reward;
mod state;

pub use asset::{Checkpoint, EventRef, MAX_QUESTION_TIME_LIMIT_SECS, Question, VideoAsset};
pub use reward::RewardKind;
pub use state::EngineState;

/// Identifier of a checkpoint or question, unique within one asset
pub type EventId = String;
