use serde::{Deserialize, Serialize};

use super::EventId;

/// State of one playback session
///
/// Owned by the playback controller. `Completed` and `Disposed` are terminal:
/// once entered, no further mutation of the session is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "question", rename_all = "snake_case")]
pub enum EngineState {
    /// Media is playing and triggers are evaluated
    Playing,
    /// Media is paused while the given question is on screen
    PausedForQuestion(EventId),
    /// Media was paused explicitly by the user
    PausedByUser,
    /// The transport reported the end of the media
    Completed,
    /// The host discarded the session
    Disposed,
}

impl EngineState {
    /// Whether the session accepts no further mutation
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Disposed)
    }

    /// The question currently blocking playback, if any
    pub fn active_question(&self) -> Option<&str> {
        match self {
            Self::PausedForQuestion(id) => Some(id.as_str()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Playing => "playing",
            Self::PausedForQuestion(_) => "paused_for_question",
            Self::PausedByUser => "paused_by_user",
            Self::Completed => "completed",
            Self::Disposed => "disposed",
        }
    }
}

impl std::fmt::Display for EngineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PausedForQuestion(id) => write!(f, "paused_for_question({})", id),
            other => write!(f, "{}", other.as_str()),
        }
    }
}
