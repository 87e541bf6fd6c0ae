use serde::{Deserialize, Serialize};

/// Which reward currency an amount is paid in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RewardKind {
    /// Main currency, paid by checkpoints and correct answers
    #[default]
    Primary,
    /// Bonus currency, paid on top of the primary reward for correct answers
    Secondary,
}

impl RewardKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
        }
    }
}

impl std::fmt::Display for RewardKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
