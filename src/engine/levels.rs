//! Experience and levels
//!
//! Experience is derived from resolved questions, never stored, so it can't
//! drift from the answers it rewards. Skips and time-outs earn nothing.

use super::session::{Resolution, SessionState};
use crate::VideoAsset;

/// Experience needed per level
pub const XP_PER_LEVEL: u64 = 500;

/// Experience for resolving questions
pub struct XpRewards;

impl XpRewards {
    /// Correct answer, on top of the question's primary reward
    pub const CORRECT_ANSWER: u64 = 25;

    /// Wrong answer (participation)
    pub const WRONG_ANSWER: u64 = 5;
}

/// Level reached with `xp` experience; starts at 1
pub fn level_for_xp(xp: u64) -> u32 {
    u32::try_from(xp / XP_PER_LEVEL)
        .unwrap_or(u32::MAX - 1)
        .saturating_add(1)
}

/// Total experience earned in a session
pub fn experience(asset: &VideoAsset, state: &SessionState) -> u64 {
    asset
        .questions()
        .iter()
        .zip(state.questions())
        .filter(|(_, status)| status.resolution == Some(Resolution::Answered))
        .map(|(question, status)| {
            if status.is_correct == Some(true) {
                XpRewards::CORRECT_ANSWER + u64::from(question.reward_amount)
            } else {
                XpRewards::WRONG_ANSWER
            }
        })
        .sum()
}
