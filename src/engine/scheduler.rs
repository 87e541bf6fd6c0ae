//! Event scheduler
//!
//! Pure decision function: given a tick, the asset and the current session
//! state, decide which checkpoints fire and whether a question triggers. All
//! state is passed in explicitly; nothing here mutates.

use super::sampler::Tick;
use super::session::SessionState;
use crate::{EngineState, VideoAsset};

/// Something the session must apply for a tick, in application order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduledEvent {
    /// Index into the asset's checkpoints
    CheckpointReached(usize),
    /// Index into the asset's questions
    QuestionTriggered(usize),
}

/// Decide which events a tick produces
///
/// Only forward-contiguous ticks produce events, so anything jumped over by a
/// seek is never credited. A checkpoint fires when its timestamp lies in the
/// range swept by the tick. At most one question triggers per tick (the
/// earliest whose window intersects the swept range), and only while
/// [`EngineState::Playing`]. Checkpoint events always precede the question.
///
/// Nothing fires while a question is on screen, including its feedback delay.
/// The start of the swept range counts only when it was reached by playback,
/// see [`Tick::start_inclusive`].
pub fn schedule(
    tick: &Tick,
    asset: &VideoAsset,
    state: &SessionState,
    engine: &EngineState,
) -> Vec<ScheduledEvent> {
    if engine.is_terminal()
        || engine.active_question().is_some()
        || !tick.is_forward_contiguous()
    {
        return Vec::new();
    }

    let mut events: Vec<ScheduledEvent> = asset
        .checkpoints()
        .iter()
        .enumerate()
        .filter(|(i, c)| !state.is_fired(*i) && tick.covers(c.timestamp_seconds))
        .map(|(i, _)| ScheduledEvent::CheckpointReached(i))
        .collect();

    if *engine == EngineState::Playing {
        let triggered = asset
            .questions()
            .iter()
            .enumerate()
            .find(|(i, q)| {
                let (lo, hi) = q.window();
                !state.is_answered(*i) && tick.overlaps(lo, hi)
            })
            .map(|(i, _)| i);

        if let Some(index) = triggered {
            events.push(ScheduledEvent::QuestionTriggered(index));
        }
    }

    events
}
