//! Playback controller
//!
//! Owns the session's [`EngineState`] and is the only component that issues
//! play/pause commands to the media transport. Every transition is a single
//! synchronous step; a rejected transition leaves state and transport alone.

use super::transport::MediaTransport;
use crate::EngineState;

pub struct PlaybackController {
    state: EngineState,
    transport: Box<dyn MediaTransport>,
}

impl PlaybackController {
    /// Start in `Playing`; the host is expected to have started the media
    pub fn new(transport: Box<dyn MediaTransport>) -> Self {
        Self {
            state: EngineState::Playing,
            transport,
        }
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn transport(&self) -> &dyn MediaTransport {
        self.transport.as_ref()
    }

    /// Playing -> PausedForQuestion, pausing the media
    pub fn enter_question(&mut self, question_id: &str) -> bool {
        if self.state != EngineState::Playing {
            return false;
        }
        self.transport.pause();
        self.state = EngineState::PausedForQuestion(question_id.to_string());
        true
    }

    /// PausedForQuestion(id) -> Playing, restarting the media
    pub fn leave_question(&mut self, question_id: &str) -> bool {
        if self.state.active_question() != Some(question_id) {
            return false;
        }
        self.transport.play();
        self.state = EngineState::Playing;
        true
    }

    /// Playing -> PausedByUser
    pub fn pause_by_user(&mut self) -> bool {
        if self.state != EngineState::Playing {
            return false;
        }
        self.transport.pause();
        self.state = EngineState::PausedByUser;
        true
    }

    /// PausedByUser -> Playing
    pub fn resume_by_user(&mut self) -> bool {
        if self.state != EngineState::PausedByUser {
            return false;
        }
        self.transport.play();
        self.state = EngineState::Playing;
        true
    }

    /// Any live state -> Completed. The media has already stopped.
    pub fn complete(&mut self) -> bool {
        if self.state.is_terminal() {
            return false;
        }
        self.state = EngineState::Completed;
        true
    }

    /// Any state -> Disposed. The transport is left to the host.
    pub fn dispose(&mut self) -> bool {
        if self.state == EngineState::Disposed {
            return false;
        }
        self.state = EngineState::Disposed;
        true
    }
}

impl std::fmt::Debug for PlaybackController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackController")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
