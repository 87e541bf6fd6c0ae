//! Position sampler
//!
//! Turns the raw stream of transport positions into ticks classified as
//! normal forward playback or as seeks.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How a tick moved relative to the previous observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Motion {
    /// Small forward step, consistent with normal playback
    Forward,
    /// Same position as before (paused, buffering, duplicate update)
    Stationary,
    /// Jump ahead further than one sampling interval allows
    SeekForward,
    /// Any backward movement
    SeekBackward,
}

impl Motion {
    pub fn is_seek(&self) -> bool {
        matches!(self, Self::SeekForward | Self::SeekBackward)
    }
}

/// One sampled playback-position observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub position: f64,
    pub previous_position: f64,
    pub motion: Motion,
    /// Whether `previous_position` itself belongs to this tick's range.
    /// False when the previous position was reached by a seek, so an event
    /// sitting exactly where a seek landed stays skipped.
    pub start_inclusive: bool,
}

impl Tick {
    /// True when the movement since the previous observation was normal playback
    pub fn is_forward_contiguous(&self) -> bool {
        self.motion == Motion::Forward
    }

    /// Whether `t` lies in the media time covered by this tick
    pub fn covers(&self, t: f64) -> bool {
        let (from, to) = self.swept();
        t <= to && (t > from || (self.start_inclusive && t == from))
    }

    /// Whether `[lo, hi]` intersects the media time covered by this tick
    pub fn overlaps(&self, lo: f64, hi: f64) -> bool {
        let (from, to) = self.swept();
        lo <= to && (hi > from || (self.start_inclusive && hi == from))
    }

    /// Range of media time covered by this tick
    pub fn swept(&self) -> (f64, f64) {
        if self.previous_position <= self.position {
            (self.previous_position, self.position)
        } else {
            (self.position, self.previous_position)
        }
    }
}

/// Classifies position updates as contiguous playback or seeks
#[derive(Debug, Clone)]
pub struct PositionSampler {
    previous: f64,
    max_forward_delta: f64,
    /// The previous position was reached by playback (or is the start)
    arrived_contiguously: bool,
}

impl PositionSampler {
    /// Create a sampler starting at position 0.
    ///
    /// A forward step is contiguous when it is at most
    /// `contiguity_factor × update_period` seconds long.
    pub fn new(update_period: Duration, contiguity_factor: f64) -> Self {
        Self {
            previous: 0.0,
            max_forward_delta: update_period.as_secs_f64() * contiguity_factor,
            arrived_contiguously: true,
        }
    }

    /// Largest forward step still classified as contiguous playback
    pub fn max_forward_delta(&self) -> f64 {
        self.max_forward_delta
    }

    /// Last observed position
    pub fn position(&self) -> f64 {
        self.previous
    }

    /// Record a new position and classify the movement
    pub fn observe(&mut self, position: f64) -> Tick {
        let previous_position = self.previous;
        let delta = position - previous_position;

        let motion = if delta > 0.0 && delta <= self.max_forward_delta {
            Motion::Forward
        } else if delta > 0.0 {
            Motion::SeekForward
        } else if delta < 0.0 {
            Motion::SeekBackward
        } else {
            Motion::Stationary
        };

        let start_inclusive = self.arrived_contiguously;
        match motion {
            Motion::Forward => self.arrived_contiguously = true,
            Motion::SeekForward | Motion::SeekBackward => self.arrived_contiguously = false,
            Motion::Stationary => {}
        }
        self.previous = position;

        Tick {
            position,
            previous_position,
            motion,
            start_inclusive,
        }
    }
}
