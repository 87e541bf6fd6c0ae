//! Interactive playback event engine
//!
//! Synchronizes one-shot gamification events to a media playback position.
//!
//! # Architecture
//!
//! ```text
//! MediaTransport ──position──▶ PositionSampler ──Tick──▶ schedule()
//!                                                          │
//!                               ┌──────────────────────────┴─────────────┐
//!                               ▼                                        ▼
//!                      PlaybackController                          RewardLedger
//!                     (pause on question)                   (checkpoints, answers)
//!                               │                                        │
//!                               └──────────────▶ compute_stats() ◀───────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! let asset = Arc::new(catalog::load_asset_file(path)?);
//! let mut session = create_session(asset, transport, observer, EngineSettings::default())?;
//!
//! // From the transport's callbacks
//! session.on_position_update(12.25);
//!
//! // From the question overlay
//! let outcome = session.submit_answer("q-basics", 1)?;
//!
//! // From a periodic UI timer, so feedback delays and time limits elapse
//! session.poll();
//! ```

mod controller;
mod driver;
mod error;
mod handle;
mod ledger;
mod levels;
mod sampler;
mod scheduler;
mod session;
mod stats;
mod timers;
mod transport;

pub use controller::PlaybackController;
pub use driver::{SessionDriver, TokioClock};
pub use error::InvalidStateError;
pub use handle::{create_session, create_session_with_clock, AnswerOutcome, EngineHandle};
pub use ledger::{RewardEntry, RewardLedger, RewardSource};
pub use levels::{experience, level_for_xp, XpRewards, XP_PER_LEVEL};
pub use sampler::{Motion, PositionSampler, Tick};
pub use scheduler::{schedule, ScheduledEvent};
pub use session::{CheckpointStatus, QuestionStatus, Resolution, SessionState};
pub use stats::{compute_stats, CompletionStats};
pub use timers::{Clock, ManualClock, SystemClock, TaskKind, TaskToken, TimerQueue};
pub use transport::{MediaTransport, NoopObserver, SessionObserver};
