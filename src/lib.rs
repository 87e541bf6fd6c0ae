//! uplay - Interactive playback event engine
//!
//! uplay turns a passive video into an interactive lesson. A video asset
//! declares checkpoints (rewarded once when playback reaches them) and
//! questions (which pause playback until answered). A session follows the
//! position reported by the media player and fires each event exactly once,
//! even when the viewer seeks, replays or pauses.
//!
//! ## Layers
//!
//! 1. **Catalog**: loads and validates an asset from JSON, YAML or TOML.
//! 2. **Engine**: one [`engine::EngineHandle`] per playback session, driven by
//!    position updates, either directly or through an async
//!    [`engine::SessionDriver`].

pub mod catalog;
pub mod config;
pub mod domain;
pub mod engine;

pub use domain::*;
