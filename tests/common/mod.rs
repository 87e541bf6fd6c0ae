//! Shared fixtures for session integration tests

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use uplay::catalog::{load_asset, RawVideoAsset};
use uplay::config::EngineSettings;
use uplay::engine::{
    create_session_with_clock, AnswerOutcome, CompletionStats, EngineHandle, ManualClock,
    MediaTransport, SessionObserver,
};
use uplay::{Checkpoint, EngineState, Question, RewardKind, VideoAsset};

pub const CHECKPOINT_ID: &str = "cp30";
pub const QUESTION_ID: &str = "q60";

/// Player commands and reported position, shared with the test body
#[derive(Debug, Default)]
pub struct TransportLog {
    pub position: f64,
    pub commands: Vec<&'static str>,
}

#[derive(Debug, Clone)]
pub struct RecordingTransport {
    pub log: Arc<Mutex<TransportLog>>,
    duration: f64,
}

impl RecordingTransport {
    pub fn new(duration: f64) -> Self {
        Self {
            log: Arc::new(Mutex::new(TransportLog::default())),
            duration,
        }
    }

    pub fn set_position(&self, seconds: f64) {
        self.log.lock().unwrap().position = seconds;
    }

    pub fn commands(&self) -> Vec<&'static str> {
        self.log.lock().unwrap().commands.clone()
    }
}

impl MediaTransport for RecordingTransport {
    fn current_position(&self) -> f64 {
        self.log.lock().unwrap().position
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn play(&mut self) {
        self.log.lock().unwrap().commands.push("play");
    }

    fn pause(&mut self) {
        self.log.lock().unwrap().commands.push("pause");
    }
}

/// Every notification a session emitted, in order
#[derive(Debug, Default)]
pub struct ObservedEvents {
    pub rewards: Vec<(u32, RewardKind, String)>,
    pub triggered: Vec<String>,
    pub resolved: Vec<AnswerOutcome>,
    pub states: Vec<EngineState>,
    pub completed: Vec<CompletionStats>,
    pub progress: Vec<f64>,
    pub levels: Vec<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    pub events: Arc<Mutex<ObservedEvents>>,
}

impl RecordingObserver {
    pub fn rewards(&self) -> Vec<(u32, RewardKind, String)> {
        self.events.lock().unwrap().rewards.clone()
    }

    pub fn triggered(&self) -> Vec<String> {
        self.events.lock().unwrap().triggered.clone()
    }

    pub fn completed(&self) -> Vec<CompletionStats> {
        self.events.lock().unwrap().completed.clone()
    }

    pub fn levels(&self) -> Vec<u32> {
        self.events.lock().unwrap().levels.clone()
    }
}

impl SessionObserver for RecordingObserver {
    fn on_progress(&mut self, fraction: f64) {
        self.events.lock().unwrap().progress.push(fraction);
    }

    fn on_question_triggered(&mut self, question: &Question) {
        self.events.lock().unwrap().triggered.push(question.id.clone());
    }

    fn on_question_resolved(&mut self, _question: &Question, outcome: &AnswerOutcome) {
        self.events.lock().unwrap().resolved.push(outcome.clone());
    }

    fn on_reward_earned(&mut self, amount: u32, kind: RewardKind, reason: &str) {
        self.events
            .lock()
            .unwrap()
            .rewards
            .push((amount, kind, reason.to_string()));
    }

    fn on_state_changed(&mut self, state: &EngineState) {
        self.events.lock().unwrap().states.push(state.clone());
    }

    fn on_level_up(&mut self, level: u32) {
        self.events.lock().unwrap().levels.push(level);
    }

    fn on_complete(&mut self, stats: &CompletionStats) {
        self.events.lock().unwrap().completed.push(stats.clone());
    }
}

pub fn checkpoint(id: &str, at: f64, reward: u32) -> Checkpoint {
    Checkpoint {
        id: id.to_string(),
        timestamp_seconds: at,
        reward_amount: reward,
        reward_kind: RewardKind::Primary,
        title: None,
    }
}

pub fn question(id: &str, at: f64) -> Question {
    Question {
        id: id.to_string(),
        timestamp_seconds: at,
        tolerance_seconds: 0.5,
        prompt: "Which one?".to_string(),
        options: vec!["A".to_string(), "B".to_string(), "C".to_string()],
        correct_index: 1,
        reward_amount: 10,
        secondary_reward_amount: 0,
        time_limit_seconds: None,
        explanation: Some("B is right".to_string()),
    }
}

pub fn build_asset(checkpoints: Vec<Checkpoint>, questions: Vec<Question>) -> Arc<VideoAsset> {
    let raw = RawVideoAsset {
        id: "lesson".to_string(),
        title: Some("Lesson".to_string()),
        duration_seconds: 120.0,
        checkpoints,
        questions,
    };
    Arc::new(load_asset(raw).expect("sample asset is valid"))
}

/// 120s asset: checkpoint at 30s (reward 5), question at 60±0.5s
/// (options A/B/C, correct B, reward 10)
pub fn sample_asset() -> Arc<VideoAsset> {
    build_asset(
        vec![checkpoint(CHECKPOINT_ID, 30.0, 5)],
        vec![question(QUESTION_ID, 60.0)],
    )
}

/// Ticks up to 15s apart count as normal playback
pub fn coarse_settings() -> EngineSettings {
    EngineSettings {
        update_period_ms: 10_000,
        ..Default::default()
    }
}

/// A session plus handles on everything it talks to
pub struct Harness {
    pub session: EngineHandle,
    pub transport: RecordingTransport,
    pub observer: RecordingObserver,
    pub clock: ManualClock,
}

impl Harness {
    pub fn new(asset: Arc<VideoAsset>, settings: EngineSettings) -> Self {
        let transport = RecordingTransport::new(asset.duration_seconds());
        let observer = RecordingObserver::default();
        let clock = ManualClock::new();
        let session = create_session_with_clock(
            asset,
            transport.clone(),
            observer.clone(),
            settings,
            clock.clone(),
        )
        .expect("settings are valid");

        Self {
            session,
            transport,
            observer,
            clock,
        }
    }

    pub fn sample() -> Self {
        Self::new(sample_asset(), coarse_settings())
    }

    /// Report each position as the player would
    pub fn ticks(&mut self, positions: &[f64]) {
        for &position in positions {
            self.transport.set_position(position);
            self.session.on_position_update(position);
        }
    }

    pub fn advance_ms(&mut self, ms: u64) {
        self.clock.advance(std::time::Duration::from_millis(ms));
        self.session.poll();
    }
}
