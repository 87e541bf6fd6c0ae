//! Simulate command implementation
//!
//! Replays a [`Script`] against a session wired to an in-memory transport
//! and a manual clock, so feedback delays and time limits elapse only when
//! the script says `wait_ms`.

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use uplay::catalog;
use uplay::config::{Config, EngineSettings};
use uplay::engine::{
    create_session_with_clock, AnswerOutcome, CompletionStats, InvalidStateError, ManualClock,
    MediaTransport, Resolution, SessionObserver,
};
use uplay::{EngineState, Question, RewardKind, VideoAsset};

use super::script::{Script, ScriptStep};

pub struct SimulateOptions {
    pub config_path: Option<PathBuf>,
    pub update_period_ms: Option<u64>,
    pub json: bool,
}

/// Run a script against an asset and print the resulting stats
pub async fn simulate_command(
    work_dir: &Path,
    asset_path: &Path,
    script_path: &Path,
    options: SimulateOptions,
) -> Result<()> {
    let config = Config::load(options.config_path.as_deref(), work_dir)?;
    let mut settings = config.engine;
    if let Some(period) = options.update_period_ms {
        settings.update_period_ms = period;
    }

    let asset = Arc::new(catalog::load_asset_file(asset_path)?);
    let script = Script::from_file(script_path)?;

    let stats = run_script(asset, &script, settings, !options.json)?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("\nFinal stats:");
        print_stats(&stats);
    }

    Ok(())
}

/// Replay `script` and return the stats at the end of it
pub fn run_script(
    asset: Arc<VideoAsset>,
    script: &Script,
    settings: EngineSettings,
    verbose: bool,
) -> Result<CompletionStats> {
    let transport = ScriptedTransport::new(asset.duration_seconds());
    let clock = ManualClock::new();
    let observer = ConsoleObserver { verbose };

    let mut session =
        create_session_with_clock(asset, transport.clone(), observer, settings, clock.clone())?;

    for (n, step) in script.steps.iter().enumerate() {
        let step_no = n + 1;
        match step {
            ScriptStep::Position(seconds) => {
                transport.set_position(*seconds);
                session.on_position_update(*seconds);
            }
            ScriptStep::Answer { question, option } => {
                let result = session.submit_answer(question, *option);
                report(verbose, step_no, result);
            }
            ScriptStep::Skip(question) => {
                let result = session.skip_question(question);
                report(verbose, step_no, result);
            }
            ScriptStep::WaitMs(ms) => {
                clock.advance(Duration::from_millis(*ms));
                session.poll();
            }
            ScriptStep::Pause => {
                if !session.pause_by_user() && verbose {
                    println!("  step {}: pause ignored in state {}", step_no, session.state());
                }
            }
            ScriptStep::Resume => {
                if !session.resume_by_user() && verbose {
                    println!("  step {}: resume ignored in state {}", step_no, session.state());
                }
            }
            ScriptStep::Ended => session.on_ended(),
            ScriptStep::Stats => {
                if verbose {
                    println!("  step {}: stats at {:.2}s", step_no, session.position());
                    print_stats(&session.get_stats());
                }
            }
        }
    }

    let stats = session.get_stats();
    tracing::debug!("Simulation ended in state {}", session.state());
    session.dispose();
    Ok(stats)
}

fn report(verbose: bool, step_no: usize, result: Result<AnswerOutcome, InvalidStateError>) {
    if !verbose {
        return;
    }
    if let Err(e) = result {
        println!("  step {}: rejected: {}", step_no, e);
    }
}

fn print_stats(stats: &CompletionStats) {
    println!(
        "  Watched:      {:.1}s / {:.1}s ({:.0}%)",
        stats.position_seconds,
        stats.duration_seconds,
        stats.watched_fraction * 100.0
    );
    println!(
        "  Checkpoints:  {}/{}",
        stats.checkpoints_fired, stats.checkpoints_total
    );
    println!(
        "  Questions:    {} answered, {} correct, {} skipped of {} ({}% accuracy)",
        stats.questions_answered,
        stats.questions_correct,
        stats.questions_skipped,
        stats.questions_total,
        stats.accuracy_percent()
    );
    println!(
        "  Streak:       {} (best {})",
        stats.current_streak, stats.best_streak
    );
    println!(
        "  Level:        {} ({} XP)",
        stats.level, stats.experience
    );
    println!(
        "  Rewards:      {} {} / {} {}",
        stats.total_primary_reward,
        RewardKind::Primary,
        stats.total_secondary_reward,
        RewardKind::Secondary
    );
}

#[derive(Debug)]
struct TransportState {
    position: f64,
    duration: f64,
    playing: bool,
}

/// In-memory player whose position is set by the script
#[derive(Debug, Clone)]
struct ScriptedTransport(Arc<Mutex<TransportState>>);

impl ScriptedTransport {
    fn new(duration: f64) -> Self {
        Self(Arc::new(Mutex::new(TransportState {
            position: 0.0,
            duration,
            playing: true,
        })))
    }

    fn set_position(&self, seconds: f64) {
        let mut state = self.0.lock().unwrap_or_else(|e| e.into_inner());
        if !state.playing {
            tracing::debug!("Position {:.2}s reported while paused", seconds);
        }
        state.position = seconds;
    }
}

impl MediaTransport for ScriptedTransport {
    fn current_position(&self) -> f64 {
        self.0.lock().unwrap_or_else(|e| e.into_inner()).position
    }

    fn duration(&self) -> f64 {
        self.0.lock().unwrap_or_else(|e| e.into_inner()).duration
    }

    fn play(&mut self) {
        self.0.lock().unwrap_or_else(|e| e.into_inner()).playing = true;
    }

    fn pause(&mut self) {
        self.0.lock().unwrap_or_else(|e| e.into_inner()).playing = false;
    }
}

/// Prints session notifications as they happen
struct ConsoleObserver {
    verbose: bool,
}

impl SessionObserver for ConsoleObserver {
    fn on_question_triggered(&mut self, question: &Question) {
        if self.verbose {
            println!("? {} {}", question.id, question.prompt);
            for (i, option) in question.options.iter().enumerate() {
                println!("    [{}] {}", i, option);
            }
        }
    }

    fn on_question_resolved(&mut self, question: &Question, outcome: &AnswerOutcome) {
        if !self.verbose {
            return;
        }
        match outcome.resolution {
            Resolution::Answered => println!(
                "  {} answered: {}",
                question.id,
                if outcome.is_correct { "correct" } else { "wrong" }
            ),
            Resolution::Skipped => println!("  {} skipped", question.id),
            Resolution::TimedOut => println!("  {} timed out", question.id),
        }
        if let Some(explanation) = &outcome.explanation {
            println!("    {}", explanation);
        }
    }

    fn on_reward_earned(&mut self, amount: u32, kind: RewardKind, reason: &str) {
        if self.verbose {
            println!("+ {} {} ({})", amount, kind, reason);
        }
    }

    fn on_level_up(&mut self, level: u32) {
        if self.verbose {
            println!("* Level {}", level);
        }
    }

    fn on_state_changed(&mut self, state: &EngineState) {
        tracing::debug!("State: {}", state);
    }
}
