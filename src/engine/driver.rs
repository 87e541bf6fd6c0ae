//! Async session driver
//!
//! Moves an [`EngineHandle`] into a tokio task so hosts with an async event
//! loop can feed it without sharing the handle. Every mutation is applied by
//! that one task, in arrival order, and the task sleeps until the next timer
//! deadline so feedback delays and time limits fire without outside polling.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use super::error::InvalidStateError;
use super::handle::{AnswerOutcome, EngineHandle};
use super::stats::CompletionStats;
use super::timers::Clock;
use crate::EngineState;

/// Clock backed by tokio's time source; follows paused time in tests
#[derive(Debug, Clone)]
pub struct TokioClock {
    origin: tokio::time::Instant,
}

impl TokioClock {
    pub fn new() -> Self {
        Self {
            origin: tokio::time::Instant::now(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TokioClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

type Reply<T> = oneshot::Sender<T>;

enum Command {
    Position(f64),
    Ended,
    PauseByUser(Reply<bool>),
    ResumeByUser(Reply<bool>),
    SubmitAnswer {
        question_id: String,
        selected_index: usize,
        reply: Reply<Result<AnswerOutcome, InvalidStateError>>,
    },
    SkipQuestion {
        question_id: String,
        reply: Reply<Result<AnswerOutcome, InvalidStateError>>,
    },
    Stats(Reply<CompletionStats>),
    State(Reply<EngineState>),
    Dispose,
}

/// Handle to a session running on its own tokio task
pub struct SessionDriver {
    tx: mpsc::UnboundedSender<Command>,
    task: JoinHandle<EngineHandle>,
}

impl SessionDriver {
    /// Spawn the driver task. Must be called from within a tokio runtime.
    pub fn spawn(handle: EngineHandle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(handle, rx));
        Self { tx, task }
    }

    /// Forward a transport position update. Returns `false` if the driver stopped.
    pub fn position_update(&self, seconds: f64) -> bool {
        self.tx.send(Command::Position(seconds)).is_ok()
    }

    /// Forward the transport's end-of-media signal
    pub fn ended(&self) -> bool {
        self.tx.send(Command::Ended).is_ok()
    }

    pub async fn pause_by_user(&self) -> bool {
        self.request(Command::PauseByUser).await.unwrap_or(false)
    }

    pub async fn resume_by_user(&self) -> bool {
        self.request(Command::ResumeByUser).await.unwrap_or(false)
    }

    pub async fn submit_answer(
        &self,
        question_id: &str,
        selected_index: usize,
    ) -> Result<AnswerOutcome, InvalidStateError> {
        let question_id = question_id.to_string();
        self.request(|reply| Command::SubmitAnswer {
            question_id,
            selected_index,
            reply,
        })
        .await
        .unwrap_or_else(|| Err(driver_stopped()))
    }

    pub async fn skip_question(&self, question_id: &str) -> Result<AnswerOutcome, InvalidStateError> {
        let question_id = question_id.to_string();
        self.request(|reply| Command::SkipQuestion { question_id, reply })
            .await
            .unwrap_or_else(|| Err(driver_stopped()))
    }

    /// Current stats, or `None` if the driver stopped
    pub async fn stats(&self) -> Option<CompletionStats> {
        self.request(Command::Stats).await
    }

    /// Current engine state, or `None` if the driver stopped
    pub async fn state(&self) -> Option<EngineState> {
        self.request(Command::State).await
    }

    /// Dispose the session and wait for the task to finish.
    /// Returns the disposed handle for inspection.
    pub async fn shutdown(self) -> Option<EngineHandle> {
        let _ = self.tx.send(Command::Dispose);
        match self.task.await {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::warn!("Session driver task failed: {}", e);
                None
            }
        }
    }

    async fn request<T>(&self, build: impl FnOnce(Reply<T>) -> Command) -> Option<T> {
        let (reply, rx) = oneshot::channel();
        self.tx.send(build(reply)).ok()?;
        rx.await.ok()
    }
}

fn driver_stopped() -> InvalidStateError {
    InvalidStateError::SessionClosed("driver stopped".to_string())
}

async fn run(mut handle: EngineHandle, mut rx: mpsc::UnboundedReceiver<Command>) -> EngineHandle {
    loop {
        let command = match handle.time_until_next_task() {
            Some(wait) => tokio::select! {
                command = rx.recv() => command,
                _ = tokio::time::sleep(wait) => {
                    handle.poll();
                    continue;
                }
            },
            None => rx.recv().await,
        };

        let Some(command) = command else {
            tracing::debug!(
                "[session {}] Driver channel closed, disposing",
                handle.session_id()
            );
            handle.dispose();
            break;
        };

        // A dropped reply receiver just means the caller stopped waiting
        match command {
            Command::Position(seconds) => handle.on_position_update(seconds),
            Command::Ended => handle.on_ended(),
            Command::PauseByUser(reply) => {
                let _ = reply.send(handle.pause_by_user());
            }
            Command::ResumeByUser(reply) => {
                let _ = reply.send(handle.resume_by_user());
            }
            Command::SubmitAnswer {
                question_id,
                selected_index,
                reply,
            } => {
                let _ = reply.send(handle.submit_answer(&question_id, selected_index));
            }
            Command::SkipQuestion { question_id, reply } => {
                let _ = reply.send(handle.skip_question(&question_id));
            }
            Command::Stats(reply) => {
                let _ = reply.send(handle.get_stats());
            }
            Command::State(reply) => {
                let _ = reply.send(handle.state().clone());
            }
            Command::Dispose => {
                handle.dispose();
                break;
            }
        }
    }

    handle
}
