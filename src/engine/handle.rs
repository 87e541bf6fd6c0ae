//! Engine handle: one playback session
//!
//! Every entry point runs synchronously on the caller's thread and first
//! executes timer tasks that have come due. Methods take `&mut self`, so a
//! session can only ever be mutated from one place at a time.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::controller::PlaybackController;
use super::error::InvalidStateError;
use super::ledger::{RewardEntry, RewardLedger};
use super::levels::{experience, level_for_xp};
use super::sampler::PositionSampler;
use super::scheduler::{schedule, ScheduledEvent};
use super::session::{QuestionStatus, Resolution, SessionState};
use super::stats::{compute_stats, CompletionStats};
use super::timers::{Clock, SystemClock, TaskKind, TaskToken, TimerQueue};
use super::transport::{MediaTransport, SessionObserver};
use crate::catalog::ValidationError;
use crate::config::EngineSettings;
use crate::{EngineState, EventId, Question, RewardKind, VideoAsset};

/// Transport and asset durations further apart than this are reported
const DURATION_MISMATCH_TOLERANCE_SECS: f64 = 1.0;

/// Result of resolving a question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOutcome {
    pub question_id: EventId,
    pub resolution: Resolution,
    pub selected_index: Option<usize>,
    pub is_correct: bool,
    pub primary_awarded: u32,
    pub secondary_awarded: u32,
    pub explanation: Option<String>,
}

impl AnswerOutcome {
    fn new(
        question: &Question,
        resolution: Resolution,
        selected_index: Option<usize>,
        is_correct: bool,
        entries: &[RewardEntry],
    ) -> Self {
        let awarded = |kind: RewardKind| -> u32 {
            entries
                .iter()
                .filter(|e| e.kind == kind)
                .map(|e| e.amount)
                .sum()
        };

        Self {
            question_id: question.id.clone(),
            resolution,
            selected_index,
            is_correct,
            primary_awarded: awarded(RewardKind::Primary),
            secondary_awarded: awarded(RewardKind::Secondary),
            explanation: question.explanation.clone(),
        }
    }
}

/// Start a session on the system clock
pub fn create_session(
    asset: Arc<VideoAsset>,
    transport: impl MediaTransport + 'static,
    observer: impl SessionObserver + 'static,
    settings: EngineSettings,
) -> Result<EngineHandle, ValidationError> {
    create_session_with_clock(asset, transport, observer, settings, SystemClock::new())
}

/// Start a session measuring timers against `clock`
pub fn create_session_with_clock(
    asset: Arc<VideoAsset>,
    transport: impl MediaTransport + 'static,
    observer: impl SessionObserver + 'static,
    settings: EngineSettings,
    clock: impl Clock + 'static,
) -> Result<EngineHandle, ValidationError> {
    settings.validate()?;

    let id = Uuid::new_v4();
    let reported = transport.duration();
    if reported.is_finite()
        && reported > 0.0
        && (reported - asset.duration_seconds()).abs() > DURATION_MISMATCH_TOLERANCE_SECS
    {
        tracing::warn!(
            "[session {}] Transport duration {:.2}s differs from asset '{}' duration {:.2}s; using the asset's",
            id,
            reported,
            asset.id(),
            asset.duration_seconds()
        );
    }

    tracing::info!(
        "[session {}] Started on asset '{}' ({} checkpoint(s), {} question(s))",
        id,
        asset.id(),
        asset.checkpoints().len(),
        asset.questions().len()
    );

    Ok(EngineHandle {
        id,
        sampler: PositionSampler::new(settings.update_period(), settings.contiguity_factor),
        session: SessionState::new(&asset),
        controller: PlaybackController::new(Box::new(transport)),
        timers: TimerQueue::new(),
        clock: Box::new(clock),
        observer: Box::new(observer),
        position: 0.0,
        pending_timeout: None,
        asset,
        settings,
    })
}

/// A live playback session
pub struct EngineHandle {
    id: Uuid,
    asset: Arc<VideoAsset>,
    settings: EngineSettings,
    sampler: PositionSampler,
    controller: PlaybackController,
    session: SessionState,
    timers: TimerQueue,
    clock: Box<dyn Clock>,
    observer: Box<dyn SessionObserver>,
    /// Last accepted position, clamped to the asset duration
    position: f64,
    /// Time-limit task of the active question
    pending_timeout: Option<TaskToken>,
}

impl EngineHandle {
    pub fn session_id(&self) -> Uuid {
        self.id
    }

    pub fn asset(&self) -> &Arc<VideoAsset> {
        &self.asset
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn state(&self) -> &EngineState {
        self.controller.state()
    }

    pub fn is_closed(&self) -> bool {
        self.controller.state().is_terminal()
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn ledger(&self) -> &RewardLedger {
        self.session.ledger()
    }

    pub fn session_state(&self) -> &SessionState {
        &self.session
    }

    pub fn question_status(&self, question_id: &str) -> Option<&QuestionStatus> {
        let index = self.asset.question_index(question_id)?;
        self.session.questions().get(index)
    }

    pub fn checkpoint_fired(&self, checkpoint_id: &str) -> Option<bool> {
        let index = self.asset.checkpoint_index(checkpoint_id)?;
        Some(self.session.is_fired(index))
    }

    /// Snapshot of progress at the current position
    pub fn get_stats(&self) -> CompletionStats {
        compute_stats(&self.asset, &self.session, self.position)
    }

    // ========================================
    // TRANSPORT NOTIFICATIONS
    // ========================================

    /// Handle a position update from the media transport
    pub fn on_position_update(&mut self, seconds: f64) {
        if self.is_closed() {
            tracing::trace!("[session {}] Ignoring position update after close", self.id);
            return;
        }
        self.poll();

        if !seconds.is_finite() {
            tracing::warn!("[session {}] Dropping non-finite position {}", self.id, seconds);
            return;
        }

        let position = seconds.clamp(0.0, self.asset.duration_seconds());
        let tick = self.sampler.observe(position);
        self.position = position;

        if tick.motion.is_seek() {
            tracing::debug!(
                "[session {}] Seek {:.2}s -> {:.2}s ({:?})",
                self.id,
                tick.previous_position,
                tick.position,
                tick.motion
            );
        }

        self.observer
            .on_progress(position / self.asset.duration_seconds());

        let events = schedule(&tick, &self.asset, &self.session, self.controller.state());
        for event in events {
            match event {
                ScheduledEvent::CheckpointReached(index) => self.fire_checkpoint(index, position),
                ScheduledEvent::QuestionTriggered(index) => self.trigger_question(index, position),
            }
        }
    }

    /// Handle the transport's end-of-media signal
    pub fn on_ended(&mut self) {
        if self.is_closed() {
            tracing::trace!("[session {}] Ignoring ended signal after close", self.id);
            return;
        }

        self.timers.clear();
        self.pending_timeout = None;

        let reported = self.controller.transport().current_position();
        if reported.is_finite() {
            self.position = self
                .position
                .max(reported.clamp(0.0, self.asset.duration_seconds()));
        }

        self.controller.complete();
        self.observer.on_state_changed(self.controller.state());

        let stats = self.get_stats();
        tracing::info!(
            "[session {}] Completed: {:.0}% watched, {}/{} checkpoints, {}/{} correct, {} primary / {} secondary",
            self.id,
            stats.watched_fraction * 100.0,
            stats.checkpoints_fired,
            stats.checkpoints_total,
            stats.questions_correct,
            stats.questions_total,
            stats.total_primary_reward,
            stats.total_secondary_reward
        );

        self.observer.on_progress(stats.watched_fraction);
        self.observer.on_complete(&stats);
    }

    // ========================================
    // USER ACTIONS
    // ========================================

    /// Answer the active question
    pub fn submit_answer(
        &mut self,
        question_id: &str,
        selected_index: usize,
    ) -> Result<AnswerOutcome, InvalidStateError> {
        self.poll();
        let index = self.active_question_index(question_id)?;
        let question = &self.asset.questions()[index];

        if selected_index >= question.options.len() {
            return Err(InvalidStateError::OptionOutOfRange {
                question: question.id.clone(),
                index: selected_index,
                options: question.options.len(),
            });
        }

        let is_correct = question.is_correct(selected_index);
        let level_before = level_for_xp(experience(&self.asset, &self.session));
        self.session
            .resolve_question(index, Resolution::Answered, Some(selected_index), is_correct);

        let entries = self
            .session
            .ledger_mut()
            .apply_answer(question, selected_index, self.position);
        for entry in &entries {
            self.observer
                .on_reward_earned(entry.amount, entry.kind, &entry.reason);
        }

        let outcome = AnswerOutcome::new(
            question,
            Resolution::Answered,
            Some(selected_index),
            is_correct,
            &entries,
        );
        tracing::debug!(
            "[session {}] Question '{}' answered with option {} ({})",
            self.id,
            question.id,
            selected_index,
            if is_correct { "correct" } else { "wrong" }
        );
        self.observer.on_question_resolved(question, &outcome);

        let level = level_for_xp(experience(&self.asset, &self.session));
        if level > level_before {
            tracing::info!("[session {}] Reached level {}", self.id, level);
            self.observer.on_level_up(level);
        }

        self.cancel_question_timeout();
        let delay = self.settings.feedback_delay();
        if delay.is_zero() {
            self.leave_question(index);
        } else {
            let due = self.clock.now().saturating_add(delay);
            self.timers
                .schedule(TaskKind::ResumeAfterFeedback { question: index }, due);
        }

        Ok(outcome)
    }

    /// Dismiss the active question without answering; playback resumes at once
    pub fn skip_question(&mut self, question_id: &str) -> Result<AnswerOutcome, InvalidStateError> {
        self.poll();
        let index = self.active_question_index(question_id)?;
        Ok(self.resolve_unanswered(index, Resolution::Skipped))
    }

    /// Pause on the user's request. Returns whether the state changed.
    pub fn pause_by_user(&mut self) -> bool {
        if self.is_closed() {
            return false;
        }
        self.poll();
        let changed = self.controller.pause_by_user();
        if changed {
            tracing::debug!("[session {}] Paused by user at {:.2}s", self.id, self.position);
            self.observer.on_state_changed(self.controller.state());
        }
        changed
    }

    /// Resume after a user pause. Returns whether the state changed.
    pub fn resume_by_user(&mut self) -> bool {
        if self.is_closed() {
            return false;
        }
        self.poll();
        let changed = self.controller.resume_by_user();
        if changed {
            tracing::debug!("[session {}] Resumed by user at {:.2}s", self.id, self.position);
            self.observer.on_state_changed(self.controller.state());
        }
        changed
    }

    /// Discard the session. Pending timers are dropped and every later call is
    /// ignored or rejected.
    pub fn dispose(&mut self) {
        self.timers.clear();
        self.pending_timeout = None;
        if self.controller.dispose() {
            tracing::info!("[session {}] Disposed", self.id);
            self.observer.on_state_changed(self.controller.state());
        }
    }

    // ========================================
    // TIMERS
    // ========================================

    /// Run timer tasks that have come due. Returns how many ran.
    pub fn poll(&mut self) -> usize {
        if self.is_closed() {
            return 0;
        }

        let due = self.timers.take_due(self.clock.now());
        for task in &due {
            match task.kind {
                TaskKind::ResumeAfterFeedback { question } => self.leave_question(question),
                TaskKind::QuestionTimeout { question } => {
                    self.pending_timeout = None;
                    let id = &self.asset.questions()[question].id;
                    if self.controller.state().active_question() == Some(id.as_str())
                        && !self.session.is_answered(question)
                    {
                        tracing::debug!("[session {}] Question '{}' timed out", self.id, id);
                        self.resolve_unanswered(question, Resolution::TimedOut);
                    }
                }
            }
        }
        due.len()
    }

    /// How long until the next timer task is due, if any is pending
    pub fn time_until_next_task(&self) -> Option<Duration> {
        let now = self.clock.now();
        self.timers.next_due().map(|due| due.saturating_sub(now))
    }

    // ========================================
    // INTERNALS
    // ========================================

    fn fire_checkpoint(&mut self, index: usize, at_seconds: f64) {
        if !self.session.mark_checkpoint_fired(index, at_seconds) {
            return;
        }

        let checkpoint = &self.asset.checkpoints()[index];
        tracing::debug!(
            "[session {}] Checkpoint '{}' reached at {:.2}s",
            self.id,
            checkpoint.id,
            at_seconds
        );

        if let Some(entry) = self
            .session
            .ledger_mut()
            .apply_checkpoint_fire(checkpoint, at_seconds)
        {
            self.observer
                .on_reward_earned(entry.amount, entry.kind, &entry.reason);
        }
    }

    fn trigger_question(&mut self, index: usize, at_seconds: f64) {
        let question = &self.asset.questions()[index];
        if !self.controller.enter_question(&question.id) {
            return;
        }
        self.session.mark_question_triggered(index, at_seconds);

        tracing::debug!(
            "[session {}] Question '{}' triggered at {:.2}s",
            self.id,
            question.id,
            at_seconds
        );

        if let Some(limit) = self.settings.question_time_limit(question) {
            match self.clock.now().checked_add(limit) {
                Some(due) => {
                    self.pending_timeout = Some(
                        self.timers
                            .schedule(TaskKind::QuestionTimeout { question: index }, due),
                    );
                }
                None => tracing::warn!(
                    "[session {}] Time limit of '{}' is out of range; waiting indefinitely",
                    self.id,
                    question.id
                ),
            }
        }

        self.observer.on_state_changed(self.controller.state());
        self.observer.on_question_triggered(question);
    }

    /// Resolve the active question without a reward and resume immediately
    fn resolve_unanswered(&mut self, index: usize, resolution: Resolution) -> AnswerOutcome {
        let question = &self.asset.questions()[index];
        self.session.resolve_question(index, resolution, None, false);

        let outcome = AnswerOutcome::new(question, resolution, None, false, &[]);
        self.observer.on_question_resolved(question, &outcome);

        self.cancel_question_timeout();
        self.leave_question(index);
        outcome
    }

    fn leave_question(&mut self, index: usize) {
        let id = &self.asset.questions()[index].id;
        if self.controller.leave_question(id) {
            tracing::debug!("[session {}] Resuming playback after '{}'", self.id, id);
            self.observer.on_state_changed(self.controller.state());
        }
    }

    fn cancel_question_timeout(&mut self) {
        if let Some(token) = self.pending_timeout.take() {
            self.timers.cancel(token);
        }
    }

    /// Index of `question_id` if it is the active, unresolved question
    fn active_question_index(&self, question_id: &str) -> Result<usize, InvalidStateError> {
        let state = self.controller.state();
        if state.is_terminal() {
            return Err(InvalidStateError::SessionClosed(state.to_string()));
        }

        let index = self
            .asset
            .question_index(question_id)
            .ok_or_else(|| InvalidStateError::UnknownQuestion(question_id.to_string()))?;

        if self.session.is_answered(index) {
            return Err(InvalidStateError::AlreadyResolved(question_id.to_string()));
        }
        if state.active_question() != Some(question_id) {
            return Err(InvalidStateError::QuestionNotActive {
                question: question_id.to_string(),
                state: state.to_string(),
            });
        }

        Ok(index)
    }
}

impl std::fmt::Debug for EngineHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineHandle")
            .field("id", &self.id)
            .field("asset", &self.asset.id())
            .field("state", self.controller.state())
            .field("position", &self.position)
            .finish_non_exhaustive()
    }
}
