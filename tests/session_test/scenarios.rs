//! End-to-end viewing scenarios on the sample asset

use crate::common::{Harness, CHECKPOINT_ID, QUESTION_ID};
use uplay::engine::{InvalidStateError, Resolution};
use uplay::{EngineState, RewardKind};

fn paused_on_question() -> EngineState {
    EngineState::PausedForQuestion(QUESTION_ID.to_string())
}

#[test]
fn test_checkpoint_rewarded_once_when_crossed() {
    let mut h = Harness::sample();

    h.ticks(&[10.0, 20.0, 29.0]);
    assert_eq!(h.session.ledger().total_primary(), 0);

    h.ticks(&[31.0]);
    assert_eq!(h.session.ledger().total_primary(), 5);

    h.ticks(&[40.0]);
    assert_eq!(h.session.ledger().total_primary(), 5);

    let stats = h.session.get_stats();
    assert_eq!(stats.checkpoints_fired, 1);
    assert_eq!(stats.checkpoints_total, 1);
    assert_eq!(
        h.observer.rewards(),
        vec![(5, RewardKind::Primary, format!("Checkpoint: {}", CHECKPOINT_ID))]
    );
}

#[test]
fn test_correct_answer_rewards_and_resumes_after_feedback() {
    let mut h = Harness::sample();

    h.ticks(&[10.0, 20.0, 30.0, 40.0, 50.0, 60.0]);
    assert_eq!(h.session.state(), &paused_on_question());
    assert_eq!(h.observer.triggered(), vec![QUESTION_ID.to_string()]);
    assert_eq!(h.transport.commands(), vec!["pause"]);

    let outcome = h.session.submit_answer(QUESTION_ID, 1).unwrap();
    assert!(outcome.is_correct);
    assert_eq!(outcome.resolution, Resolution::Answered);
    assert_eq!(outcome.primary_awarded, 10);
    assert_eq!(outcome.explanation.as_deref(), Some("B is right"));
    assert_eq!(h.session.ledger().total_primary(), 15);

    // Feedback stays up until the delay elapses
    h.advance_ms(1999);
    assert_eq!(h.session.state(), &paused_on_question());

    h.advance_ms(1);
    assert_eq!(h.session.state(), &EngineState::Playing);
    assert_eq!(h.transport.commands(), vec!["pause", "play"]);
}

#[test]
fn test_wrong_answer_is_final() {
    let mut h = Harness::sample();
    h.ticks(&[10.0, 20.0, 30.0, 40.0, 50.0, 60.0]);
    let before = h.session.ledger().total_primary();

    let outcome = h.session.submit_answer(QUESTION_ID, 0).unwrap();
    assert!(!outcome.is_correct);
    assert_eq!(outcome.primary_awarded, 0);
    assert_eq!(h.session.ledger().total_primary(), before);

    let status = h.session.question_status(QUESTION_ID).unwrap();
    assert!(status.answered);
    assert_eq!(status.selected_index, Some(0));
    assert_eq!(status.is_correct, Some(false));

    assert_eq!(
        h.session.submit_answer(QUESTION_ID, 1),
        Err(InvalidStateError::AlreadyResolved(QUESTION_ID.to_string()))
    );

    h.advance_ms(2000);
    assert_eq!(h.session.state(), &EngineState::Playing);

    // Replaying the window does not ask again
    h.ticks(&[59.0, 60.0, 61.0]);
    assert_eq!(h.session.state(), &EngineState::Playing);
    assert_eq!(h.observer.triggered().len(), 1);
}

#[test]
fn test_seek_over_events_fires_nothing() {
    let mut h = Harness::sample();

    h.ticks(&[10.0, 90.0]);
    let stats = h.session.get_stats();
    assert_eq!(stats.checkpoints_fired, 0);
    assert_eq!(stats.questions_answered, 0);
    assert_eq!(h.session.state(), &EngineState::Playing);

    // Continuing from the new position never fires them retroactively
    h.ticks(&[100.0, 110.0, 120.0]);
    assert_eq!(h.session.get_stats().checkpoints_fired, 0);
    assert!(h.observer.triggered().is_empty());
    assert!(h.transport.commands().is_empty());
}

#[test]
fn test_ended_completes_session() {
    let mut h = Harness::sample();
    h.ticks(&[10.0, 20.0, 30.0, 40.0, 50.0, 60.0]);
    h.session.submit_answer(QUESTION_ID, 1).unwrap();
    h.advance_ms(2000);
    h.ticks(&[70.0, 80.0, 90.0, 100.0, 110.0, 120.0]);

    h.session.on_ended();
    assert_eq!(h.session.state(), &EngineState::Completed);

    let stats = h.session.get_stats();
    assert_eq!(stats.watched_fraction, 1.0);
    assert_eq!(stats.questions_correct, 1);
    assert_eq!(stats.accuracy_percent(), 100);
    assert_eq!(h.observer.completed(), vec![stats]);

    assert!(matches!(
        h.session.submit_answer(QUESTION_ID, 1),
        Err(InvalidStateError::SessionClosed(_))
    ));
}

#[test]
fn test_ended_while_question_pending() {
    let mut h = Harness::sample();
    h.ticks(&[10.0, 20.0, 30.0, 40.0, 50.0, 60.0]);
    h.transport.set_position(120.0);

    h.session.on_ended();
    assert_eq!(h.session.state(), &EngineState::Completed);
    assert_eq!(h.session.get_stats().watched_fraction, 1.0);
    assert!(matches!(
        h.session.submit_answer(QUESTION_ID, 1),
        Err(InvalidStateError::SessionClosed(_))
    ));
}
