//! Async driver tests under paused tokio time

use std::time::Duration;

use crate::common::{coarse_settings, sample_asset, RecordingObserver, RecordingTransport, QUESTION_ID};
use uplay::engine::{create_session_with_clock, EngineHandle, InvalidStateError, SessionDriver, TokioClock};
use uplay::EngineState;

fn spawn() -> (SessionDriver, RecordingTransport) {
    let transport = RecordingTransport::new(120.0);
    let session: EngineHandle = create_session_with_clock(
        sample_asset(),
        transport.clone(),
        RecordingObserver::default(),
        coarse_settings(),
        TokioClock::new(),
    )
    .unwrap();
    (SessionDriver::spawn(session), transport)
}

async fn play_to_question(driver: &SessionDriver) {
    for position in [10.0, 20.0, 30.0, 40.0, 50.0, 60.0] {
        assert!(driver.position_update(position));
    }
    assert_eq!(
        driver.state().await,
        Some(EngineState::PausedForQuestion(QUESTION_ID.to_string()))
    );
}

#[tokio::test(start_paused = true)]
async fn test_driver_resumes_after_feedback_delay() {
    let (driver, transport) = spawn();
    play_to_question(&driver).await;

    let outcome = driver.submit_answer(QUESTION_ID, 1).await.unwrap();
    assert!(outcome.is_correct);

    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert!(driver.state().await.unwrap().active_question().is_some());

    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(driver.state().await, Some(EngineState::Playing));
    assert_eq!(transport.commands(), vec!["pause", "play"]);

    let stats = driver.stats().await.unwrap();
    assert_eq!(stats.total_primary_reward, 15);
}

#[tokio::test(start_paused = true)]
async fn test_driver_shutdown_cancels_pending_resume() {
    let (driver, transport) = spawn();
    play_to_question(&driver).await;
    driver.submit_answer(QUESTION_ID, 0).await.unwrap();

    let handle = driver.shutdown().await.unwrap();
    assert_eq!(handle.state(), &EngineState::Disposed);

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(transport.commands(), vec!["pause"]);
}

#[tokio::test(start_paused = true)]
async fn test_driver_user_pause_and_errors() {
    let (driver, _transport) = spawn();

    assert!(driver.pause_by_user().await);
    assert!(!driver.pause_by_user().await);
    assert!(driver.resume_by_user().await);

    assert!(matches!(
        driver.skip_question(QUESTION_ID).await,
        Err(InvalidStateError::QuestionNotActive { .. })
    ));
}

#[tokio::test(start_paused = true)]
async fn test_driver_completes_on_ended() {
    let (driver, transport) = spawn();
    transport.set_position(120.0);

    assert!(driver.ended());
    assert_eq!(driver.state().await, Some(EngineState::Completed));
    assert_eq!(driver.stats().await.unwrap().watched_fraction, 1.0);

    let handle = driver.shutdown().await.unwrap();
    assert_eq!(handle.state(), &EngineState::Disposed);
}
