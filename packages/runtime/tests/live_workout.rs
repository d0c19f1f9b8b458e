use std::time::Duration;

use fitgoose_core::{
    CommandOutcome, CoreConfig, DemoJudgmentSource, ExerciseKind, Mood, RecordingSpeech,
    WorkoutPhase,
};
use fitgoose_runtime::{LiveWorkout, RuntimeError, WorkoutEvent};

const POLL: Duration = Duration::from_millis(1_000);

fn live() -> (LiveWorkout, tokio::task::JoinHandle<RecordingSpeech>) {
    LiveWorkout::spawn(CoreConfig::default(), Some(11), POLL, RecordingSpeech::new())
}

#[tokio::test(start_paused = true)]
async fn test_ticker_decays_energy_while_active() {
    let (live, _speech) = live();
    live.start().await.unwrap();
    assert_eq!(live.goose().await.energy_level, 10.0);

    tokio::time::sleep(Duration::from_secs(31)).await;

    let goose = live.goose().await;
    assert_eq!(goose.energy_level, 7.0);
    assert_eq!(goose.mood, Mood::Excited);
}

#[tokio::test(start_paused = true)]
async fn test_pause_freezes_decay() {
    let (live, _speech) = live();
    live.start().await.unwrap();

    tokio::time::sleep(Duration::from_secs(15)).await;
    live.pause().await.unwrap();
    assert_eq!(live.goose().await.energy_level, 9.0);

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(live.goose().await.energy_level, 9.0);
    assert_eq!(live.phase().await, WorkoutPhase::Paused);
}

#[tokio::test(start_paused = true)]
async fn test_demo_feed_accepts_reps() {
    let (live, _speech) = live();
    live.start().await.unwrap();

    let feed = live.spawn_demo_feed(
        DemoJudgmentSource::new(ExerciseKind::Squat, 1.0, Some(5)),
        Duration::from_secs(2),
    );
    tokio::time::sleep(Duration::from_secs(7)).await;
    feed.abort();

    let snapshot = live.snapshot().await;
    let session = snapshot.session.expect("open session");
    assert_eq!(session.total_reps, 3);
    // 10 + 5, then +7 twice with the consistency bonus
    assert_eq!(snapshot.goose.energy_level, 29.0);
}

#[tokio::test(start_paused = true)]
async fn test_demo_feed_restarts_count_after_same_exercise_change() {
    let (live, _speech) = live();
    live.start().await.unwrap();

    let feed = live.spawn_demo_feed(
        DemoJudgmentSource::new(ExerciseKind::Squat, 1.0, Some(5)),
        Duration::from_secs(2),
    );
    tokio::time::sleep(Duration::from_secs(7)).await;
    let changed = live.handle_transcript("let's do squats").await.unwrap();
    assert!(matches!(
        changed,
        Some(CommandOutcome::ExerciseChanged(ExerciseKind::Squat))
    ));

    tokio::time::sleep(Duration::from_secs(2)).await;
    feed.abort();

    let session = live.snapshot().await.session.expect("open session");
    assert_eq!(session.total_reps, 4);
    assert_eq!(session.exercise_history.len(), 4);
    assert_eq!(session.exercise_history[3].rep_count, 1);
}

#[tokio::test(start_paused = true)]
async fn test_demo_feed_idles_while_paused() {
    let (live, _speech) = live();
    live.start().await.unwrap();
    live.pause().await.unwrap();

    let feed = live.spawn_demo_feed(
        DemoJudgmentSource::new(ExerciseKind::Squat, 1.0, Some(5)),
        Duration::from_secs(1),
    );
    tokio::time::sleep(Duration::from_secs(5)).await;
    feed.abort();

    assert_eq!(live.snapshot().await.session.unwrap().total_reps, 0);
}

#[tokio::test(start_paused = true)]
async fn test_transcripts_drive_lifecycle() {
    let (live, _speech) = live();

    let started = live.handle_transcript("let's start workout").await.unwrap();
    assert!(matches!(started, Some(CommandOutcome::Started)));

    let paused = live.handle_transcript("pause").await.unwrap();
    assert!(matches!(paused, Some(CommandOutcome::Paused)));
    assert_eq!(live.phase().await, WorkoutPhase::Paused);

    let ignored = live.handle_transcript("what's for dinner").await.unwrap();
    assert!(ignored.is_none());

    let changed = live.handle_transcript("jumping jacks").await.unwrap();
    assert!(matches!(
        changed,
        Some(CommandOutcome::ExerciseChanged(ExerciseKind::JumpingJack))
    ));

    let ended = live.handle_transcript("finish workout").await.unwrap();
    match ended {
        Some(CommandOutcome::Ended(Some(session))) => assert!(session.end_time.is_some()),
        other => panic!("unexpected outcome {other:?}"),
    }
    assert_eq!(live.phase().await, WorkoutPhase::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_invalid_transition_is_reported() {
    let (live, _speech) = live();
    let err = live.resume().await.unwrap_err();
    assert!(matches!(err, RuntimeError::Core(_)));
    assert_eq!(live.phase().await, WorkoutPhase::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_command_listener_returns_finished_session() {
    let (live, _speech) = live();
    live.start().await.unwrap();

    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
    let listener = live.spawn_command_listener(rx);
    tx.send("push ups".to_string()).unwrap();
    tx.send("end workout".to_string()).unwrap();

    let session = listener.await.unwrap().expect("session");
    assert_eq!(session.total_reps, 0);
    assert_eq!(live.snapshot().await.classifier.current_exercise, ExerciseKind::Pushup);
}

#[tokio::test(start_paused = true)]
async fn test_events_follow_the_session() {
    let (live, _speech) = live();
    let mut events = live.events().subscribe_global();

    let session_id = live.start().await.unwrap();
    live.submit_judgment(DemoJudgmentSource::new(ExerciseKind::Squat, 1.0, Some(1)).next_judgment())
        .await;
    live.pause().await.unwrap();
    live.stop().await;

    let mut seen = Vec::new();
    while let Ok(envelope) = events.try_recv() {
        assert_eq!(envelope.event.session_id(), Some(session_id));
        seen.push(envelope.event.event_type());
    }
    assert_eq!(
        seen,
        vec!["SESSION_STARTED", "REP_ACCEPTED", "SESSION_PAUSED", "SESSION_ENDED"]
    );

    let (sub_id, mut reps) = live
        .events()
        .subscribe_filtered(None, Some(vec!["REP_ACCEPTED".to_string()]))
        .await;
    let next = live.start().await.unwrap();
    live.submit_judgment(DemoJudgmentSource::new(ExerciseKind::Squat, 1.0, Some(1)).next_judgment())
        .await;
    match reps.recv().await.unwrap().event {
        WorkoutEvent::RepAccepted(payload) => {
            assert_eq!(payload.session_id, next);
            assert_eq!(payload.total_reps, 1);
        }
        other => panic!("unexpected event {}", other.event_type()),
    }
    live.events().unsubscribe(&sub_id).await;
}

#[tokio::test(start_paused = true)]
async fn test_speech_worker_returns_sink_after_shutdown() {
    let (live, speech) = live();
    live.start().await.unwrap();
    live.stop().await;
    drop(live);

    let sink = speech.await.unwrap();
    let last = sink.cues().last().expect("spoken cue");
    assert!(last.text.starts_with("Workout complete!"));
}
