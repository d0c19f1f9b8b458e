//! Live workout host.
//!
//! One `WorkoutController` behind a tokio mutex. The decay ticker, the
//! demo feed and the command listener each lock, mutate, unlock, and then
//! publish events with the lock released.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use fitgoose_core::{
    parse_voice_command, AcceptedRep, CommandOutcome, CoreConfig, DemoJudgmentSource,
    ExerciseJudgment, ExerciseKind, GooseState, PoseFrame, SpeechSink, VoiceCommand,
    WorkoutController, WorkoutPhase, WorkoutSession, WorkoutSnapshot,
};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use uuid::Uuid;

use crate::error::RuntimeResult;
use crate::event_bus::{
    EnergyDecayedPayload, EventBus, ExerciseChangedPayload, RepAcceptedPayload,
    SessionEndedPayload, SessionPhasePayload, SessionStartedPayload, WorkoutEvent,
};
use crate::speech::{spawn_speech_worker, QueuedSpeech};

/// Wall-clock derived from tokio's monotonic clock, so paused test time
/// moves it too.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeClock {
    origin: Instant,
    origin_utc: DateTime<Utc>,
}

impl RuntimeClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            origin_utc: Utc::now(),
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        let elapsed = Instant::now().saturating_duration_since(self.origin);
        let elapsed = chrono::Duration::from_std(elapsed).unwrap_or(chrono::Duration::zero());
        self.origin_utc + elapsed
    }
}

impl Default for RuntimeClock {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub struct LiveWorkout {
    controller: Arc<Mutex<WorkoutController<QueuedSpeech>>>,
    events: Arc<EventBus>,
    clock: RuntimeClock,
    ticker: Arc<Mutex<Option<JoinHandle<()>>>>,
    decay_poll: Duration,
}

impl LiveWorkout {
    /// Build the host and its speech worker. The worker hands `speaker`
    /// back once every `LiveWorkout` clone is dropped.
    pub fn spawn<S>(
        core: CoreConfig,
        seed: Option<u64>,
        decay_poll: Duration,
        speaker: S,
    ) -> (Self, JoinHandle<S>)
    where
        S: SpeechSink + Send + 'static,
    {
        let (speech, rx) = QueuedSpeech::channel();
        let worker = spawn_speech_worker(rx, speaker);

        let controller = match seed {
            Some(seed) => WorkoutController::with_seed(core, speech, seed),
            None => WorkoutController::new(core, speech),
        };

        let live = Self {
            controller: Arc::new(Mutex::new(controller)),
            events: Arc::new(EventBus::new()),
            clock: RuntimeClock::new(),
            ticker: Arc::new(Mutex::new(None)),
            decay_poll,
        };
        (live, worker)
    }

    pub fn events(&self) -> Arc<EventBus> {
        Arc::clone(&self.events)
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub async fn start(&self) -> RuntimeResult<Uuid> {
        let now = self.now();
        let (session_id, exercise, energy_level) = {
            let mut controller = self.controller.lock().await;
            let session_id = controller.start(now)?.id;
            (session_id, controller.exercise(), controller.goose().energy_level)
        };

        self.spawn_ticker().await;

        self.events
            .publish(WorkoutEvent::SessionStarted(SessionStartedPayload {
                session_id,
                exercise,
                energy_level,
                timestamp: now,
            }))
            .await;
        Ok(session_id)
    }

    pub async fn pause(&self) -> RuntimeResult<()> {
        let now = self.now();
        let payload = {
            let mut controller = self.controller.lock().await;
            controller.pause(now)?;
            phase_payload(&controller, now)
        };
        self.events.publish(WorkoutEvent::SessionPaused(payload)).await;
        Ok(())
    }

    pub async fn resume(&self) -> RuntimeResult<()> {
        let now = self.now();
        let payload = {
            let mut controller = self.controller.lock().await;
            controller.resume(now)?;
            phase_payload(&controller, now)
        };
        self.events.publish(WorkoutEvent::SessionResumed(payload)).await;
        Ok(())
    }

    pub async fn stop(&self) -> Option<WorkoutSession> {
        if let Some(handle) = self.ticker.lock().await.take() {
            handle.abort();
        }

        let now = self.now();
        let finished = self.controller.lock().await.stop(now);

        if let Some(ref session) = finished {
            self.events
                .publish(WorkoutEvent::SessionEnded(SessionEndedPayload {
                    session_id: session.id,
                    total_reps: session.total_reps,
                    duration_seconds: session.duration_seconds,
                    energy_level_at_end: session.energy_level_at_end,
                    timestamp: now,
                }))
                .await;
        }
        finished
    }

    pub async fn change_exercise(&self, exercise: ExerciseKind) {
        let now = self.now();
        let session_id = {
            let mut controller = self.controller.lock().await;
            controller.change_exercise(exercise);
            controller.session().map(|s| s.id)
        };
        self.events
            .publish(WorkoutEvent::ExerciseChanged(ExerciseChangedPayload {
                session_id,
                exercise,
                timestamp: now,
            }))
            .await;
    }

    pub async fn submit_judgment(&self, judgment: ExerciseJudgment) -> Option<AcceptedRep> {
        let now = self.now();
        let (accepted, event) = {
            let mut controller = self.controller.lock().await;
            let exercise = judgment.exercise_kind;
            let accepted = controller.submit_judgment(judgment, now);
            let event = accepted
                .as_ref()
                .and_then(|rep| rep_event(&controller, exercise, rep, now));
            (accepted, event)
        };
        if let Some(event) = event {
            self.events.publish(event).await;
        }
        accepted
    }

    pub async fn process_frame(&self, frame: &PoseFrame) -> ExerciseJudgment {
        let now = self.now();
        let (judgment, event) = {
            let mut controller = self.controller.lock().await;
            let (judgment, accepted) = controller.process_frame(frame, now);
            let event = accepted
                .as_ref()
                .and_then(|rep| rep_event(&controller, judgment.exercise_kind, rep, now));
            (judgment, event)
        };
        if let Some(event) = event {
            self.events.publish(event).await;
        }
        judgment
    }

    /// Parse a recognised phrase and run it. Unrecognised phrases are
    /// ignored and return `Ok(None)`.
    pub async fn handle_transcript(&self, transcript: &str) -> RuntimeResult<Option<CommandOutcome>> {
        let Some(command) = parse_voice_command(transcript) else {
            tracing::debug!(transcript, "no command recognised");
            return Ok(None);
        };

        let outcome = match command {
            VoiceCommand::StartWorkout => {
                self.start().await?;
                CommandOutcome::Started
            }
            VoiceCommand::PauseWorkout => {
                self.pause().await?;
                CommandOutcome::Paused
            }
            VoiceCommand::ResumeWorkout => {
                self.resume().await?;
                CommandOutcome::Resumed
            }
            VoiceCommand::EndWorkout => CommandOutcome::Ended(self.stop().await),
            VoiceCommand::ChangeExercise(kind) => {
                self.change_exercise(kind).await;
                CommandOutcome::ExerciseChanged(kind)
            }
            VoiceCommand::RepeatInstruction => {
                self.controller.lock().await.repeat_instruction();
                CommandOutcome::InstructionRepeated
            }
        };
        Ok(Some(outcome))
    }

    /// Apply due decay now instead of waiting for the ticker
    pub async fn tick(&self) -> u32 {
        let now = self.now();
        let (ticks, payload) = {
            let mut controller = self.controller.lock().await;
            let ticks = controller.tick(now);
            (ticks, decay_payload(&controller, ticks, now))
        };
        if ticks > 0 {
            self.events.publish(WorkoutEvent::EnergyDecayed(payload)).await;
        }
        ticks
    }

    pub async fn phase(&self) -> WorkoutPhase {
        self.controller.lock().await.phase()
    }

    pub async fn goose(&self) -> GooseState {
        self.controller.lock().await.goose().clone()
    }

    pub async fn snapshot(&self) -> WorkoutSnapshot {
        self.controller.lock().await.snapshot()
    }

    async fn spawn_ticker(&self) {
        let mut ticker_guard = self.ticker.lock().await;
        if let Some(handle) = ticker_guard.take() {
            handle.abort();
        }

        let live = self.clone();
        let poll = self.decay_poll;

        let handle = tokio::spawn(async move {
            let mut interval = time::interval(poll);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if live.phase().await == WorkoutPhase::Idle {
                    break;
                }
                live.tick().await;
            }
        });

        *ticker_guard = Some(handle);
    }

    /// Feed simulated reps every `cadence` while the workout is active.
    /// Runs until the returned handle is aborted.
    pub fn spawn_demo_feed(&self, mut source: DemoJudgmentSource, cadence: Duration) -> JoinHandle<()> {
        let live = self.clone();
        tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + cadence, cadence);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;

                let (phase, exercise, accepted_so_far) = {
                    let controller = live.controller.lock().await;
                    (controller.phase(), controller.exercise(), controller.last_rep_count())
                };
                if phase != WorkoutPhase::Active {
                    continue;
                }
                // The controller rebased (exercise change, rep reset or new
                // session), so the feed restarts its count too.
                if source.exercise() != exercise || source.rep_count() > accepted_so_far {
                    source.set_exercise(exercise);
                }

                let judgment = source.next_judgment();
                tracing::debug!(feedback = %judgment.feedback_text, "demo rep");
                live.submit_judgment(judgment).await;
            }
        })
    }

    /// Handle each line from `lines` as a voice transcript until the
    /// workout ends or the channel closes.
    pub fn spawn_command_listener(
        &self,
        mut lines: mpsc::UnboundedReceiver<String>,
    ) -> JoinHandle<Option<WorkoutSession>> {
        let live = self.clone();
        tokio::spawn(async move {
            while let Some(line) = lines.recv().await {
                match live.handle_transcript(&line).await {
                    Ok(Some(CommandOutcome::Ended(session))) => return session,
                    Ok(Some(outcome)) => tracing::info!(?outcome, "voice command handled"),
                    Ok(None) => {}
                    Err(err) => tracing::warn!(error = %err, "voice command rejected"),
                }
            }
            None
        })
    }
}

fn phase_payload(controller: &WorkoutController<QueuedSpeech>, now: DateTime<Utc>) -> SessionPhasePayload {
    let goose = controller.goose();
    SessionPhasePayload {
        session_id: controller.session().map(|s| s.id),
        energy_level: goose.energy_level,
        mood: goose.mood,
        timestamp: now,
    }
}

fn decay_payload(
    controller: &WorkoutController<QueuedSpeech>,
    ticks: u32,
    now: DateTime<Utc>,
) -> EnergyDecayedPayload {
    EnergyDecayedPayload {
        session_id: controller.session().map(|s| s.id),
        ticks,
        energy_level: controller.goose().energy_level,
        timestamp: now,
    }
}

fn rep_event(
    controller: &WorkoutController<QueuedSpeech>,
    exercise: ExerciseKind,
    rep: &AcceptedRep,
    now: DateTime<Utc>,
) -> Option<WorkoutEvent> {
    let session_id = controller.session()?.id;
    let goose = controller.goose();
    Some(WorkoutEvent::RepAccepted(RepAcceptedPayload {
        session_id,
        exercise,
        rep_count: rep.rep_count,
        total_reps: rep.total_reps,
        is_correct_form: rep.is_correct_form,
        energy_delta: rep.energy_delta,
        energy_level: goose.energy_level,
        mood: goose.mood,
        timestamp: now,
    }))
}
