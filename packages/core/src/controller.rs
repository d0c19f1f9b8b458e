//! Session Controller
//!
//! Single owner of the classifier, aggregator, goose and coach. Every
//! mutation of workout state goes through one `&mut self` call, so hosts
//! that share a controller across tasks only need to wrap it in a mutex.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::classifier::{feedback, ClassifierState, ExerciseClassifier, ExerciseJudgment};
use crate::coaching::{Coach, SpeechSink, VoiceCommand};
use crate::config::CoreConfig;
use crate::error::{CoreError, CoreResult};
use crate::goose::{level_badge, EnergyTier, Goose, GooseState};
use crate::session::{AcceptedRep, RepAggregator, WorkoutSession};
use crate::types::{ExerciseKind, PoseFrame};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutPhase {
    Idle,
    Active,
    Paused,
}

impl WorkoutPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            WorkoutPhase::Idle => "idle",
            WorkoutPhase::Active => "active",
            WorkoutPhase::Paused => "paused",
        }
    }
}

/// What a voice command ended up doing
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    Started,
    Paused,
    Resumed,
    Ended(Option<WorkoutSession>),
    ExerciseChanged(ExerciseKind),
    InstructionRepeated,
}

/// Read-only view for presentation layers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSnapshot {
    pub phase: WorkoutPhase,
    pub goose: GooseState,
    pub tier: EnergyTier,
    pub tier_label: &'static str,
    pub badge_level: u8,
    pub classifier: ClassifierState,
    pub session: Option<WorkoutSession>,
    pub latest_judgment: Option<ExerciseJudgment>,
}

pub struct WorkoutController<S: SpeechSink> {
    classifier: ExerciseClassifier,
    aggregator: RepAggregator,
    goose: Goose,
    coach: Coach<S>,
    session: Option<WorkoutSession>,
    phase: WorkoutPhase,
    latest: Option<ExerciseJudgment>,
}

impl<S: SpeechSink> WorkoutController<S> {
    pub fn new(config: CoreConfig, sink: S) -> Self {
        let coach = Coach::new(sink, config.speech.clone());
        Self::with_coach(config, coach)
    }

    pub fn with_seed(config: CoreConfig, sink: S, seed: u64) -> Self {
        let coach = Coach::with_seed(sink, config.speech.clone(), seed);
        Self::with_coach(config, coach)
    }

    fn with_coach(config: CoreConfig, coach: Coach<S>) -> Self {
        Self {
            classifier: ExerciseClassifier::new(config.classifier),
            aggregator: RepAggregator::new(config.scoring),
            goose: Goose::new(config.goose),
            coach,
            session: None,
            phase: WorkoutPhase::Idle,
            latest: None,
        }
    }

    fn reject(&self, action: &'static str) -> CoreError {
        tracing::warn!(action, state = self.phase.as_str(), "workout transition rejected");
        CoreError::InvalidTransition {
            action,
            state: self.phase.as_str(),
        }
    }

    pub fn start(&mut self, now: DateTime<Utc>) -> CoreResult<&WorkoutSession> {
        if self.phase != WorkoutPhase::Idle {
            return Err(self.reject("start"));
        }

        let exercise = self.classifier.exercise_kind();
        self.classifier.reset_reps();
        self.aggregator.reset();
        self.goose.start(exercise, now);
        self.phase = WorkoutPhase::Active;
        self.coach.workout_started(exercise);

        let session = self.session.insert(WorkoutSession::begin(now));
        session.record_energy(self.goose.energy());
        tracing::info!(session_id = %session.id, %exercise, "workout started");
        Ok(session)
    }

    /// Decay that fell due before `now` is applied before the clock halts.
    pub fn pause(&mut self, now: DateTime<Utc>) -> CoreResult<()> {
        if self.phase != WorkoutPhase::Active {
            return Err(self.reject("pause"));
        }

        self.goose.tick(now);
        self.goose.pause();
        self.phase = WorkoutPhase::Paused;
        self.coach.workout_paused();
        tracing::info!("workout paused");
        Ok(())
    }

    pub fn resume(&mut self, now: DateTime<Utc>) -> CoreResult<()> {
        if self.phase != WorkoutPhase::Paused {
            return Err(self.reject("resume"));
        }

        self.goose.resume(now);
        self.phase = WorkoutPhase::Active;
        self.coach.workout_resumed();
        tracing::info!("workout resumed");
        Ok(())
    }

    /// Valid in any phase. Returns the closed session, if one was open.
    pub fn stop(&mut self, now: DateTime<Utc>) -> Option<WorkoutSession> {
        if self.phase == WorkoutPhase::Active {
            self.goose.tick(now);
        }

        let finished = self.session.take().map(|mut session| {
            session.close(now, self.goose.energy());
            self.coach
                .workout_ended(session.total_reps, session.duration_seconds);
            tracing::info!(
                session_id = %session.id,
                total_reps = session.total_reps,
                duration_seconds = session.duration_seconds,
                "workout ended"
            );
            session
        });

        self.goose.stop();
        self.phase = WorkoutPhase::Idle;
        finished
    }

    /// Allowed in any phase; resets the classifier even for the same kind.
    pub fn change_exercise(&mut self, exercise: ExerciseKind) {
        self.classifier.set_exercise_kind(exercise);
        self.aggregator.rebase();
        self.goose.change_exercise(exercise);
        self.coach.instruct_exercise(exercise);
        tracing::info!(%exercise, "exercise changed");
    }

    pub fn reset_reps(&mut self) {
        self.classifier.reset_reps();
        self.aggregator.rebase();
    }

    pub fn repeat_instruction(&mut self) {
        self.coach.instruct_exercise(self.classifier.exercise_kind());
    }

    /// Classify one camera frame and feed the result to the aggregator.
    ///
    /// The classifier is frozen while paused, so movement during a break
    /// never surfaces as reps after resuming.
    pub fn process_frame(
        &mut self,
        frame: &PoseFrame,
        now: DateTime<Utc>,
    ) -> (ExerciseJudgment, Option<AcceptedRep>) {
        if self.phase == WorkoutPhase::Paused {
            let judgment = ExerciseJudgment::neutral(
                self.classifier.exercise_kind(),
                self.classifier.state().rep_count,
                feedback::paused(),
            );
            return (judgment, None);
        }

        let judgment = self.classifier.classify_frame(frame);
        let accepted = self.submit_judgment(judgment.clone(), now);
        (judgment, accepted)
    }

    /// Latest judgment is always updated; session, energy and speech only
    /// react while the workout is active and the rep is new.
    pub fn submit_judgment(
        &mut self,
        judgment: ExerciseJudgment,
        now: DateTime<Utc>,
    ) -> Option<AcceptedRep> {
        let judgment = &*self.latest.insert(judgment);

        if self.phase != WorkoutPhase::Active {
            return None;
        }
        let session = self.session.as_mut()?;

        let accepted = self.aggregator.submit(session, judgment, now)?;
        self.goose
            .apply_delta(accepted.energy_delta, accepted.is_correct_form);
        session.record_energy(self.goose.energy());
        self.coach.rep_accepted(judgment);
        Some(accepted)
    }

    /// Apply due energy decay; returns the number of steps applied.
    pub fn tick(&mut self, now: DateTime<Utc>) -> u32 {
        if self.phase != WorkoutPhase::Active {
            return 0;
        }
        self.goose.tick(now)
    }

    pub fn handle_command(
        &mut self,
        command: VoiceCommand,
        now: DateTime<Utc>,
    ) -> CoreResult<CommandOutcome> {
        tracing::debug!(?command, "voice command");
        match command {
            VoiceCommand::StartWorkout => self.start(now).map(|_| CommandOutcome::Started),
            VoiceCommand::PauseWorkout => self.pause(now).map(|_| CommandOutcome::Paused),
            VoiceCommand::ResumeWorkout => self.resume(now).map(|_| CommandOutcome::Resumed),
            VoiceCommand::EndWorkout => Ok(CommandOutcome::Ended(self.stop(now))),
            VoiceCommand::ChangeExercise(kind) => {
                self.change_exercise(kind);
                Ok(CommandOutcome::ExerciseChanged(kind))
            }
            VoiceCommand::RepeatInstruction => {
                self.repeat_instruction();
                Ok(CommandOutcome::InstructionRepeated)
            }
        }
    }

    pub fn phase(&self) -> WorkoutPhase {
        self.phase
    }

    pub fn goose(&self) -> &GooseState {
        self.goose.state()
    }

    pub fn session(&self) -> Option<&WorkoutSession> {
        self.session.as_ref()
    }

    pub fn latest_judgment(&self) -> Option<&ExerciseJudgment> {
        self.latest.as_ref()
    }

    pub fn classifier_state(&self) -> ClassifierState {
        self.classifier.state()
    }

    pub fn exercise(&self) -> ExerciseKind {
        self.classifier.exercise_kind()
    }

    /// Highest classifier rep count accepted since the last rebase
    pub fn last_rep_count(&self) -> u32 {
        self.aggregator.last_rep_count()
    }

    pub fn coach(&self) -> &Coach<S> {
        &self.coach
    }

    pub fn coach_mut(&mut self) -> &mut Coach<S> {
        &mut self.coach
    }

    pub fn snapshot(&self) -> WorkoutSnapshot {
        let goose = self.goose.state().clone();
        let tier = self.goose.tier();
        WorkoutSnapshot {
            phase: self.phase,
            badge_level: level_badge(goose.energy_level),
            goose,
            tier,
            tier_label: tier.label(),
            classifier: self.classifier.state(),
            session: self.session.clone(),
            latest_judgment: self.latest.clone(),
        }
    }
}
