//! # fitgoose-core - workout coaching core
//!
//! Pure, synchronous logic behind the FitGoose trainer:
//!
//! - **Joint Geometry** - angle at a joint from three landmarks
//! - **Exercise Classifier** - per-exercise hysteresis rep counter
//! - **Rep Aggregator** - deduplicated session record and energy scoring
//! - **Goose** - the energy mascot's state machine with time decay
//! - **Coaching** - phrase selection and voice command parsing
//!
//! Nothing here touches a clock, a camera or a speaker. Hosts pass "now"
//! explicitly and inject speech capabilities.
//!
//! ## Modules
//!
//! - [`geometry`] - joint angles and distances
//! - [`classifier`] - `classify_frame` and per-exercise rules
//! - [`session`] - [`WorkoutSession`] and [`RepAggregator`]
//! - [`goose`] - energy, mood, decay clock, meter tiers
//! - [`coaching`] - speech capabilities, phrases, voice commands
//! - [`controller`] - [`WorkoutController`], the session control surface
//! - [`demo`] - simulated judgments for camera-less runs
//! - [`sanitize`] - landmark usability checks
//! - [`types`] - shared types and constants
//!
//! ## Example
//!
//! ```rust
//! use chrono::Utc;
//! use fitgoose_core::{CoreConfig, RecordingSpeech, WorkoutController, DemoJudgmentSource, ExerciseKind};
//!
//! let mut workout = WorkoutController::new(CoreConfig::default(), RecordingSpeech::new());
//! workout.start(Utc::now()).unwrap();
//!
//! let mut demo = DemoJudgmentSource::new(ExerciseKind::Squat, 0.8, Some(42));
//! workout.submit_judgment(demo.next_judgment(), Utc::now());
//! assert_eq!(workout.session().unwrap().total_reps, 1);
//!
//! let finished = workout.stop(Utc::now()).unwrap();
//! assert_eq!(finished.total_reps, 1);
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod classifier;
pub mod coaching;
pub mod config;
pub mod controller;
pub mod demo;
pub mod error;
pub mod geometry;
pub mod goose;
pub mod sanitize;
pub mod session;
pub mod types;

// ============================================================================
// Re-exports
// ============================================================================

pub use types::*;

pub use error::{CoreError, CoreResult};

pub use config::{ClassifierConfig, CoreConfig, GooseConfig, ScoringConfig};

pub use geometry::joint_angle;

pub use classifier::{ClassifierState, ExerciseClassifier, ExerciseJudgment, PhaseTransition};

pub use session::{AcceptedRep, RepAggregator, WorkoutSession};

pub use goose::{level_badge, DecayClock, EnergyTier, Goose, GooseState, Mood};

pub use coaching::{
    exercise_instructions, parse_voice_command, Coach, Cue, ExerciseInstructions, LogSpeech,
    Priority, RecordingSpeech, SpeechConfig, SpeechRecognizer, SpeechSink, VoiceCommand,
};

pub use controller::{CommandOutcome, WorkoutController, WorkoutPhase, WorkoutSnapshot};

pub use demo::DemoJudgmentSource;
