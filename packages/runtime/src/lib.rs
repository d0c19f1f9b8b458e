//! Tokio host for the FitGoose workout core.
//!
//! Owns the single [`fitgoose_core::WorkoutController`], drives its decay
//! clock, queues speech, and publishes workout events.

pub mod config;
pub mod error;
pub mod event_bus;
pub mod live;
pub mod logging;
pub mod speech;

pub use config::RuntimeConfig;
pub use error::{RuntimeError, RuntimeResult};
pub use event_bus::{EventBus, EventEnvelope, WorkoutEvent};
pub use live::{LiveWorkout, RuntimeClock};
pub use speech::{coalesce, spawn_speech_worker, QueuedSpeech};
