//! Coaching / Command Layer
//!
//! Speech output and recognition are capabilities injected by the host
//! ([`SpeechSink`], [`SpeechRecognizer`]). This module only decides *what*
//! to say and *which* command a phrase means.

pub mod commands;
pub mod phrases;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::classifier::ExerciseJudgment;
use crate::types::ExerciseKind;

pub use commands::{parse_voice_command, VoiceCommand};
pub use phrases::{exercise_instructions, ExerciseInstructions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// Synthesizer settings handed to the host's speech engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// BCP-47 language tag
    pub language: String,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            language: "en-US".to_string(),
            rate: 1.1,
            pitch: 1.1,
            volume: 0.8,
        }
    }
}

/// A phrase queued for speech
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cue {
    pub text: String,
    pub priority: Priority,
}

pub trait SpeechSink {
    fn speak(&mut self, text: &str, priority: Priority);
}

pub trait SpeechRecognizer {
    /// Next final transcript, if one is ready
    fn recognize(&mut self) -> Option<String>;
}

/// Pull one transcript and parse it
pub fn next_command<R: SpeechRecognizer + ?Sized>(recognizer: &mut R) -> Option<VoiceCommand> {
    recognizer
        .recognize()
        .and_then(|transcript| parse_voice_command(&transcript))
}

impl<S: SpeechSink + ?Sized> SpeechSink for Box<S> {
    fn speak(&mut self, text: &str, priority: Priority) {
        (**self).speak(text, priority)
    }
}

/// Keeps every cue in memory; hosts drain it after each call.
#[derive(Debug, Clone, Default)]
pub struct RecordingSpeech {
    cues: Vec<Cue>,
}

impl RecordingSpeech {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    pub fn drain(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }
}

impl SpeechSink for RecordingSpeech {
    fn speak(&mut self, text: &str, priority: Priority) {
        self.cues.push(Cue {
            text: text.to_string(),
            priority,
        });
    }
}

/// Writes cues to the tracing log instead of a synthesizer
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSpeech;

impl SpeechSink for LogSpeech {
    fn speak(&mut self, text: &str, priority: Priority) {
        tracing::info!(?priority, "🪿 {text}");
    }
}

pub struct Coach<S> {
    sink: S,
    config: SpeechConfig,
    rng: ChaCha8Rng,
}

impl<S: SpeechSink> Coach<S> {
    pub fn new(sink: S, config: SpeechConfig) -> Self {
        Self {
            sink,
            config,
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Deterministic phrase selection
    pub fn with_seed(sink: S, config: SpeechConfig, seed: u64) -> Self {
        Self {
            sink,
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &SpeechConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    fn pick(&mut self, phrases: &'static [&'static str]) -> &'static str {
        phrases.choose(&mut self.rng).copied().unwrap_or_default()
    }

    fn say(&mut self, text: &str, priority: Priority) {
        if !text.is_empty() {
            self.sink.speak(text, priority);
        }
    }

    pub fn workout_started(&mut self, exercise: ExerciseKind) {
        let opener = self.pick(phrases::WORKOUT_START);
        self.say(opener, Priority::High);
        self.instruct_exercise(exercise);
    }

    pub fn instruct_exercise(&mut self, exercise: ExerciseKind) {
        let intro = phrases::exercise_intro(exercise);
        self.say(&intro, Priority::High);
    }

    pub fn workout_paused(&mut self) {
        self.say(phrases::WORKOUT_PAUSED, Priority::Medium);
    }

    pub fn workout_resumed(&mut self) {
        self.say(phrases::WORKOUT_RESUMED, Priority::Medium);
    }

    pub fn workout_ended(&mut self, total_reps: u32, duration_seconds: u64) {
        let summary = phrases::workout_complete(total_reps, duration_seconds);
        self.say(&summary, Priority::High);
    }

    pub fn encourage(&mut self) {
        let line = self.pick(phrases::ENCOURAGEMENT);
        self.say(line, Priority::Medium);
    }

    /// Speak `tip` if given, otherwise a generic correction
    pub fn correct(&mut self, tip: Option<&str>) {
        let line = match tip {
            Some(tip) => tip,
            None => self.pick(phrases::CORRECTION),
        };
        self.say(line, Priority::High);
    }

    /// Milestone line, spoken on every tenth correct rep
    pub fn celebrate(&mut self, rep_count: u32) {
        let line = phrases::milestone(rep_count);
        self.say(&line, Priority::High);
    }

    pub fn exercise_feedback(&mut self, exercise: ExerciseKind, good: bool) {
        let Some(lines) = phrases::exercise_phrases(exercise) else {
            return;
        };
        let pool = if good { lines.good } else { lines.correction };
        let line = self.pick(pool);
        self.say(line, Priority::Medium);
    }

    /// Voice policy for a rep that passed deduplication
    pub fn rep_accepted(&mut self, judgment: &ExerciseJudgment) {
        if !judgment.is_correct_form {
            self.correct(judgment.tips.first().map(String::as_str));
            return;
        }

        if judgment.rep_count % 10 == 0 {
            self.celebrate(judgment.rep_count);
        } else if judgment.rep_count % 5 == 0 {
            self.encourage();
        } else {
            self.exercise_feedback(judgment.exercise_kind, true);
        }
    }
}
