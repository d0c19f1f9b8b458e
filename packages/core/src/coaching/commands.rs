//! Voice command parsing.
//!
//! Keyword matching over a lower-cased transcript, first match wins.

use serde::{Deserialize, Serialize};

use crate::types::ExerciseKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "exercise", rename_all = "snake_case")]
pub enum VoiceCommand {
    StartWorkout,
    PauseWorkout,
    ResumeWorkout,
    EndWorkout,
    ChangeExercise(ExerciseKind),
    RepeatInstruction,
}

const START: &[&str] = &["start workout", "begin"];
const END: &[&str] = &["end workout", "finish workout"];
const PAUSE: &[&str] = &["pause", "stop"];
const RESUME: &[&str] = &["resume", "continue", "keep going"];
const REPEAT: &[&str] = &["repeat", "say again"];

const EXERCISES: &[(&str, ExerciseKind)] = &[
    ("squat", ExerciseKind::Squat),
    ("push up", ExerciseKind::Pushup),
    ("pushup", ExerciseKind::Pushup),
    ("push-up", ExerciseKind::Pushup),
    ("jumping jack", ExerciseKind::JumpingJack),
];

fn mentions(transcript: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| transcript.contains(k))
}

/// Map a recognised phrase to a command; `None` when nothing matches.
pub fn parse_voice_command(transcript: &str) -> Option<VoiceCommand> {
    let t = transcript.trim().to_lowercase();
    if t.is_empty() {
        return None;
    }

    if mentions(&t, START) {
        return Some(VoiceCommand::StartWorkout);
    }
    if mentions(&t, END) {
        return Some(VoiceCommand::EndWorkout);
    }
    if mentions(&t, PAUSE) {
        return Some(VoiceCommand::PauseWorkout);
    }
    if mentions(&t, RESUME) {
        return Some(VoiceCommand::ResumeWorkout);
    }
    if let Some((_, kind)) = EXERCISES.iter().find(|(k, _)| t.contains(k)) {
        return Some(VoiceCommand::ChangeExercise(*kind));
    }
    if mentions(&t, REPEAT) {
        return Some(VoiceCommand::RepeatInstruction);
    }

    None
}
