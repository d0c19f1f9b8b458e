//! Phrase library for spoken coaching

use serde::Serialize;

use crate::types::ExerciseKind;

pub const ENCOURAGEMENT: &[&str] = &[
    "You're doing great!",
    "Keep it up!",
    "Nice form!",
    "Perfect!",
    "You've got this!",
    "Looking strong!",
    "Excellent work!",
    "Stay focused!",
];

pub const CORRECTION: &[&str] = &[
    "Try to go a little lower",
    "Keep your back straight",
    "Slow and controlled",
    "Focus on your form",
    "Remember to breathe",
    "Keep your core tight",
    "Full range of motion",
];

pub const WORKOUT_START: &[&str] = &[
    "Let's get this workout started! You've got this!",
    "Time to sweat! I'm here to guide you every step!",
    "Ready to feel amazing? Let's begin!",
    "Your fitness journey continues now! Let's go!",
];

pub const WORKOUT_PAUSED: &str = "Workout paused. Take your time, I'll be here when you're ready!";
pub const WORKOUT_RESUMED: &str = "Welcome back! Let's pick up where we left off!";

pub fn milestone(rep_count: u32) -> String {
    format!("{rep_count} reps! You're absolutely crushing it! 🔥")
}

pub fn workout_complete(total_reps: u32, duration_seconds: u64) -> String {
    let minutes = duration_seconds / 60;
    format!("Workout complete! You did {total_reps} reps in {minutes} minutes. Outstanding work!")
}

/// Per-exercise spoken lines
pub struct ExercisePhrases {
    pub start: &'static str,
    pub good: &'static [&'static str],
    pub correction: &'static [&'static str],
}

pub fn exercise_phrases(kind: ExerciseKind) -> Option<&'static ExercisePhrases> {
    static SQUAT: ExercisePhrases = ExercisePhrases {
        start: "Let's do some squats! Stand with feet shoulder-width apart",
        good: &["Perfect squat!", "Great depth!", "Nice form!"],
        correction: &["Go a bit lower", "Keep your chest up", "Don't let your knees cave in"],
    };
    static PUSHUP: ExercisePhrases = ExercisePhrases {
        start: "Time for push-ups! Keep your body straight",
        good: &["Excellent push-up!", "Perfect form!", "Strong!"],
        correction: &["Keep your back straight", "Go all the way down", "Control the movement"],
    };
    static JUMPING_JACK: ExercisePhrases = ExercisePhrases {
        start: "Let's do jumping jacks! Jump and spread your arms and legs",
        good: &["Great jumping jack!", "Perfect coordination!", "Keep the rhythm!"],
        correction: &["Jump higher", "Spread your arms wider", "Land softly"],
    };

    match kind {
        ExerciseKind::Squat => Some(&SQUAT),
        ExerciseKind::Pushup => Some(&PUSHUP),
        ExerciseKind::JumpingJack => Some(&JUMPING_JACK),
        ExerciseKind::Plank | ExerciseKind::Lunge => None,
    }
}

/// Spoken line introducing an exercise
pub fn exercise_intro(kind: ExerciseKind) -> String {
    match exercise_phrases(kind) {
        Some(phrases) => phrases.start.to_string(),
        None => format!("Let's do some {}s!", kind.display_name()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExerciseInstructions {
    pub title: &'static str,
    pub steps: &'static [&'static str],
}

/// Step-by-step instructions shown next to the camera view
pub fn exercise_instructions(kind: ExerciseKind) -> ExerciseInstructions {
    match kind {
        ExerciseKind::Squat => ExerciseInstructions {
            title: "Squat Instructions",
            steps: &[
                "Stand with feet shoulder-width apart",
                "Keep your chest up and core engaged",
                "Lower your body by bending your knees",
                "Go down until thighs are parallel to floor",
                "Push through your heels to return to start",
            ],
        },
        ExerciseKind::Pushup => ExerciseInstructions {
            title: "Push-up Instructions",
            steps: &[
                "Start in plank position with hands shoulder-width apart",
                "Keep your body in a straight line",
                "Lower your chest towards the ground",
                "Push back up to starting position",
                "Keep your core tight throughout",
            ],
        },
        ExerciseKind::JumpingJack => ExerciseInstructions {
            title: "Jumping Jack Instructions",
            steps: &[
                "Start with feet together, arms at sides",
                "Jump while spreading feet shoulder-width apart",
                "Simultaneously raise arms overhead",
                "Jump back to starting position",
                "Maintain a steady rhythm",
            ],
        },
        ExerciseKind::Plank | ExerciseKind::Lunge => ExerciseInstructions {
            title: "Exercise Instructions",
            steps: &["Follow the movement pattern"],
        },
    }
}
