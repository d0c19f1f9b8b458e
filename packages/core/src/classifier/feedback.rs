//! Coaching text attached to classifier judgments

use crate::types::{ExerciseKind, PoseLandmark};

/// Feedback and tips for a rest→position transition.
pub fn on_entry(kind: ExerciseKind, correct_form: bool) -> (String, Vec<String>) {
    match (kind, correct_form) {
        (ExerciseKind::Squat, true) => ("Great squat form!".to_string(), Vec::new()),
        (ExerciseKind::Squat, false) => (
            "You can go a bit deeper!".to_string(),
            vec!["Try to lower your hips more".to_string()],
        ),
        (ExerciseKind::Pushup, true) => ("Perfect pushup form!".to_string(), Vec::new()),
        (ExerciseKind::Pushup, false) => (
            "Good, keep your form tight!".to_string(),
            vec!["Keep your back straight".to_string()],
        ),
        (ExerciseKind::JumpingJack, _) => ("Great jumping jack!".to_string(), Vec::new()),
        (ExerciseKind::Plank | ExerciseKind::Lunge, _) => (String::new(), Vec::new()),
    }
}

/// Feedback for a position→rest transition that just counted `rep_count`.
pub fn on_completion(kind: ExerciseKind, rep_count: u32, celebrate_every: Option<u32>) -> String {
    if let Some(every) = celebrate_every {
        if every > 0 && rep_count % every == 0 {
            return format!("{rep_count} reps! You're crushing it! 🔥");
        }
    }

    match kind {
        ExerciseKind::Squat => format!("Rep {rep_count} completed!"),
        ExerciseKind::Pushup => format!("Pushup {rep_count} done!"),
        ExerciseKind::JumpingJack => format!("Jumping jack {rep_count}!"),
        ExerciseKind::Plank | ExerciseKind::Lunge => format!("Rep {rep_count}"),
    }
}

pub fn unavailable(kind: ExerciseKind) -> String {
    format!("{} tracking is not available yet", capitalize(kind.display_name()))
}

pub fn paused() -> String {
    "Workout paused".to_string()
}

/// "I can't see your knees and feet clearly. ..." with each body part
/// named once, in landmark order.
pub fn unseen(missing: &[PoseLandmark]) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for landmark in missing {
        let part = landmark.body_part();
        if !parts.contains(&part) {
            parts.push(part);
        }
    }

    let listed = match parts.as_slice() {
        [] => "you".to_string(),
        [only] => format!("your {only}"),
        [init @ .., last] => format!("your {} and {last}", init.join(", ")),
    };

    format!("I can't see {listed} clearly. Step back into the frame.")
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
