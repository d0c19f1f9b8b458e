//! Exercise Classifier
//!
//! Two-phase hysteresis detector per exercise. A repetition is counted on
//! the position→rest transition, never on entry.
//!
//! Thresholds come from [`rules::profile`]; this module only owns the
//! per-exercise counters in [`ClassifierState`].

pub mod feedback;
pub mod rules;

use serde::{Deserialize, Serialize};

use crate::config::ClassifierConfig;
use crate::types::{ExerciseKind, PoseFrame};

pub use rules::{profile, ExerciseProfile, PositionReading, PositionRule};

/// Which hysteresis edge a frame crossed, if any
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseTransition {
    Entered,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseJudgment {
    pub exercise_kind: ExerciseKind,
    pub is_correct_form: bool,
    pub rep_count: u32,
    pub confidence: f64,
    pub feedback_text: String,
    #[serde(default)]
    pub tips: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition: Option<PhaseTransition>,
}

impl ExerciseJudgment {
    /// Judgment for a frame that could not be evaluated
    pub(crate) fn neutral(kind: ExerciseKind, rep_count: u32, feedback_text: String) -> Self {
        Self {
            exercise_kind: kind,
            is_correct_form: false,
            rep_count,
            confidence: 0.0,
            feedback_text,
            tips: Vec::new(),
            transition: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifierState {
    pub current_exercise: ExerciseKind,
    pub rep_count: u32,
    pub is_in_position: bool,
}

impl ClassifierState {
    fn fresh(kind: ExerciseKind) -> Self {
        Self {
            current_exercise: kind,
            rep_count: 0,
            is_in_position: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExerciseClassifier {
    config: ClassifierConfig,
    state: ClassifierState,
}

impl Default for ExerciseClassifier {
    fn default() -> Self {
        Self::new(ClassifierConfig::default())
    }
}

impl ExerciseClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            config,
            state: ClassifierState::fresh(ExerciseKind::default()),
        }
    }

    pub fn state(&self) -> ClassifierState {
        self.state
    }

    pub fn exercise_kind(&self) -> ExerciseKind {
        self.state.current_exercise
    }

    /// Switch exercise and discard all counters
    pub fn set_exercise_kind(&mut self, kind: ExerciseKind) {
        tracing::debug!(from = %self.state.current_exercise, to = %kind, "classifier exercise set");
        self.state = ClassifierState::fresh(kind);
    }

    /// Zero the rep count and position flag, keeping the exercise
    pub fn reset_reps(&mut self) {
        self.state = ClassifierState::fresh(self.state.current_exercise);
    }

    pub fn classify_frame(&mut self, frame: &PoseFrame) -> ExerciseJudgment {
        let kind = self.state.current_exercise;

        let Some(profile) = rules::profile(kind) else {
            return ExerciseJudgment::neutral(kind, self.state.rep_count, feedback::unavailable(kind));
        };

        let reading = match profile.rule.read(frame, self.config.min_visibility) {
            Ok(reading) => reading,
            Err(missing) => {
                tracing::trace!(exercise = %kind, ?missing, "frame skipped: landmarks unusable");
                return ExerciseJudgment::neutral(
                    kind,
                    self.state.rep_count,
                    feedback::unseen(&missing),
                );
            }
        };

        let mut feedback_text = String::new();
        let mut tips = Vec::new();
        let mut transition = None;

        match (self.state.is_in_position, reading.in_position) {
            (false, true) => {
                self.state.is_in_position = true;
                (feedback_text, tips) = feedback::on_entry(kind, reading.correct_form);
                transition = Some(PhaseTransition::Entered);
            }
            (true, false) => {
                self.state.is_in_position = false;
                self.state.rep_count += 1;
                feedback_text =
                    feedback::on_completion(kind, self.state.rep_count, profile.celebrate_every);
                transition = Some(PhaseTransition::Completed);
                tracing::debug!(
                    exercise = %kind,
                    rep = self.state.rep_count,
                    metric = reading.metric,
                    "rep completed"
                );
            }
            _ => {}
        }

        ExerciseJudgment {
            exercise_kind: kind,
            is_correct_form: reading.correct_form,
            rep_count: self.state.rep_count,
            confidence: profile.confidence,
            feedback_text,
            tips,
            transition,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{JointPoint, PoseLandmark, POSE_LANDMARK_COUNT};

    /// Side-on skeleton whose hip-knee-ankle and shoulder-elbow-wrist
    /// angles both equal `angle`.
    fn frame_with_angle(angle: f64) -> PoseFrame {
        let mut frame =
            PoseFrame::from_points(vec![JointPoint::new(0.5, 0.5); POSE_LANDMARK_COUNT]).unwrap();
        let heading = (angle - 90.0).to_radians();
        let limb = (0.2 * heading.cos(), 0.2 * heading.sin());

        for (upper, mid, lower, x) in [
            (PoseLandmark::LeftHip, PoseLandmark::LeftKnee, PoseLandmark::LeftAnkle, 0.4),
            (PoseLandmark::RightHip, PoseLandmark::RightKnee, PoseLandmark::RightAnkle, 0.6),
            (PoseLandmark::LeftShoulder, PoseLandmark::LeftElbow, PoseLandmark::LeftWrist, 0.4),
            (PoseLandmark::RightShoulder, PoseLandmark::RightElbow, PoseLandmark::RightWrist, 0.6),
        ] {
            frame.set(upper, Some(JointPoint::new(x, 0.3)));
            frame.set(mid, Some(JointPoint::new(x, 0.5)));
            frame.set(lower, Some(JointPoint::new(x + limb.0, 0.5 + limb.1)));
        }
        frame
    }

    fn jack_frame(arms_up: bool, spread: f64) -> PoseFrame {
        let mut frame =
            PoseFrame::from_points(vec![JointPoint::new(0.5, 0.5); POSE_LANDMARK_COUNT]).unwrap();
        let wrist_y = if arms_up { 0.05 } else { 0.6 };
        frame.set(PoseLandmark::Nose, Some(JointPoint::new(0.5, 0.15)));
        frame.set(PoseLandmark::LeftWrist, Some(JointPoint::new(0.3, wrist_y)));
        frame.set(PoseLandmark::RightWrist, Some(JointPoint::new(0.7, wrist_y)));
        frame.set(PoseLandmark::LeftAnkle, Some(JointPoint::new(0.5 - spread / 2.0, 0.95)));
        frame.set(PoseLandmark::RightAnkle, Some(JointPoint::new(0.5 + spread / 2.0, 0.95)));
        frame
    }

    #[test]
    fn test_squat_rep_counted_on_exit() {
        let mut classifier = ExerciseClassifier::default();

        let standing = classifier.classify_frame(&frame_with_angle(150.0));
        assert_eq!(standing.rep_count, 0);
        assert!(!standing.is_correct_form);
        assert_eq!(standing.transition, None);
        assert!(standing.feedback_text.is_empty());

        let down = classifier.classify_frame(&frame_with_angle(100.0));
        assert_eq!(down.rep_count, 0);
        assert!(down.is_correct_form);
        assert_eq!(down.transition, Some(PhaseTransition::Entered));
        assert_eq!(down.feedback_text, "Great squat form!");

        let up = classifier.classify_frame(&frame_with_angle(150.0));
        assert_eq!(up.rep_count, 1);
        assert_eq!(up.transition, Some(PhaseTransition::Completed));
        assert_eq!(up.feedback_text, "Rep 1 completed!");
        assert_eq!(up.confidence, 0.8);
    }

    #[test]
    fn test_deep_squat_gets_tip() {
        let mut classifier = ExerciseClassifier::default();
        let judgment = classifier.classify_frame(&frame_with_angle(60.0));
        assert!(!judgment.is_correct_form);
        assert_eq!(judgment.tips, vec!["Try to lower your hips more"]);
    }

    #[test]
    fn test_holding_position_is_idempotent() {
        let mut classifier = ExerciseClassifier::default();
        for _ in 0..5 {
            let judgment = classifier.classify_frame(&frame_with_angle(95.0));
            assert_eq!(judgment.rep_count, 0);
        }
        assert!(classifier.state().is_in_position);
    }

    #[test]
    fn test_fifth_squat_celebrates() {
        let mut classifier = ExerciseClassifier::default();
        let mut last = None;
        for _ in 0..5 {
            classifier.classify_frame(&frame_with_angle(100.0));
            last = Some(classifier.classify_frame(&frame_with_angle(160.0)));
        }
        let last = last.unwrap();
        assert_eq!(last.rep_count, 5);
        assert_eq!(last.feedback_text, "5 reps! You're crushing it! 🔥");
    }

    #[test]
    fn test_pushup_thresholds() {
        let mut classifier = ExerciseClassifier::default();
        classifier.set_exercise_kind(ExerciseKind::Pushup);

        let down = classifier.classify_frame(&frame_with_angle(65.0));
        assert!(down.is_correct_form);
        assert_eq!(down.feedback_text, "Perfect pushup form!");
        assert_eq!(down.confidence, 0.7);

        let up = classifier.classify_frame(&frame_with_angle(170.0));
        assert_eq!(up.rep_count, 1);
        assert_eq!(up.feedback_text, "Pushup 1 done!");
    }

    #[test]
    fn test_jumping_jack_requires_arms_and_feet() {
        let mut classifier = ExerciseClassifier::default();
        classifier.set_exercise_kind(ExerciseKind::JumpingJack);

        let arms_only = classifier.classify_frame(&jack_frame(true, 0.1));
        assert!(!arms_only.is_correct_form);

        let open = classifier.classify_frame(&jack_frame(true, 0.4));
        assert!(open.is_correct_form);
        assert_eq!(open.feedback_text, "Great jumping jack!");

        let closed = classifier.classify_frame(&jack_frame(false, 0.1));
        assert_eq!(closed.rep_count, 1);
        assert_eq!(closed.feedback_text, "Jumping jack 1!");
        assert_eq!(closed.confidence, 0.6);
    }

    #[test]
    fn test_shallow_pushup_entry_gets_tip() {
        let mut classifier = ExerciseClassifier::default();
        classifier.set_exercise_kind(ExerciseKind::Pushup);

        let down = classifier.classify_frame(&frame_with_angle(55.0));
        assert!(!down.is_correct_form);
        assert_eq!(down.transition, Some(PhaseTransition::Entered));
        assert_eq!(down.feedback_text, "Good, keep your form tight!");
        assert_eq!(down.tips, vec!["Keep your back straight"]);
        assert!(classifier.state().is_in_position);
    }

    #[test]
    fn test_jumping_jack_needs_visible_nose_and_wrists() {
        let mut classifier = ExerciseClassifier::default();
        classifier.set_exercise_kind(ExerciseKind::JumpingJack);
        classifier.classify_frame(&jack_frame(true, 0.4));
        let before = classifier.state();

        let mut no_nose = jack_frame(false, 0.1);
        no_nose.set(PoseLandmark::Nose, None);
        let judgment = classifier.classify_frame(&no_nose);
        assert_eq!(judgment.confidence, 0.0);
        assert_eq!(judgment.rep_count, 0);
        assert_eq!(judgment.transition, None);
        assert_eq!(
            judgment.feedback_text,
            "I can't see your head clearly. Step back into the frame."
        );
        assert_eq!(classifier.state(), before);

        let mut dim_wrist = jack_frame(false, 0.1);
        dim_wrist.set(
            PoseLandmark::LeftWrist,
            Some(JointPoint::new(0.3, 0.6).with_visibility(0.1)),
        );
        dim_wrist.set(PoseLandmark::Nose, None);
        let judgment = classifier.classify_frame(&dim_wrist);
        assert!(!judgment.is_correct_form);
        assert_eq!(
            judgment.feedback_text,
            "I can't see your hands and head clearly. Step back into the frame."
        );
        assert_eq!(classifier.state(), before);

        let closed = classifier.classify_frame(&jack_frame(false, 0.1));
        assert_eq!(closed.rep_count, 1);
    }

    #[test]
    fn test_missing_joints_leave_state_untouched() {
        let mut classifier = ExerciseClassifier::default();
        classifier.classify_frame(&frame_with_angle(100.0));
        let before = classifier.state();

        let mut frame = frame_with_angle(160.0);
        frame.set(PoseLandmark::LeftKnee, None);
        let judgment = classifier.classify_frame(&frame);

        assert!(!judgment.is_correct_form);
        assert_eq!(judgment.confidence, 0.0);
        assert!(judgment.feedback_text.contains("knees"));
        assert_eq!(classifier.state(), before);
    }

    #[test]
    fn test_low_visibility_counts_as_missing() {
        let mut classifier = ExerciseClassifier::default();
        let mut frame = frame_with_angle(100.0);
        frame.set(
            PoseLandmark::RightAnkle,
            Some(JointPoint::new(0.6, 0.9).with_visibility(0.1)),
        );
        let judgment = classifier.classify_frame(&frame);
        assert_eq!(judgment.transition, None);
        assert!(!classifier.state().is_in_position);
    }

    #[test]
    fn test_unsupported_exercise_is_neutral() {
        let mut classifier = ExerciseClassifier::default();
        classifier.set_exercise_kind(ExerciseKind::Lunge);
        let judgment = classifier.classify_frame(&frame_with_angle(100.0));
        assert!(!judgment.is_correct_form);
        assert_eq!(judgment.rep_count, 0);
        assert_eq!(judgment.feedback_text, "Lunge tracking is not available yet");
    }

    #[test]
    fn test_reset_reps_keeps_exercise() {
        let mut classifier = ExerciseClassifier::default();
        classifier.set_exercise_kind(ExerciseKind::Pushup);
        classifier.classify_frame(&frame_with_angle(90.0));
        classifier.classify_frame(&frame_with_angle(170.0));
        assert_eq!(classifier.state().rep_count, 1);

        classifier.reset_reps();
        assert_eq!(
            classifier.state(),
            ClassifierState {
                current_exercise: ExerciseKind::Pushup,
                rep_count: 0,
                is_in_position: false,
            }
        );
    }

    #[test]
    fn test_judgment_serializes_camel_case() {
        let mut classifier = ExerciseClassifier::default();
        let judgment = classifier.classify_frame(&frame_with_angle(100.0));
        let json = serde_json::to_value(&judgment).unwrap();
        assert_eq!(json["exerciseKind"], "squat");
        assert_eq!(json["isCorrectForm"], true);
        assert_eq!(json["transition"], "entered");
    }
}
