//! Per-exercise position rules.
//!
//! Thresholds are immutable data; the running counters live in
//! [`super::ClassifierState`].

use crate::geometry::{horizontal_distance, joint_angle};
use crate::sanitize::require_landmarks;
use crate::types::{ExerciseKind, PoseFrame, PoseLandmark};

use PoseLandmark::*;

#[derive(Debug, Clone, PartialEq)]
pub enum PositionRule {
    /// Average of a left/right joint angle pair. The athlete is "in
    /// position" once the average drops below `enter_below`; form is
    /// correct strictly inside `(form_min, form_max)`.
    JointAngle {
        left: [PoseLandmark; 3],
        right: [PoseLandmark; 3],
        enter_below: f64,
        form_min: f64,
        form_max: f64,
    },
    /// Both wrists above the nose and the ankles spread wider than
    /// `min_ankle_spread` (frame-width units). Form equals position.
    ArmsUpFeetApart { min_ankle_spread: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionReading {
    pub in_position: bool,
    pub correct_form: bool,
    /// Average joint angle in degrees, or the ankle spread for jacks
    pub metric: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseProfile {
    pub kind: ExerciseKind,
    pub rule: PositionRule,
    /// Fixed per exercise; not derived from landmark visibility
    pub confidence: f64,
    /// Completion text switches to a celebration on every n-th rep
    pub celebrate_every: Option<u32>,
}

pub static SQUAT: ExerciseProfile = ExerciseProfile {
    kind: ExerciseKind::Squat,
    rule: PositionRule::JointAngle {
        left: [LeftHip, LeftKnee, LeftAnkle],
        right: [RightHip, RightKnee, RightAnkle],
        enter_below: 120.0,
        form_min: 70.0,
        form_max: 120.0,
    },
    confidence: 0.8,
    celebrate_every: Some(5),
};

pub static PUSHUP: ExerciseProfile = ExerciseProfile {
    kind: ExerciseKind::Pushup,
    rule: PositionRule::JointAngle {
        left: [LeftShoulder, LeftElbow, LeftWrist],
        right: [RightShoulder, RightElbow, RightWrist],
        enter_below: 120.0,
        form_min: 60.0,
        form_max: 120.0,
    },
    confidence: 0.7,
    celebrate_every: None,
};

pub static JUMPING_JACK: ExerciseProfile = ExerciseProfile {
    kind: ExerciseKind::JumpingJack,
    rule: PositionRule::ArmsUpFeetApart {
        min_ankle_spread: 0.3,
    },
    confidence: 0.6,
    celebrate_every: None,
};

/// Rule lookup. New exercises must be handled here before they can be
/// classified.
pub fn profile(kind: ExerciseKind) -> Option<&'static ExerciseProfile> {
    match kind {
        ExerciseKind::Squat => Some(&SQUAT),
        ExerciseKind::Pushup => Some(&PUSHUP),
        ExerciseKind::JumpingJack => Some(&JUMPING_JACK),
        ExerciseKind::Plank | ExerciseKind::Lunge => None,
    }
}

impl PositionRule {
    /// Evaluate one frame. `Err` lists the landmarks that were missing or
    /// not visible enough to trust.
    pub fn read(
        &self,
        frame: &PoseFrame,
        min_visibility: f64,
    ) -> Result<PositionReading, Vec<PoseLandmark>> {
        match self {
            PositionRule::JointAngle {
                left,
                right,
                enter_below,
                form_min,
                form_max,
            } => {
                let [la, lb, lc, ra, rb, rc] = require_landmarks(
                    frame,
                    [left[0], left[1], left[2], right[0], right[1], right[2]],
                    min_visibility,
                )?;

                let left_angle = joint_angle(&la, &lb, &lc);
                let right_angle = joint_angle(&ra, &rb, &rc);
                let avg = (left_angle + right_angle) / 2.0;

                Ok(PositionReading {
                    in_position: avg < *enter_below,
                    correct_form: avg > *form_min && avg < *form_max,
                    metric: avg,
                })
            }
            PositionRule::ArmsUpFeetApart { min_ankle_spread } => {
                let [left_wrist, right_wrist, left_ankle, right_ankle, nose] = require_landmarks(
                    frame,
                    [LeftWrist, RightWrist, LeftAnkle, RightAnkle, Nose],
                    min_visibility,
                )?;

                // y grows downwards in image coordinates
                let arms_raised = left_wrist.y < nose.y && right_wrist.y < nose.y;
                let spread = horizontal_distance(&left_ankle, &right_ankle);
                let feet_apart = spread > *min_ankle_spread;
                let in_position = arms_raised && feet_apart;

                Ok(PositionReading {
                    in_position,
                    correct_form: in_position,
                    metric: spread,
                })
            }
        }
    }
}
