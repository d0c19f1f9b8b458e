//! Common Types and Constants
//!
//! Shared data structures used across the classifier, the session
//! aggregator and the mascot state machine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ==================== Constants ====================

/// Number of landmarks in a full MediaPipe pose skeleton
pub const POSE_LANDMARK_COUNT: usize = 33;

/// Default minimum visibility for a landmark to be trusted
pub const DEFAULT_MIN_VISIBILITY: f64 = 0.5;

/// Lower bound of the energy meter
pub const MIN_ENERGY: f64 = 0.0;

/// Upper bound of the energy meter
pub const MAX_ENERGY: f64 = 100.0;

// ==================== Landmarks ====================

/// A normalized joint coordinate produced by the pose estimator.
///
/// `x` and `y` are in frame units (0..1, origin top-left). `z` and
/// `visibility` are optional on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct JointPoint {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<f64>,
}

impl JointPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            z: 0.0,
            visibility: None,
        }
    }

    pub fn with_visibility(mut self, visibility: f64) -> Self {
        self.visibility = Some(visibility);
        self
    }
}

/// MediaPipe pose landmark indices
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoseLandmark {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl PoseLandmark {
    pub fn index(self) -> usize {
        self as usize
    }

    /// Body-part wording used in "can't see your ..." feedback
    pub fn body_part(self) -> &'static str {
        match self {
            Self::Nose
            | Self::LeftEyeInner
            | Self::LeftEye
            | Self::LeftEyeOuter
            | Self::RightEyeInner
            | Self::RightEye
            | Self::RightEyeOuter
            | Self::LeftEar
            | Self::RightEar
            | Self::MouthLeft
            | Self::MouthRight => "head",
            Self::LeftShoulder | Self::RightShoulder => "shoulders",
            Self::LeftElbow | Self::RightElbow => "elbows",
            Self::LeftWrist
            | Self::RightWrist
            | Self::LeftPinky
            | Self::RightPinky
            | Self::LeftIndex
            | Self::RightIndex
            | Self::LeftThumb
            | Self::RightThumb => "hands",
            Self::LeftHip | Self::RightHip => "hips",
            Self::LeftKnee | Self::RightKnee => "knees",
            Self::LeftAnkle
            | Self::RightAnkle
            | Self::LeftHeel
            | Self::RightHeel
            | Self::LeftFootIndex
            | Self::RightFootIndex => "feet",
        }
    }
}

/// One camera frame worth of landmarks, indexed by [`PoseLandmark`].
///
/// Entries may be `None` when the estimator dropped a joint. The frame
/// itself is only constructible with a full skeleton's worth of slots.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PoseFrame {
    landmarks: Vec<Option<JointPoint>>,
}

impl PoseFrame {
    pub fn new(landmarks: Vec<Option<JointPoint>>) -> Result<Self, CoreError> {
        if landmarks.len() < POSE_LANDMARK_COUNT {
            return Err(CoreError::FrameShape {
                expected: POSE_LANDMARK_COUNT,
                actual: landmarks.len(),
            });
        }
        Ok(Self { landmarks })
    }

    /// Convenience for estimators that always report every joint
    pub fn from_points(points: Vec<JointPoint>) -> Result<Self, CoreError> {
        Self::new(points.into_iter().map(Some).collect())
    }

    pub fn get(&self, landmark: PoseLandmark) -> Option<&JointPoint> {
        self.landmarks.get(landmark.index()).and_then(Option::as_ref)
    }

    pub fn set(&mut self, landmark: PoseLandmark, point: Option<JointPoint>) {
        self.landmarks[landmark.index()] = point;
    }

    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }
}

impl<'de> Deserialize<'de> for PoseFrame {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let landmarks = Vec::<Option<JointPoint>>::deserialize(deserializer)?;
        PoseFrame::new(landmarks).map_err(serde::de::Error::custom)
    }
}

// ==================== Exercises ====================

/// Exercises known to the type surface.
///
/// `Plank` and `Lunge` have no classifier rule yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseKind {
    Squat,
    Pushup,
    JumpingJack,
    Plank,
    Lunge,
}

impl ExerciseKind {
    pub const ALL: [ExerciseKind; 5] = [
        ExerciseKind::Squat,
        ExerciseKind::Pushup,
        ExerciseKind::JumpingJack,
        ExerciseKind::Plank,
        ExerciseKind::Lunge,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ExerciseKind::Squat => "squat",
            ExerciseKind::Pushup => "pushup",
            ExerciseKind::JumpingJack => "jumping_jack",
            ExerciseKind::Plank => "plank",
            ExerciseKind::Lunge => "lunge",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ExerciseKind::Squat => "squat",
            ExerciseKind::Pushup => "push-up",
            ExerciseKind::JumpingJack => "jumping jack",
            ExerciseKind::Plank => "plank",
            ExerciseKind::Lunge => "lunge",
        }
    }

    /// Whether a classifier rule exists for this exercise
    pub fn is_supported(self) -> bool {
        matches!(
            self,
            ExerciseKind::Squat | ExerciseKind::Pushup | ExerciseKind::JumpingJack
        )
    }
}

impl Default for ExerciseKind {
    fn default() -> Self {
        ExerciseKind::Squat
    }
}

impl fmt::Display for ExerciseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExerciseKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(|c: char| c == '-' || c == ' ', "_");
        match normalized.as_str() {
            "squat" | "squats" => Ok(ExerciseKind::Squat),
            "pushup" | "pushups" | "push_up" | "push_ups" => Ok(ExerciseKind::Pushup),
            "jumping_jack" | "jumping_jacks" | "jumpingjack" => Ok(ExerciseKind::JumpingJack),
            "plank" => Ok(ExerciseKind::Plank),
            "lunge" | "lunges" => Ok(ExerciseKind::Lunge),
            _ => Err(CoreError::UnknownExercise(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_requires_full_skeleton() {
        let err = PoseFrame::new(vec![None; 10]).unwrap_err();
        assert!(matches!(
            err,
            CoreError::FrameShape {
                expected: POSE_LANDMARK_COUNT,
                actual: 10
            }
        ));
        assert!(PoseFrame::new(vec![None; POSE_LANDMARK_COUNT]).is_ok());
    }

    #[test]
    fn test_frame_deserialize_with_missing_joints() {
        let mut raw = vec![serde_json::json!({ "x": 0.5, "y": 0.5 }); POSE_LANDMARK_COUNT];
        raw[PoseLandmark::LeftKnee.index()] = serde_json::Value::Null;
        let frame: PoseFrame = serde_json::from_value(serde_json::Value::Array(raw)).unwrap();
        assert!(frame.get(PoseLandmark::LeftKnee).is_none());
        assert_eq!(frame.get(PoseLandmark::Nose).unwrap().z, 0.0);
    }

    #[test]
    fn test_frame_deserialize_rejects_short_array() {
        let raw = serde_json::json!([{ "x": 0.1, "y": 0.2 }]);
        assert!(serde_json::from_value::<PoseFrame>(raw).is_err());
    }

    #[test]
    fn test_exercise_kind_parse() {
        assert_eq!("Push-Up".parse::<ExerciseKind>().unwrap(), ExerciseKind::Pushup);
        assert_eq!(
            "jumping jacks".parse::<ExerciseKind>().unwrap(),
            ExerciseKind::JumpingJack
        );
        assert!("burpee".parse::<ExerciseKind>().is_err());
    }

    #[test]
    fn test_exercise_kind_serde_names() {
        let json = serde_json::to_string(&ExerciseKind::JumpingJack).unwrap();
        assert_eq!(json, "\"jumping_jack\"");
        assert!(!ExerciseKind::Plank.is_supported());
    }
}
