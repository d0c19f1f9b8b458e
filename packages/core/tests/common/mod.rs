#![allow(dead_code)]

use chrono::{DateTime, Utc};
use fitgoose_core::{JointPoint, PoseFrame, PoseLandmark, POSE_LANDMARK_COUNT};

pub fn t0() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-03-01T08:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

fn blank_frame() -> PoseFrame {
    PoseFrame::from_points(vec![JointPoint::new(0.5, 0.5); POSE_LANDMARK_COUNT]).unwrap()
}

/// Side-on skeleton with hips and knees shoulder-width apart; every
/// hip-knee-ankle and shoulder-elbow-wrist angle equals `angle` degrees.
pub fn frame_with_angle(angle: f64) -> PoseFrame {
    let mut frame = blank_frame();
    let heading = (angle - 90.0).to_radians();
    let (dx, dy) = (0.2 * heading.cos(), 0.2 * heading.sin());

    for (upper, mid, lower, x) in [
        (PoseLandmark::LeftHip, PoseLandmark::LeftKnee, PoseLandmark::LeftAnkle, 0.4),
        (PoseLandmark::RightHip, PoseLandmark::RightKnee, PoseLandmark::RightAnkle, 0.6),
        (PoseLandmark::LeftShoulder, PoseLandmark::LeftElbow, PoseLandmark::LeftWrist, 0.4),
        (PoseLandmark::RightShoulder, PoseLandmark::RightElbow, PoseLandmark::RightWrist, 0.6),
    ] {
        frame.set(upper, Some(JointPoint::new(x, 0.3).with_visibility(0.99)));
        frame.set(mid, Some(JointPoint::new(x, 0.5).with_visibility(0.99)));
        frame.set(lower, Some(JointPoint::new(x + dx, 0.5 + dy).with_visibility(0.99)));
    }
    frame
}

pub fn jumping_jack_frame(arms_up: bool, ankle_spread: f64) -> PoseFrame {
    let mut frame = blank_frame();
    let wrist_y = if arms_up { 0.05 } else { 0.6 };
    frame.set(PoseLandmark::Nose, Some(JointPoint::new(0.5, 0.15)));
    frame.set(PoseLandmark::LeftWrist, Some(JointPoint::new(0.3, wrist_y)));
    frame.set(PoseLandmark::RightWrist, Some(JointPoint::new(0.7, wrist_y)));
    frame.set(
        PoseLandmark::LeftAnkle,
        Some(JointPoint::new(0.5 - ankle_spread / 2.0, 0.95)),
    );
    frame.set(
        PoseLandmark::RightAnkle,
        Some(JointPoint::new(0.5 + ankle_spread / 2.0, 0.95)),
    );
    frame
}
