use fitgoose_core::{joint_angle, CoreError, JointPoint, PoseFrame};
use wasm_bindgen::prelude::*;

/// Values per landmark in a flat buffer: x, y, z, visibility
pub const COORD_STRIDE: usize = 4;

/// Decode `[x, y, z, visibility] * n` into a frame.
///
/// A negative visibility marks a joint the estimator dropped. Trailing
/// values that do not fill a whole landmark are ignored.
pub fn frame_from_coords(coords: &[f64]) -> Result<PoseFrame, CoreError> {
    let landmarks = coords
        .chunks_exact(COORD_STRIDE)
        .map(|c| {
            if c[3] < 0.0 {
                None
            } else {
                Some(JointPoint {
                    x: c[0],
                    y: c[1],
                    z: c[2],
                    visibility: Some(c[3]),
                })
            }
        })
        .collect();
    PoseFrame::new(landmarks)
}

/// Angle at `b` in degrees, 0..=180
#[wasm_bindgen(js_name = jointAngle)]
pub fn joint_angle_xy(ax: f64, ay: f64, bx: f64, by: f64, cx: f64, cy: f64) -> f64 {
    joint_angle(
        &JointPoint::new(ax, ay),
        &JointPoint::new(bx, by),
        &JointPoint::new(cx, cy),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitgoose_core::{PoseLandmark, POSE_LANDMARK_COUNT};

    #[test]
    fn test_right_angle() {
        let angle = joint_angle_xy(0.0, 1.0, 0.0, 0.0, 1.0, 0.0);
        assert!((angle - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_frame_from_coords() {
        let mut coords = vec![0.5; POSE_LANDMARK_COUNT * COORD_STRIDE];
        coords[PoseLandmark::Nose.index() * COORD_STRIDE + 3] = -1.0;
        coords.push(0.1);

        let frame = frame_from_coords(&coords).unwrap();
        assert_eq!(frame.len(), POSE_LANDMARK_COUNT);
        assert!(frame.get(PoseLandmark::Nose).is_none());
        assert_eq!(
            frame.get(PoseLandmark::LeftKnee).unwrap().visibility,
            Some(0.5)
        );
    }

    #[test]
    fn test_short_buffer_rejected() {
        let coords = vec![0.5; 10 * COORD_STRIDE];
        assert_eq!(
            frame_from_coords(&coords),
            Err(CoreError::FrameShape {
                expected: POSE_LANDMARK_COUNT,
                actual: 10,
            })
        );
    }
}
