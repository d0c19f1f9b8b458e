//! Input Sanitization
//!
//! Guards between raw estimator output and the classifier.
//!
//! Functions:
//! - Landmark usability checks (presence, finiteness, visibility)
//! - Energy clamping

use crate::types::{JointPoint, PoseFrame, PoseLandmark, MAX_ENERGY, MIN_ENERGY};

/// True if any value is NaN or infinite
pub fn has_invalid_values(arr: &[f64]) -> bool {
    arr.iter().any(|&x| x.is_nan() || x.is_infinite())
}

/// A landmark is usable when both coordinates are finite and any reported
/// visibility reaches `min_visibility`. Missing visibility counts as visible.
pub fn is_usable(point: &JointPoint, min_visibility: f64) -> bool {
    if has_invalid_values(&[point.x, point.y]) {
        return false;
    }
    match point.visibility {
        Some(v) if v.is_nan() => false,
        Some(v) => v >= min_visibility,
        None => true,
    }
}

/// Fetch a set of landmarks, or report which ones could not be used.
pub fn require_landmarks<const N: usize>(
    frame: &PoseFrame,
    wanted: [PoseLandmark; N],
    min_visibility: f64,
) -> Result<[JointPoint; N], Vec<PoseLandmark>> {
    let mut missing = Vec::new();
    let mut points = [JointPoint::new(0.0, 0.0); N];

    for (slot, landmark) in points.iter_mut().zip(wanted) {
        match frame.get(landmark) {
            Some(point) if is_usable(point, min_visibility) => *slot = *point,
            _ => missing.push(landmark),
        }
    }

    if missing.is_empty() {
        Ok(points)
    } else {
        Err(missing)
    }
}

/// Clamp energy into `[0, 100]`; NaN becomes 0
pub fn clamp_energy(value: f64) -> f64 {
    if value.is_nan() {
        return MIN_ENERGY;
    }
    value.clamp(MIN_ENERGY, MAX_ENERGY)
}
