//! Joint geometry helpers.
//!
//! Everything here works on the 2D projection of [`JointPoint`]; `z` and
//! `visibility` are ignored.

use crate::types::JointPoint;

/// Angle at vertex `b` formed by the rays `b→a` and `b→c`, in degrees
/// within `[0, 180]`.
///
/// Coincident points do not panic: `atan2(0, 0)` is `0`, so a
/// degenerate ray simply contributes a zero heading.
pub fn joint_angle(a: &JointPoint, b: &JointPoint, c: &JointPoint) -> f64 {
    let radians = (c.y - b.y).atan2(c.x - b.x) - (a.y - b.y).atan2(a.x - b.x);
    let mut angle = radians.to_degrees().abs();

    if angle > 180.0 {
        angle = 360.0 - angle;
    }

    angle
}

#[inline]
pub fn horizontal_distance(a: &JointPoint, b: &JointPoint) -> f64 {
    (a.x - b.x).abs()
}

#[inline]
pub fn euclidean_distance_2d(a: &JointPoint, b: &JointPoint) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dx * dx + dy * dy).sqrt()
}

pub fn midpoint(a: &JointPoint, b: &JointPoint) -> JointPoint {
    JointPoint {
        x: (a.x + b.x) / 2.0,
        y: (a.y + b.y) / 2.0,
        z: (a.z + b.z) / 2.0,
        visibility: match (a.visibility, b.visibility) {
            (Some(va), Some(vb)) => Some(va.min(vb)),
            (va, vb) => va.or(vb),
        },
    }
}

/// Mean of several joint angles; `None` for an empty slice.
pub fn average_angle(angles: &[f64]) -> Option<f64> {
    if angles.is_empty() {
        return None;
    }
    Some(angles.iter().sum::<f64>() / angles.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> JointPoint {
        JointPoint::new(x, y)
    }

    #[test]
    fn test_right_angle() {
        let angle = joint_angle(&p(0.0, 1.0), &p(0.0, 0.0), &p(1.0, 0.0));
        assert!((angle - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_straight_line() {
        let angle = joint_angle(&p(0.5, 0.2), &p(0.5, 0.5), &p(0.5, 0.8));
        assert!((angle - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_reflex_is_reflected() {
        // headings of +170 and -170 differ by 340, which reflects to 20
        let (s, c) = 170f64.to_radians().sin_cos();
        let angle = joint_angle(&p(c, s), &p(0.0, 0.0), &p(c, -s));
        assert!((angle - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_coincident_points_do_not_panic() {
        let angle = joint_angle(&p(0.3, 0.3), &p(0.3, 0.3), &p(0.3, 0.3));
        assert_eq!(angle, 0.0);
    }

    #[test]
    fn test_angle_ignores_z() {
        let mut a = p(0.0, 1.0);
        a.z = 42.0;
        let angle = joint_angle(&a, &p(0.0, 0.0), &p(1.0, 0.0));
        assert!((angle - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_average_angle() {
        assert_eq!(average_angle(&[]), None);
        assert_eq!(average_angle(&[100.0, 120.0]), Some(110.0));
    }

    #[test]
    fn test_midpoint_keeps_lowest_visibility() {
        let m = midpoint(&p(0.0, 0.0).with_visibility(0.9), &p(1.0, 1.0).with_visibility(0.4));
        assert_eq!(m.x, 0.5);
        assert_eq!(m.visibility, Some(0.4));
    }
}
