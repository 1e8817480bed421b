use crate::Vec3;

/// Rotate `direction` about the unit `axis` by `angle` radians.
///
/// Rodrigues' rotation formula:
/// `d cos(a) + (k x d) sin(a) + k (k . d)(1 - cos(a))`
///
/// The axis must already be normalized. A positive angle turns
/// counter-clockwise when looking down the axis towards the origin.
pub fn rotate(direction: Vec3, axis: Vec3, angle: f64) -> Vec3 {
    let (sin, cos) = angle.sin_cos();
    direction * cos + axis.cross(direction) * sin + axis * axis.dot(direction) * (1.0 - cos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn approx_eq(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-9
    }

    #[test]
    fn test_half_turn_about_up() {
        let turned = rotate(Vec3::new(0.0, 0.0, -1.0), Vec3::new(0.0, 1.0, 0.0), PI);
        assert!(approx_eq(turned, Vec3::new(0.0, 0.0, 1.0)), "got {:?}", turned);
    }

    #[test]
    fn test_quarter_turn_is_counter_clockwise() {
        // Looking down +Y, rotating -Z by +90 degrees lands on -X
        let turned = rotate(Vec3::NEG_Z, Vec3::Y, FRAC_PI_2);
        assert!(approx_eq(turned, Vec3::NEG_X), "got {:?}", turned);
    }

    #[test]
    fn test_rotation_preserves_length() {
        let d = Vec3::new(0.3, -0.4, 0.866).normalize();
        let axis = Vec3::new(1.0, 1.0, 0.0).normalize();
        for step in 0..16 {
            let r = rotate(d, axis, step as f64 * 0.41);
            assert!((r.length() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_axis_is_fixed_point() {
        let axis = Vec3::new(0.0, 0.0, 1.0);
        assert!(approx_eq(rotate(axis, axis, 1.234), axis));
    }

    #[test]
    fn test_zero_angle_is_identity() {
        let d = Vec3::new(0.2, 0.5, -0.7);
        assert!(approx_eq(rotate(d, Vec3::Y, 0.0), d));
    }
}
