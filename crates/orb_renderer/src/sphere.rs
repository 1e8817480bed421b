//! Ray-sphere intersection.

use crate::{Ray, Sphere};

/// Distance along `ray` to the nearest point of `sphere` at or in front of
/// the origin, or `None` when the ray misses.
///
/// Solves `a t^2 + b t + c = 0` for the ray substituted into the sphere
/// equation. The smaller root wins when it is non-negative; otherwise the
/// larger one is used, which is the exit point for an origin inside the
/// sphere.
pub fn intersect(ray: &Ray, sphere: &Sphere) -> Option<f64> {
    let oc = ray.origin - sphere.center;
    let a = ray.direction.dot(ray.direction);
    let b = 2.0 * oc.dot(ray.direction);
    let c = oc.dot(oc) - sphere.radius() * sphere.radius();

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrtd = discriminant.sqrt();
    let near = (-b - sqrtd) / (2.0 * a);
    if near >= 0.0 {
        return Some(near);
    }
    let far = (-b + sqrtd) / (2.0 * a);
    if far >= 0.0 {
        return Some(far);
    }

    // Sphere is entirely behind the origin
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vec3;

    fn sphere(center: Vec3, radius: f64) -> Sphere {
        Sphere::new(center, radius, Vec3::new(255.0, 0.0, 0.0)).unwrap()
    }

    #[test]
    fn test_sphere_hit() {
        let s = sphere(Vec3::new(0.0, 0.0, -1.0), 0.5);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        let t = intersect(&ray, &s).unwrap();
        assert!((t - 0.5).abs() < 1e-12); // Should hit at t=0.5
    }

    #[test]
    fn test_sphere_miss() {
        let s = sphere(Vec3::new(0.0, 0.0, -1.0), 0.5);

        // Ray pointing away from sphere
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0));
        assert!(intersect(&ray, &s).is_none());
    }

    #[test]
    fn test_head_on_hit_distance() {
        let centers = [
            Vec3::new(0.0, 0.0, -5.0),
            Vec3::new(3.0, -2.0, 7.0),
            Vec3::new(-10.0, 4.0, 0.5),
        ];
        let origin = Vec3::new(0.5, 0.25, 0.0);
        for center in centers {
            let s = sphere(center, 1.5);
            let ray = Ray::new(origin, (center - origin).normalize());
            let t = intersect(&ray, &s).unwrap();
            let expected = (center - origin).length() - 1.5;
            assert!((t - expected).abs() < 1e-9, "t={} expected={}", t, expected);
        }
    }

    #[test]
    fn test_hit_lies_on_surface() {
        let s = sphere(Vec3::new(0.3, -0.2, -4.0), 1.25);
        for i in 0..50 {
            let angle = i as f64 * 0.013;
            let direction = Vec3::new(angle.sin(), -angle.cos() * 0.1, -1.0).normalize();
            let ray = Ray::new(Vec3::ZERO, direction);
            if let Some(t) = intersect(&ray, &s) {
                assert!(t >= 0.0);
                let distance = (ray.at(t) - s.center).length();
                assert!((distance - s.radius()).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_origin_inside_uses_far_root() {
        let s = sphere(Vec3::ZERO, 2.0);
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let t = intersect(&ray, &s).unwrap();
        assert!((t - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_sphere_behind_origin() {
        let s = sphere(Vec3::new(0.0, 0.0, 5.0), 1.0);
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert!(intersect(&ray, &s).is_none());
    }

    #[test]
    fn test_unnormalized_direction() {
        // a is computed, so t scales with the direction length
        let s = sphere(Vec3::new(0.0, 0.0, -5.0), 1.0);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -2.0));
        let t = intersect(&ray, &s).unwrap();
        assert!((t - 2.0).abs() < 1e-12);
    }
}
