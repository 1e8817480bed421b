//! Nearest-hit search and Lambertian headlamp shading.

use crate::sphere::intersect;
use crate::{Color, Ray, Scene, Vec3};

/// Record of the closest ray-sphere intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Index of the sphere in the scene
    pub index: usize,
    /// Parameter t where the intersection occurs
    pub t: f64,
}

/// Find the closest sphere along the ray.
///
/// Spheres are tested in index order and only a strictly closer hit
/// replaces the current one, so the earliest sphere wins exact ties.
pub fn nearest_hit(scene: &Scene, ray: &Ray) -> Option<Hit> {
    let mut closest: Option<Hit> = None;

    for (index, sphere) in scene.spheres().iter().enumerate() {
        if let Some(t) = intersect(ray, sphere) {
            if closest.map_or(true, |hit| t < hit.t) {
                closest = Some(Hit { index, t });
            }
        }
    }

    closest
}

/// Compute the color seen along a ray.
///
/// Flat diffuse shading from a point light at `light_position`:
/// `color * max(0, normal . light_dir)`. No shadow test, no ambient term,
/// and no upper clamp. Misses return the scene background.
pub fn color_pixel(scene: &Scene, ray: &Ray, light_position: Vec3) -> Color {
    let Some(hit) = nearest_hit(scene, ray) else {
        return scene.background;
    };
    let sphere = &scene.spheres()[hit.index];

    let hit_point = ray.at(hit.t);
    let normal = (hit_point - sphere.center) / sphere.radius();
    // Light sitting on the surface gives no usable direction
    let Some(light_dir) = (light_position - hit_point).try_normalize() else {
        return Color::ZERO;
    };

    let intensity = normal.dot(light_dir).max(0.0);
    sphere.color * intensity
}
