//! JSON scene descriptions.
//!
//! ```json
//! {
//!   "background": [0, 0, 0],
//!   "camera": { "position": [0, 0, 0], "forward": [0, 0, -1], "fov_degrees": 90 },
//!   "spheres": [
//!     { "center": [0, 0, -5], "radius": 1, "color": [255, 0, 0] }
//!   ]
//! }
//! ```
//!
//! `background` and `camera` are optional.

use std::path::Path;

use orb_math::Vec3;
use serde::Deserialize;

use crate::scene::{Scene, SceneResult, Sphere};

/// Initial camera placement read from a scene file.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub position: Vec3,
    pub forward: Vec3,
    pub fov_degrees: f64,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            forward: Vec3::NEG_Z,
            fov_degrees: 90.0,
        }
    }
}

/// A loaded scene plus the camera it asks for.
#[derive(Clone, Debug)]
pub struct SceneDescription {
    pub scene: Scene,
    pub camera: CameraSettings,
}

#[derive(Deserialize)]
struct SphereEntry {
    center: Vec3,
    radius: f64,
    color: Vec3,
}

#[derive(Deserialize)]
struct SceneEntry {
    #[serde(default)]
    background: Vec3,
    #[serde(default)]
    camera: CameraSettings,
    #[serde(default)]
    spheres: Vec<SphereEntry>,
}

/// Load a scene description from a JSON file.
pub fn load_scene<P: AsRef<Path>>(path: P) -> SceneResult<SceneDescription> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let description = load_scene_from_str(&text)?;
    log::info!(
        "Loaded {} spheres from {}",
        description.scene.len(),
        path.display()
    );
    Ok(description)
}

/// Parse a scene description from JSON text.
pub fn load_scene_from_str(text: &str) -> SceneResult<SceneDescription> {
    let entry: SceneEntry = serde_json::from_str(text)?;

    let mut scene = Scene::new(entry.background);
    for sphere in entry.spheres {
        scene.add(Sphere::new(sphere.center, sphere.radius, sphere.color)?);
    }

    Ok(SceneDescription {
        scene,
        camera: entry.camera,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneError;

    #[test]
    fn test_parse_full_description() {
        let text = r#"{
            "background": [10, 20, 30],
            "camera": { "position": [0, 1, 2], "forward": [0, 0, -1], "fov_degrees": 60 },
            "spheres": [
                { "center": [0, 0, -5], "radius": 1, "color": [255, 0, 0] },
                { "center": [3, 0, -6], "radius": 0.5, "color": [0, 255, 0] }
            ]
        }"#;
        let description = load_scene_from_str(text).unwrap();

        assert_eq!(description.scene.background, Vec3::new(10.0, 20.0, 30.0));
        assert_eq!(description.scene.len(), 2);
        assert_eq!(description.scene.spheres()[1].radius(), 0.5);
        assert_eq!(description.camera.position, Vec3::new(0.0, 1.0, 2.0));
        assert_eq!(description.camera.fov_degrees, 60.0);
    }

    #[test]
    fn test_defaults() {
        let description = load_scene_from_str(r#"{ "spheres": [] }"#).unwrap();
        assert!(description.scene.is_empty());
        assert_eq!(description.scene.background, Vec3::ZERO);
        assert_eq!(description.camera, CameraSettings::default());

        // Partial camera keeps the remaining defaults
        let description =
            load_scene_from_str(r#"{ "camera": { "fov_degrees": 45 } }"#).unwrap();
        assert_eq!(description.camera.forward, Vec3::NEG_Z);
        assert_eq!(description.camera.fov_degrees, 45.0);
    }

    #[test]
    fn test_invalid_sphere() {
        let text = r#"{ "spheres": [ { "center": [0, 0, 0], "radius": -2, "color": [1, 1, 1] } ] }"#;
        assert!(matches!(
            load_scene_from_str(text),
            Err(SceneError::InvalidRadius(_))
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            load_scene_from_str("{ spheres: "),
            Err(SceneError::Parse(_))
        ));
    }
}
