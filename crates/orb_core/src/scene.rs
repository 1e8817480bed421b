//! Scene types for Orb.
//!
//! A scene is an ordered list of analytic spheres and a background color.
//! Sphere order only matters as an intersection tie-break: when two spheres
//! are hit at exactly the same distance the earlier one wins.

use orb_math::Vec3;
use thiserror::Error;

/// Errors raised while building or editing a scene.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Sphere radius must be positive and finite, got {0}")]
    InvalidRadius(f64),

    #[error("Sphere index {index} out of range (scene has {len} spheres)")]
    SphereIndex { index: usize, len: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid scene description: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result type for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;

/// An analytic sphere with a flat RGB color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere {
    /// Center in world space
    pub center: Vec3,

    /// Radius, always positive
    radius: f64,

    /// Color in the nominal [0, 255] range (not clamped)
    pub color: Vec3,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vec3, radius: f64, color: Vec3) -> SceneResult<Self> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(SceneError::InvalidRadius(radius));
        }

        Ok(Self {
            center,
            radius,
            color,
        })
    }

    /// Get the sphere radius.
    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }
}

/// A complete scene: spheres plus the color seen when nothing is hit.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    spheres: Vec<Sphere>,

    /// Background color (RGB, nominal [0, 255])
    pub background: Vec3,
}

impl Scene {
    /// Create an empty scene with the given background.
    pub fn new(background: Vec3) -> Self {
        Self {
            spheres: Vec::new(),
            background,
        }
    }

    /// The two-sphere scene used when no scene file is given.
    pub fn demo() -> Self {
        let mut scene = Self::new(Vec3::ZERO);
        scene.spheres.push(Sphere {
            center: Vec3::new(0.0, 0.0, -5.0),
            radius: 1.0,
            color: Vec3::new(255.0, 0.0, 0.0),
        });
        scene.spheres.push(Sphere {
            center: Vec3::new(3.0, 0.0, -6.0),
            radius: 1.0,
            color: Vec3::new(0.0, 255.0, 0.0),
        });
        scene
    }

    /// Add a sphere and return its index.
    pub fn add(&mut self, sphere: Sphere) -> usize {
        self.spheres.push(sphere);
        self.spheres.len() - 1
    }

    /// Builder form of [`Scene::add`].
    pub fn with_sphere(mut self, sphere: Sphere) -> Self {
        self.add(sphere);
        self
    }

    /// Spheres in intersection order.
    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    /// Get a sphere by index.
    pub fn sphere(&self, index: usize) -> Option<&Sphere> {
        self.spheres.get(index)
    }

    /// Translate a sphere's center in place.
    pub fn move_sphere(&mut self, index: usize, delta: Vec3) -> SceneResult<()> {
        let len = self.spheres.len();
        let sphere = self
            .spheres
            .get_mut(index)
            .ok_or(SceneError::SphereIndex { index, len })?;
        sphere.center += delta;
        Ok(())
    }

    /// Number of spheres.
    pub fn len(&self) -> usize {
        self.spheres.len()
    }

    /// Check if the scene has no spheres.
    pub fn is_empty(&self) -> bool {
        self.spheres.is_empty()
    }
}
