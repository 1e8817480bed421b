//! Orb math - double precision vectors, rays and rotations.

// Re-export glam for convenience
pub use glam;

/// 3D vector used for positions, directions and RGB colors.
///
/// Double precision throughout; `+=` is the in-place accumulate used for
/// camera translation.
pub use glam::DVec3 as Vec3;

mod ray;
mod rotation;

pub use ray::Ray;
pub use rotation::rotate;

/// Fixed world up axis used to derive camera bases.
pub const WORLD_UP: Vec3 = Vec3::Y;
