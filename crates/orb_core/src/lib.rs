//! Orb Core - scene model and image files.
//!
//! This crate provides:
//!
//! - **Scene types**: `Sphere`, `Scene`
//! - **Scene files**: JSON scene descriptions with an optional camera
//! - **Image files**: the plain-text `P3` pixel format and PNG snapshots
//!
//! # Example
//!
//! ```ignore
//! use orb_core::{load_scene, PpmImage};
//!
//! let description = load_scene("spheres.json")?;
//! println!("Loaded {} spheres", description.scene.len());
//!
//! let image = PpmImage::load("result.ppm")?;
//! println!("{}x{}", image.width(), image.height());
//! ```

pub mod pack;
pub mod ppm;
pub mod scene;
pub mod scene_file;

// Re-export commonly used types
pub use pack::{pack_channel, pack_color, PackPolicy};
pub use ppm::{ImageError, ImageResult, PpmImage};
pub use scene::{SceneError, SceneResult, Scene, Sphere};
pub use scene_file::{load_scene, load_scene_from_str, CameraSettings, SceneDescription};
