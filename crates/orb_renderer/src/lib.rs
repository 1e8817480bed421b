//! Orb Renderer - CPU ray casting.
//!
//! One ray per pixel against a list of analytic spheres, shaded with a
//! Lambertian headlamp. Images are split into row bands that render in
//! parallel using rayon.

mod bands;
mod camera;
mod error;
mod framebuffer;
mod renderer;
mod shading;
mod sphere;

pub use bands::{bands, worker_count, Band};
pub use camera::{derive_basis, pixel_to_ray, Camera, Viewport};
pub use error::{RenderError, RenderResult};
pub use framebuffer::Framebuffer;
pub use renderer::{render, render_image, FrameStats, RenderConfig};
pub use shading::{color_pixel, nearest_hit, Hit};
pub use sphere::intersect;

/// Re-export the scene and math types the renderer works with
pub use orb_core::{PackPolicy, Scene, Sphere};
pub use orb_math::{Ray, Vec3, WORLD_UP};

/// RGB color with channels in the nominal [0, 255] range.
pub type Color = Vec3;
