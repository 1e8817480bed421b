//! Camera for ray generation.

use crate::{RenderError, RenderResult};
use orb_core::CameraSettings;
use orb_math::{rotate, Ray, Vec3, WORLD_UP};

/// Smallest |forward x world_up| still accepted as a usable basis.
const MIN_BASIS_LENGTH: f64 = 1e-12;

/// Derive the camera `right` and `up` vectors from a view direction.
///
/// `right = normalize(forward x world_up)`, `up = normalize(right x forward)`.
/// Fails when `forward` is zero or parallel to `world_up`.
pub fn derive_basis(forward: Vec3, world_up: Vec3) -> RenderResult<(Vec3, Vec3)> {
    let degenerate = || RenderError::DegenerateBasis(forward.to_array());

    let cross = forward.cross(world_up);
    if cross.length() < MIN_BASIS_LENGTH {
        return Err(degenerate());
    }
    let right = cross.try_normalize().ok_or_else(degenerate)?;
    let up = right.cross(forward).try_normalize().ok_or_else(degenerate)?;
    Ok((right, up))
}

/// Free-flying pinhole camera.
///
/// `right`, `up` and `forward` always form an orthonormal right-handed
/// basis; every direction change re-derives the basis from scratch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    forward: Vec3,
    fov_degrees: f64,
    right: Vec3,
    up: Vec3,
}

impl Camera {
    /// Create a camera at `position` looking along `forward`.
    ///
    /// `fov_degrees` is the vertical field of view.
    pub fn new(position: Vec3, forward: Vec3, fov_degrees: f64) -> RenderResult<Self> {
        if !(fov_degrees > 0.0 && fov_degrees < 180.0) {
            return Err(RenderError::InvalidFov(fov_degrees));
        }

        let forward = forward
            .try_normalize()
            .ok_or(RenderError::DegenerateBasis(forward.to_array()))?;
        let (right, up) = derive_basis(forward, WORLD_UP)?;

        Ok(Self {
            position,
            forward,
            fov_degrees,
            right,
            up,
        })
    }

    /// Create a camera from scene file settings.
    pub fn from_settings(settings: &CameraSettings) -> RenderResult<Self> {
        Self::new(settings.position, settings.forward, settings.fov_degrees)
    }

    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    #[inline]
    pub fn right(&self) -> Vec3 {
        self.right
    }

    #[inline]
    pub fn up(&self) -> Vec3 {
        self.up
    }

    #[inline]
    pub fn fov_degrees(&self) -> f64 {
        self.fov_degrees
    }

    /// Point the camera along a new direction.
    ///
    /// On error the camera is left unchanged.
    pub fn set_forward(&mut self, forward: Vec3) -> RenderResult<()> {
        let forward = forward
            .try_normalize()
            .ok_or(RenderError::DegenerateBasis(forward.to_array()))?;
        let (right, up) = derive_basis(forward, WORLD_UP)?;
        self.forward = forward;
        self.right = right;
        self.up = up;
        Ok(())
    }

    /// Re-normalize `forward` and recompute `right`/`up` from it.
    ///
    /// Called once per frame after direction changes so rounding error from
    /// repeated rotations never accumulates into the basis.
    pub fn refresh_basis(&mut self) -> RenderResult<()> {
        self.set_forward(self.forward)
    }

    /// Move along the current view direction.
    pub fn translate(&mut self, distance: f64) {
        self.position += self.forward * distance;
    }

    /// Turn about the world up axis. Positive angles turn left.
    pub fn yaw(&mut self, angle: f64) -> RenderResult<()> {
        self.set_forward(rotate(self.forward, WORLD_UP, angle))
    }

    /// Tilt about the camera right axis. Positive angles look up.
    ///
    /// There is no clamp near the poles; only a direction exactly parallel
    /// to world up is rejected.
    pub fn pitch(&mut self, angle: f64) -> RenderResult<()> {
        self.set_forward(rotate(self.forward, self.right, angle))
    }

    /// Precompute the per-frame viewport for an image size.
    pub fn viewport(&self, width: usize, height: usize) -> RenderResult<Viewport> {
        if width < 2 || height < 2 {
            return Err(RenderError::DegenerateViewport { width, height });
        }

        let view_height = 2.0 * (self.fov_degrees.to_radians() / 2.0).tan();
        let view_width = view_height * (width as f64 / height as f64);

        let lower_left = self.position + self.forward
            - self.right * (view_width / 2.0)
            - self.up * (view_height / 2.0);

        Ok(Viewport {
            origin: self.position,
            lower_left,
            horizontal: self.right * view_width,
            vertical: self.up * view_height,
            width,
            height,
            u_scale: 1.0 / (width - 1) as f64,
            v_scale: 1.0 / (height - 1) as f64,
        })
    }
}

/// Virtual image plane one unit in front of the camera.
///
/// Built once per frame; turning a pixel into a ray is then infallible.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    origin: Vec3,
    lower_left: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
    width: usize,
    height: usize,
    u_scale: f64,
    v_scale: f64,
}

impl Viewport {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Ray through pixel (`col`, `row`); row 0 is the top of the image.
    #[inline]
    pub fn ray(&self, col: usize, row: usize) -> Ray {
        let u = col as f64 * self.u_scale;
        let v = 1.0 - row as f64 * self.v_scale;

        // The plane sits at forward * 1, so this never has zero length
        let direction =
            (self.lower_left + self.horizontal * u + self.vertical * v - self.origin).normalize();
        Ray::new(self.origin, direction)
    }
}

/// Map a single pixel to a world-space ray.
pub fn pixel_to_ray(
    camera: &Camera,
    col: usize,
    row: usize,
    width: usize,
    height: usize,
) -> RenderResult<Ray> {
    if col >= width || row >= height {
        return Err(RenderError::PixelOutOfBounds {
            col,
            row,
            width,
            height,
        });
    }
    Ok(camera.viewport(width, height)?.ray(col, row))
}
