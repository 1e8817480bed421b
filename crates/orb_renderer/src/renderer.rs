//! Parallel frame renderer.
//!
//! Each frame:
//! - builds the viewport for the current camera
//! - splits the framebuffer rows into one band per worker
//! - renders every band as its own rayon task and joins them all
//!
//! The camera position doubles as the light position (headlamp).

use std::time::{Duration, Instant};

use crate::framebuffer::BandSlice;
use crate::{bands, color_pixel, worker_count, Camera, Framebuffer, RenderResult, Scene, Vec3, Viewport};
use orb_core::{pack_color, PackPolicy};

/// Render configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderConfig {
    /// Number of row bands; `None` uses the hardware concurrency
    pub workers: Option<usize>,
    /// How out-of-range channels are packed into bytes
    pub pack_policy: PackPolicy,
}

impl RenderConfig {
    /// Worker count for an image of `rows` rows.
    ///
    /// Never zero and never more than one band per row.
    pub fn effective_workers(&self, rows: usize) -> usize {
        self.workers
            .unwrap_or_else(worker_count)
            .min(rows)
            .max(1)
    }
}

/// Timing and partitioning of a finished frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameStats {
    pub workers: usize,
    pub elapsed: Duration,
}

/// Render the scene into `framebuffer`, overwriting every pixel.
///
/// Returns only after all bands have finished. Any error is reported
/// before a single pixel is written, so a failed call leaves the previous
/// frame intact.
pub fn render(
    scene: &Scene,
    camera: &Camera,
    framebuffer: &mut Framebuffer,
    config: &RenderConfig,
) -> RenderResult<FrameStats> {
    let start = Instant::now();

    let viewport = camera.viewport(framebuffer.width(), framebuffer.height())?;
    let workers = config.effective_workers(framebuffer.height());
    let bands = bands(framebuffer.height(), workers);
    let light = camera.position;
    let policy = config.pack_policy;

    let viewport = &viewport;
    let slices = framebuffer.band_slices_mut(&bands);
    rayon::scope(|s| {
        for slice in slices {
            s.spawn(move |_| render_band(slice, viewport, scene, light, policy));
        }
    });

    let stats = FrameStats {
        workers,
        elapsed: start.elapsed(),
    };
    log::debug!(
        "Rendered {}x{} in {} bands in {:?}",
        framebuffer.width(),
        framebuffer.height(),
        stats.workers,
        stats.elapsed
    );
    Ok(stats)
}

/// Render a scene into a newly allocated framebuffer.
pub fn render_image(
    scene: &Scene,
    camera: &Camera,
    width: usize,
    height: usize,
    config: &RenderConfig,
) -> RenderResult<Framebuffer> {
    let mut framebuffer = Framebuffer::new(width, height)?;
    render(scene, camera, &mut framebuffer, config)?;
    Ok(framebuffer)
}

/// Render one band row-major into its slice of the framebuffer.
fn render_band(
    slice: BandSlice<'_>,
    viewport: &Viewport,
    scene: &Scene,
    light: Vec3,
    policy: PackPolicy,
) {
    let width = viewport.width();
    let rows = slice
        .pixels
        .chunks_mut(width)
        .zip(slice.packed.chunks_mut(width));

    for (offset, (pixel_row, packed_row)) in rows.enumerate() {
        let row = slice.band.start + offset;
        for col in 0..width {
            let ray = viewport.ray(col, row);
            let color = color_pixel(scene, &ray, light);
            pixel_row[col] = color;
            packed_row[col] = pack_color(color, policy);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, RenderError, Sphere};
    use orb_core::PpmImage;

    fn red_sphere_scene() -> Scene {
        Scene::new(Color::ZERO).with_sphere(
            Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0, Color::new(255.0, 0.0, 0.0)).unwrap(),
        )
    }

    fn default_camera() -> Camera {
        Camera::new(Vec3::ZERO, Vec3::NEG_Z, 90.0).unwrap()
    }

    #[test]
    fn test_single_red_sphere() {
        let scene = red_sphere_scene();
        let camera = default_camera();
        let fb = render_image(&scene, &camera, 41, 31, &RenderConfig::default()).unwrap();

        // Center pixel hits the sphere head on
        let center = fb.get(20, 15);
        assert!(center.x > 200.0, "center={:?}", center);
        assert_eq!(center.y, 0.0);
        assert_eq!(center.z, 0.0);

        // Corners and edges are far outside the sphere's angular size
        for (x, y) in [(0, 0), (40, 0), (0, 30), (40, 30), (20, 0), (0, 15)] {
            assert_eq!(fb.get(x, y), scene.background, "pixel ({}, {})", x, y);
        }
    }

    #[test]
    fn test_worker_count_does_not_change_image() {
        let scene = Scene::demo();
        let camera = default_camera();

        let reference = render_image(
            &scene,
            &camera,
            32,
            24,
            &RenderConfig {
                workers: Some(1),
                ..Default::default()
            },
        )
        .unwrap();

        for workers in [2, 3, 5, 7, 24, 100] {
            let config = RenderConfig {
                workers: Some(workers),
                ..Default::default()
            };
            let fb = render_image(&scene, &camera, 32, 24, &config).unwrap();
            assert_eq!(fb.pixels(), reference.pixels(), "workers={}", workers);
            assert_eq!(fb.bytes(), reference.bytes(), "workers={}", workers);
        }
    }

    #[test]
    fn test_every_pixel_is_rewritten() {
        let camera = default_camera();
        let mut fb = Framebuffer::new(16, 9).unwrap();

        // Fill with a marker, then render an empty scene with a new background
        for y in 0..9 {
            for x in 0..16 {
                fb.set(x, y, Color::new(-1.0, -1.0, -1.0), PackPolicy::Wrap);
            }
        }
        let scene = Scene::new(Color::new(1.0, 2.0, 3.0));
        render(&scene, &camera, &mut fb, &RenderConfig::default()).unwrap();

        assert!(fb.pixels().iter().all(|&c| c == scene.background));
        assert!(fb.bytes().chunks(3).all(|rgb| rgb == [1, 2, 3]));
    }

    #[test]
    fn test_packed_matches_colors() {
        let scene = red_sphere_scene();
        let fb = render_image(&scene, &default_camera(), 20, 20, &RenderConfig::default()).unwrap();

        for (color, rgb) in fb.pixels().iter().zip(fb.bytes().chunks(3)) {
            assert_eq!(rgb, pack_color(*color, PackPolicy::Wrap));
        }
    }

    #[test]
    fn test_degenerate_image_fails_without_writing() {
        let scene = red_sphere_scene();
        let mut fb = Framebuffer::new(1, 10).unwrap();
        fb.set(0, 0, Color::new(7.0, 7.0, 7.0), PackPolicy::Wrap);

        let err = render(&scene, &default_camera(), &mut fb, &RenderConfig::default()).unwrap_err();
        assert!(matches!(err, RenderError::DegenerateViewport { .. }));
        assert_eq!(fb.get(0, 0), Color::new(7.0, 7.0, 7.0));
    }

    #[test]
    fn test_effective_workers() {
        let config = RenderConfig {
            workers: Some(8),
            ..Default::default()
        };
        assert_eq!(config.effective_workers(3), 3);
        assert_eq!(config.effective_workers(100), 8);

        let zero = RenderConfig {
            workers: Some(0),
            ..Default::default()
        };
        assert_eq!(zero.effective_workers(100), 1);
        assert!(RenderConfig::default().effective_workers(100) >= 1);
    }

    #[test]
    fn test_ppm_roundtrip_of_render() {
        let fb = render_image(&Scene::demo(), &default_camera(), 24, 18, &RenderConfig::default())
            .unwrap();
        let image = fb.to_ppm(255.0);

        let mut out = Vec::new();
        image.write_to(&mut out).unwrap();
        let back = PpmImage::read_from(out.as_slice(), "render").unwrap();

        assert_eq!(back.width(), 24);
        assert_eq!(back.height(), 18);
        for y in 0..18 {
            for x in 0..24 {
                assert_eq!(back.get(x, y), fb.get(x, y));
            }
        }
    }
}
