//! Frame storage shared by the render workers.

use crate::{Band, Color, RenderError, RenderResult};
use orb_core::{pack_color, PackPolicy, PpmImage};

/// Rendered pixels in two synchronized forms: floating-point colors and
/// packed RGB bytes ready for display.
///
/// Both are row-major. The buffer is reused across frames; only a size
/// change reallocates.
pub struct Framebuffer {
    width: usize,
    height: usize,
    pixels: Vec<Color>,
    packed: Vec<[u8; 3]>,
}

impl Framebuffer {
    /// Create a black framebuffer.
    pub fn new(width: usize, height: usize) -> RenderResult<Self> {
        if width == 0 || height == 0 {
            return Err(RenderError::ZeroSizeFramebuffer { width, height });
        }
        Ok(Self {
            width,
            height,
            pixels: vec![Color::ZERO; width * height],
            packed: vec![[0; 3]; width * height],
        })
    }

    /// Change dimensions, reallocating only if they differ.
    ///
    /// Returns `true` when the storage was replaced.
    pub fn resize(&mut self, width: usize, height: usize) -> RenderResult<bool> {
        if width == self.width && height == self.height {
            return Ok(false);
        }
        *self = Self::new(width, height)?;
        Ok(true)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Floating-point colors, row-major.
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Get the color at column `x`, row `y`.
    pub fn get(&self, x: usize, y: usize) -> Color {
        self.pixels[y * self.width + x]
    }

    /// Packed RGB bytes, `width * height * 3` long.
    pub fn bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.packed)
    }

    /// Set one pixel in both representations.
    pub fn set(&mut self, x: usize, y: usize, color: Color, policy: PackPolicy) {
        let index = y * self.width + x;
        self.pixels[index] = color;
        self.packed[index] = pack_color(color, policy);
    }

    /// Copy the colors into a pixel-file image.
    pub fn to_ppm(&self, max_color: f64) -> PpmImage {
        let mut image = PpmImage::new(self.width, self.height, max_color);
        for y in 0..self.height {
            for x in 0..self.width {
                image.set(x, y, self.get(x, y));
            }
        }
        image
    }

    /// Split the storage into one exclusive slice pair per band.
    ///
    /// `bands` must be contiguous from row 0 and cover every row, which is
    /// what [`crate::bands`] produces.
    pub(crate) fn band_slices_mut(&mut self, bands: &[Band]) -> Vec<BandSlice<'_>> {
        let width = self.width;
        let mut pixels: &mut [Color] = &mut self.pixels;
        let mut packed: &mut [[u8; 3]] = &mut self.packed;
        let mut slices = Vec::with_capacity(bands.len());

        for band in bands {
            let len = band.rows() * width;
            let (band_pixels, rest_pixels) = std::mem::take(&mut pixels).split_at_mut(len);
            let (band_packed, rest_packed) = std::mem::take(&mut packed).split_at_mut(len);
            pixels = rest_pixels;
            packed = rest_packed;

            slices.push(BandSlice {
                band: *band,
                pixels: band_pixels,
                packed: band_packed,
            });
        }
        debug_assert!(pixels.is_empty(), "bands do not cover the framebuffer");

        slices
    }
}

/// The rows of one band, borrowed mutably from a [`Framebuffer`].
pub(crate) struct BandSlice<'a> {
    pub band: Band,
    pub pixels: &'a mut [Color],
    pub packed: &'a mut [[u8; 3]],
}
