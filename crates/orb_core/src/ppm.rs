//! Plain-text `P3` pixel files.
//!
//! Layout: a header line, a `width height` line, a max-color line, then
//! `height` lines of `width` whitespace-separated `R G B` triples. Channel
//! values are kept exactly as written, so fractional values survive a
//! save/load round trip.
//!
//! Lines starting with `#` are skipped before the dimensions line, before
//! the max-color line, and between pixel rows. A `#` anywhere else (the
//! header line, or after values on the same line) is not treated as a
//! comment.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use orb_math::Vec3;
use thiserror::Error;

use crate::pack::{pack_color, PackPolicy};

/// Upper bound on the pixel storage reserved from a file header.
const MAX_PREALLOCATED_PIXELS: usize = 1 << 20;

/// Errors that can occur while reading or writing pixel files.
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Could not open file for reading: {path}")]
    Open {
        path: PathBuf,
        #[source]
        err: std::io::Error,
    },

    #[error("Could not open file for writing: {path}")]
    Create {
        path: PathBuf,
        #[source]
        err: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Error reading image dimensions from file: {0}")]
    Dimensions(String),

    #[error("Error reading max color value from file: {0}")]
    MaxColor(String),

    #[error("Error reading pixel data from file: {file} (row {row})")]
    PixelData { file: String, row: usize },

    #[error("No pixel data to write to file: {0}")]
    Empty(String),

    #[error("Expected {expected} pixels, got {actual}")]
    PixelCount { expected: usize, actual: usize },

    #[error("Image of {width}x{height} pixels is too large for 8-bit export")]
    TooLarge { width: usize, height: usize },

    #[error("PNG encoding error: {0}")]
    Png(#[from] image::ImageError),
}

/// Result type for image operations.
pub type ImageResult<T> = Result<T, ImageError>;

/// An image held as floating-point RGB triples, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct PpmImage {
    width: usize,
    height: usize,
    max_color: f64,
    pixels: Vec<Vec3>,
}

impl PpmImage {
    /// Create a black image.
    pub fn new(width: usize, height: usize, max_color: f64) -> Self {
        Self {
            width,
            height,
            max_color,
            pixels: vec![Vec3::ZERO; width * height],
        }
    }

    /// Wrap existing row-major pixel data.
    pub fn from_pixels(
        width: usize,
        height: usize,
        max_color: f64,
        pixels: Vec<Vec3>,
    ) -> ImageResult<Self> {
        if pixels.len() != width * height {
            return Err(ImageError::PixelCount {
                expected: width * height,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            max_color,
            pixels,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn max_color(&self) -> f64 {
        self.max_color
    }

    /// Row-major pixel data.
    pub fn pixels(&self) -> &[Vec3] {
        &self.pixels
    }

    /// Get the pixel at column `x`, row `y`.
    pub fn get(&self, x: usize, y: usize) -> Vec3 {
        self.pixels[y * self.width + x]
    }

    /// Set the pixel at column `x`, row `y`.
    pub fn set(&mut self, x: usize, y: usize, color: Vec3) {
        self.pixels[y * self.width + x] = color;
    }

    /// Load a pixel file from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> ImageResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|err| ImageError::Open {
            path: path.to_path_buf(),
            err,
        })?;

        let image = Self::read_from(BufReader::new(file), &path.display().to_string())?;
        log::info!(
            "Loaded {}x{} image from {}",
            image.width,
            image.height,
            path.display()
        );
        Ok(image)
    }

    /// Parse a pixel file from any buffered reader.
    ///
    /// `name` is only used in error messages.
    pub fn read_from<R: BufRead>(reader: R, name: &str) -> ImageResult<Self> {
        let mut lines = reader.lines();

        match lines.next().transpose()? {
            Some(header) if header.trim() == "P3" => {}
            Some(header) => log::warn!("Unexpected header {:?} in {}", header.trim(), name),
            None => return Err(ImageError::Dimensions(name.to_string())),
        }

        let dims_line = next_content_line(&mut lines)?
            .ok_or_else(|| ImageError::Dimensions(name.to_string()))?;
        let (width, height) =
            parse_dimensions(&dims_line).ok_or_else(|| ImageError::Dimensions(name.to_string()))?;

        let max_line = next_content_line(&mut lines)?
            .ok_or_else(|| ImageError::MaxColor(name.to_string()))?;
        let max_color = max_line
            .split_whitespace()
            .next()
            .and_then(|token| token.parse::<f64>().ok())
            .ok_or_else(|| ImageError::MaxColor(name.to_string()))?;

        // Grow with the rows actually read rather than the header's claim
        let mut pixels = Vec::with_capacity((width * height).min(MAX_PREALLOCATED_PIXELS));
        let mut row = 0;
        for line in lines {
            let line = line?;
            if line.starts_with('#') {
                continue;
            }
            if row == height {
                // Anything past the last row must be blank
                if line.trim().is_empty() {
                    continue;
                }
                return Err(ImageError::PixelData {
                    file: name.to_string(),
                    row,
                });
            }

            parse_row(&line, width, &mut pixels).ok_or_else(|| ImageError::PixelData {
                file: name.to_string(),
                row,
            })?;
            row += 1;
        }

        if row < height {
            return Err(ImageError::PixelData {
                file: name.to_string(),
                row,
            });
        }

        Ok(Self {
            width,
            height,
            max_color,
            pixels,
        })
    }

    /// Write the image to disk.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> ImageResult<()> {
        let path = path.as_ref();
        self.ensure_not_empty(path)?;

        let file = File::create(path).map_err(|err| ImageError::Create {
            path: path.to_path_buf(),
            err,
        })?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)?;
        writer.flush()?;

        log::info!("Saved {}x{} image to {}", self.width, self.height, path.display());
        Ok(())
    }

    /// Serialize the image to any writer.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> ImageResult<()> {
        self.ensure_not_empty(Path::new("<stream>"))?;

        writeln!(writer, "P3")?;
        writeln!(writer, "{} {}", self.width, self.height)?;
        writeln!(writer, "{}", self.max_color)?;
        for row in self.pixels.chunks(self.width) {
            for pixel in row {
                write!(writer, "{} {} {} ", pixel.x, pixel.y, pixel.z)?;
            }
            writeln!(writer)?;
        }
        Ok(())
    }

    /// Convert to 8-bit RGB using the given packing policy.
    ///
    /// Fails when a side does not fit in `u32`.
    pub fn to_rgb8(&self, policy: PackPolicy) -> ImageResult<image::RgbImage> {
        let too_large = || ImageError::TooLarge {
            width: self.width,
            height: self.height,
        };
        let width = u32::try_from(self.width).map_err(|_| too_large())?;
        let height = u32::try_from(self.height).map_err(|_| too_large())?;

        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for color in &self.pixels {
            bytes.extend_from_slice(&pack_color(*color, policy));
        }
        image::RgbImage::from_raw(width, height, bytes).ok_or_else(too_large)
    }

    /// Save an 8-bit PNG snapshot.
    pub fn save_png<P: AsRef<Path>>(&self, path: P, policy: PackPolicy) -> ImageResult<()> {
        let path = path.as_ref();
        self.ensure_not_empty(path)?;
        self.to_rgb8(policy)?.save(path)?;
        log::info!("Saved {}x{} PNG to {}", self.width, self.height, path.display());
        Ok(())
    }

    fn ensure_not_empty(&self, path: &Path) -> ImageResult<()> {
        if self.width == 0 || self.height == 0 || self.pixels.is_empty() {
            return Err(ImageError::Empty(path.display().to_string()));
        }
        Ok(())
    }
}

/// Next line that is not a `#` comment, or `None` at end of input.
fn next_content_line<I>(lines: &mut I) -> ImageResult<Option<String>>
where
    I: Iterator<Item = std::io::Result<String>>,
{
    for line in lines {
        let line = line?;
        if !line.starts_with('#') {
            return Ok(Some(line));
        }
    }
    Ok(None)
}

/// Parse `width height`, rejecting zero sizes and pixel counts whose
/// channel data would not fit in memory.
fn parse_dimensions(line: &str) -> Option<(usize, usize)> {
    let mut tokens = line.split_whitespace();
    let width = tokens.next()?.parse::<usize>().ok()?;
    let height = tokens.next()?.parse::<usize>().ok()?;
    if width == 0 || height == 0 {
        return None;
    }
    width.checked_mul(height)?.checked_mul(3)?;
    Some((width, height))
}

/// Parse `width` triples from a row, ignoring any trailing tokens.
fn parse_row(line: &str, width: usize, pixels: &mut Vec<Vec3>) -> Option<()> {
    let mut tokens = line.split_whitespace().map(|t| t.parse::<f64>());
    for _ in 0..width {
        let r = tokens.next()?.ok()?;
        let g = tokens.next()?.ok()?;
        let b = tokens.next()?.ok()?;
        pixels.push(Vec3::new(r, g, b));
    }
    Some(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> ImageResult<PpmImage> {
        PpmImage::read_from(text.as_bytes(), "test.ppm")
    }

    #[test]
    fn test_read_with_comments() {
        let text = "P3\n# made by hand\n2 2\n# max\n255\n\
                    255 0 0 0 255 0\n# between rows\n0 0 255 12.5 13.25 14\n";
        let image = parse(text).unwrap();

        assert_eq!(image.width(), 2);
        assert_eq!(image.height(), 2);
        assert_eq!(image.max_color(), 255.0);
        assert_eq!(image.get(0, 0), Vec3::new(255.0, 0.0, 0.0));
        assert_eq!(image.get(1, 0), Vec3::new(0.0, 255.0, 0.0));
        assert_eq!(image.get(0, 1), Vec3::new(0.0, 0.0, 255.0));
        assert_eq!(image.get(1, 1), Vec3::new(12.5, 13.25, 14.0));
    }

    #[test]
    fn test_read_bad_dimensions() {
        let err = parse("P3\nwide tall\n255\n").unwrap_err();
        assert!(matches!(err, ImageError::Dimensions(_)));

        let err = parse("P3\n0 3\n255\n").unwrap_err();
        assert!(matches!(err, ImageError::Dimensions(_)));

        let err = parse("").unwrap_err();
        assert!(matches!(err, ImageError::Dimensions(_)));
    }

    #[test]
    fn test_read_bad_max_color() {
        let err = parse("P3\n1 1\nlots\n0 0 0\n").unwrap_err();
        assert!(matches!(err, ImageError::MaxColor(_)));
    }

    #[test]
    fn test_read_bad_pixel() {
        let err = parse("P3\n2 1\n255\n1 2 3 4 five 6\n").unwrap_err();
        assert!(matches!(err, ImageError::PixelData { row: 0, .. }));

        // Short row
        let err = parse("P3\n2 1\n255\n1 2 3\n").unwrap_err();
        assert!(matches!(err, ImageError::PixelData { row: 0, .. }));
    }

    #[test]
    fn test_read_missing_and_extra_rows() {
        let err = parse("P3\n1 2\n255\n1 2 3\n").unwrap_err();
        assert!(matches!(err, ImageError::PixelData { row: 1, .. }));

        let err = parse("P3\n1 1\n255\n1 2 3\n4 5 6\n").unwrap_err();
        assert!(matches!(err, ImageError::PixelData { row: 1, .. }));

        // Trailing blank lines are fine
        assert!(parse("P3\n1 1\n255\n1 2 3\n\n\n").is_ok());
    }

    #[test]
    fn test_write_format() {
        let mut image = PpmImage::new(2, 1, 255.0);
        image.set(0, 0, Vec3::new(255.0, 0.0, 0.0));
        image.set(1, 0, Vec3::new(0.5, 1.0, 2.0));

        let mut out = Vec::new();
        image.write_to(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "P3\n2 1\n255\n255 0 0 0.5 1 2 \n");
    }

    #[test]
    fn test_write_empty_fails() {
        let image = PpmImage::new(0, 0, 255.0);
        let mut out = Vec::new();
        assert!(matches!(image.write_to(&mut out), Err(ImageError::Empty(_))));
    }

    #[test]
    fn test_roundtrip_fractional() {
        let pixels = (0..6)
            .map(|i| Vec3::new(i as f64 * 40.3, 255.0 / (i as f64 + 1.0), 0.1))
            .collect();
        let image = PpmImage::from_pixels(3, 2, 255.0, pixels).unwrap();

        let mut out = Vec::new();
        image.write_to(&mut out).unwrap();
        let back = PpmImage::read_from(out.as_slice(), "roundtrip").unwrap();
        assert_eq!(back, image);
    }

    #[test]
    fn test_from_pixels_checks_length() {
        let err = PpmImage::from_pixels(2, 2, 255.0, vec![Vec3::ZERO; 3]).unwrap_err();
        assert!(matches!(err, ImageError::PixelCount { expected: 4, actual: 3 }));
    }

    #[test]
    fn test_load_missing_file() {
        let err = PpmImage::load("/definitely/not/here.ppm").unwrap_err();
        assert!(matches!(err, ImageError::Open { .. }));
    }

    #[test]
    fn test_save_and_load_file() {
        let _ = env_logger::builder().is_test(true).try_init();

        let mut image = PpmImage::new(2, 2, 255.0);
        image.set(1, 1, Vec3::new(9.0, 8.0, 7.0));

        let path = std::env::temp_dir().join(format!("orb_ppm_test_{}.ppm", std::process::id()));
        image.save(&path).unwrap();
        let back = PpmImage::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(back, image);
    }

    #[test]
    fn test_to_rgb8_uses_policy() {
        let mut image = PpmImage::new(1, 1, 255.0);
        image.set(0, 0, Vec3::new(300.0, 10.0, 0.0));

        let wrapped = image.to_rgb8(PackPolicy::Wrap).unwrap();
        let saturated = image.to_rgb8(PackPolicy::Saturate).unwrap();
        assert_eq!(wrapped.get_pixel(0, 0).0, [44, 10, 0]);
        assert_eq!(saturated.get_pixel(0, 0).0, [255, 10, 0]);
        assert_eq!(wrapped.dimensions(), (1, 1));
    }

    #[test]
    fn test_oversized_header_is_an_error() {
        // width * height overflows
        let err = parse("P3\n4294967296 4294967296\n255\n0 0 0\n").unwrap_err();
        assert!(matches!(err, ImageError::Dimensions(_)));

        let err = parse(&format!("P3\n{} 2\n255\n0 0 0\n", usize::MAX)).unwrap_err();
        assert!(matches!(err, ImageError::Dimensions(_)));
    }

    #[test]
    fn test_huge_header_with_short_data_fails_cleanly() {
        // Valid size, but far more pixels than the file holds
        let err = parse("P3\n100000 100000\n255\n0 0 0\n").unwrap_err();
        assert!(matches!(err, ImageError::PixelData { row: 0, .. }));
    }
}
