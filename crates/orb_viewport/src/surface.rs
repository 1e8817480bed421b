//! Where finished frames go.

use thiserror::Error;

/// Errors reported by a presentation surface.
#[derive(Error, Debug)]
pub enum SurfaceError {
    #[error("Frame is {actual} bytes, expected {expected} for {width}x{height} RGB")]
    SizeMismatch {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Frame {width}x{height} exceeds the surface limit of {max} pixels per side")]
    TooLarge { width: usize, height: usize, max: usize },

    #[error("GPU surface error: {0}")]
    Gpu(#[from] wgpu::SurfaceError),
}

/// Receives packed frames from the render loop.
pub trait PresentationSurface {
    /// Display a `width * height * 3` byte, row-major RGB frame.
    fn present(&mut self, width: usize, height: usize, rgb: &[u8]) -> Result<(), SurfaceError>;

    /// Largest frame width or height this surface can display.
    fn max_dimension(&self) -> usize {
        usize::MAX
    }
}

/// Clamp each side of a frame to `max`.
pub fn fit_frame_size(width: usize, height: usize, max: usize) -> (usize, usize) {
    (width.min(max), height.min(max))
}

/// Check that `len` bytes form a `width x height` RGB frame.
pub fn check_frame_size(width: usize, height: usize, len: usize) -> Result<(), SurfaceError> {
    let expected = width.saturating_mul(height).saturating_mul(3);
    if len != expected {
        return Err(SurfaceError::SizeMismatch {
            width,
            height,
            expected,
            actual: len,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_frame_size() {
        assert!(check_frame_size(4, 3, 36).is_ok());
        assert!(matches!(
            check_frame_size(4, 3, 48),
            Err(SurfaceError::SizeMismatch {
                expected: 36,
                actual: 48,
                ..
            })
        ));
    }

    #[test]
    fn test_fit_frame_size() {
        assert_eq!(fit_frame_size(3840, 2160, 2048), (2048, 2048));
        assert_eq!(fit_frame_size(800, 600, 8192), (800, 600));
        assert_eq!(fit_frame_size(9000, 600, 8192), (8192, 600));
    }
}
