use thiserror::Error;

/// Errors that abandon a render call or a camera update.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("Framebuffer must be at least 1x1, got {width}x{height}")]
    ZeroSizeFramebuffer { width: usize, height: usize },

    #[error("Viewport needs at least 2x2 pixels to map rays, got {width}x{height}")]
    DegenerateViewport { width: usize, height: usize },

    #[error("Camera direction {0:?} cannot form a basis with world up")]
    DegenerateBasis([f64; 3]),

    #[error("Field of view must be within (0, 180) degrees, got {0}")]
    InvalidFov(f64),

    #[error("Pixel ({col}, {row}) outside {width}x{height} image")]
    PixelOutOfBounds {
        col: usize,
        row: usize,
        width: usize,
        height: usize,
    },
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;
