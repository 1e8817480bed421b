//! Conversion from floating-point colors to display bytes.
//!
//! Colors stay `f64` through shading; nothing clamps them. Packing to bytes
//! is the single place where out-of-range channels are handled, and the
//! policy is explicit.

use orb_math::Vec3;

/// How a channel outside `[0, 255]` is narrowed to a byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PackPolicy {
    /// Truncate toward zero and keep the low 8 bits (256 -> 0, 300 -> 44).
    ///
    /// Negative and NaN channels pack to 0.
    #[default]
    Wrap,

    /// Clamp to `[0, 255]`, then truncate.
    Saturate,
}

/// Narrow one channel to a byte under the given policy.
#[inline]
pub fn pack_channel(value: f64, policy: PackPolicy) -> u8 {
    if value.is_nan() || value <= 0.0 {
        return 0;
    }
    match policy {
        // `as i64` saturates for huge values; the u8 cast then keeps the low byte
        PackPolicy::Wrap => (value.trunc() as i64) as u8,
        PackPolicy::Saturate => value.min(255.0) as u8,
    }
}

/// Narrow an RGB color to three bytes.
#[inline]
pub fn pack_color(color: Vec3, policy: PackPolicy) -> [u8; 3] {
    [
        pack_channel(color.x, policy),
        pack_channel(color.y, policy),
        pack_channel(color.z, policy),
    ]
}
