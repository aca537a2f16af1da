//! Shared test utilities for the heatmap workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Engine configurations and data sets for common scenarios
//! - Deterministic point generators
//! - Pixel comparison macros
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::*;
pub use generators::*;

/// Assert two RGBA pixels match channel by channel within a tolerance.
///
/// Colors read back from premultiplied surfaces can be off by one or two
/// levels at low alpha.
///
/// ```
/// use test_utils::assert_pixel_close;
///
/// assert_pixel_close!([255, 10, 0, 180], [254, 11, 0, 180], 1);
/// ```
#[macro_export]
macro_rules! assert_pixel_close {
    ($left:expr, $right:expr, $tolerance:expr) => {{
        let left: [u8; 4] = $left;
        let right: [u8; 4] = $right;
        let tolerance: i16 = $tolerance as i16;
        for channel in 0..4 {
            let diff = (left[channel] as i16 - right[channel] as i16).abs();
            if diff > tolerance {
                panic!(
                    "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  channel {} differs by {} > {}",
                    left, right, channel, diff, tolerance
                );
            }
        }
    }};
}

/// Count pixels of an RGBA buffer whose alpha is non-zero.
pub fn count_opaque_pixels(pixels: &[u8]) -> usize {
    pixels.chunks_exact(4).filter(|p| p[3] > 0).count()
}
