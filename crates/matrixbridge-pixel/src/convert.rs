//! Conversion dispatch.
//!
//! Each supported pair has a dedicated routine; unmapped pairs fail
//! rather than chaining through intermediates implicitly.

use crate::error::{PixelError, Result};
use crate::format::{PixelBuffer, PixelFormat, Rotation};
use crate::grgb::{grgb_to_rgb24, grgb_to_rgba32};
use crate::yuv::{ayuv_to_i420, i420_to_uyvy, uyvy_to_i420};

/// Convert a buffer to `target`, applying `rotation` where the target
/// path supports it. Converting to the source format with no rotation
/// is a cheap copy.
pub fn convert(src: &PixelBuffer, target: PixelFormat, rotation: Rotation) -> Result<PixelBuffer> {
    if src.format() == target && rotation == Rotation::None {
        return Ok(src.clone());
    }

    match (src.format(), target) {
        (PixelFormat::Grgb, PixelFormat::Rgb24) => require_no_rotation(rotation, target)
            .and_then(|_| grgb_to_rgb24(src)),
        (PixelFormat::Grgb, PixelFormat::Rgba32) => require_no_rotation(rotation, target)
            .and_then(|_| grgb_to_rgba32(src)),
        (PixelFormat::Uyvy, PixelFormat::I420) => {
            require_no_rotation(rotation, target).and_then(|_| uyvy_to_i420(src))
        }
        (PixelFormat::Ayuv, PixelFormat::I420) => {
            require_no_rotation(rotation, target).and_then(|_| ayuv_to_i420(src))
        }
        (PixelFormat::I420, PixelFormat::Uyvy) => i420_to_uyvy(src, rotation),
        (PixelFormat::Rgba32, PixelFormat::Rgba32) => crate::rotate::rotate_rgba(src, rotation),
        (PixelFormat::Uyvy, PixelFormat::Uyvy) => crate::rotate::rotate_uyvy(src, rotation),
        (from, to) => Err(PixelError::UnsupportedConversion { from, to }),
    }
}

/// Whether `convert` has a path for this format pair.
pub fn supports(from: PixelFormat, to: PixelFormat) -> bool {
    from == to
        || matches!(
            (from, to),
            (PixelFormat::Grgb, PixelFormat::Rgb24)
                | (PixelFormat::Grgb, PixelFormat::Rgba32)
                | (PixelFormat::Uyvy, PixelFormat::I420)
                | (PixelFormat::Ayuv, PixelFormat::I420)
                | (PixelFormat::I420, PixelFormat::Uyvy)
        )
}

fn require_no_rotation(rotation: Rotation, target: PixelFormat) -> Result<()> {
    if rotation == Rotation::None {
        Ok(())
    } else {
        Err(PixelError::UnsupportedRotation { format: target })
    }
}
