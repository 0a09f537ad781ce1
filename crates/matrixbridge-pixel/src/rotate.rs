//! Frame rotation.
//!
//! RGBA rotation is a per-pixel coordinate remap. Packed UYVY cannot be
//! remapped per pixel without tearing chroma pairs apart, so it rotates
//! in aligned 2x2 pixel blocks: luma moves per pixel, the two chroma
//! pairs of a block keep their intra-block order while the block itself
//! moves. Chroma siting ends up at most one pixel from ideal, and four
//! quarter turns restore the buffer byte-exactly.

use crate::error::{PixelError, Result};
use crate::format::{PixelBuffer, PixelFormat, Rotation};

/// Source coordinate feeding destination pixel `(x, y)` under a
/// clockwise rotation of a `sw` x `sh` source.
fn source_coord(rotation: Rotation, x: u32, y: u32, sw: u32, sh: u32) -> (u32, u32) {
    match rotation {
        Rotation::None => (x, y),
        Rotation::Quarter => (y, sh - 1 - x),
        Rotation::Half => (sw - 1 - x, sh - 1 - y),
        Rotation::ThreeQuarter => (sw - 1 - y, x),
    }
}

fn rotated_dims(rotation: Rotation, w: u32, h: u32) -> (u32, u32) {
    if rotation.swaps_axes() {
        (h, w)
    } else {
        (w, h)
    }
}

/// Rotate an RGBA buffer clockwise. 90/270 degrees swap width and height.
pub fn rotate_rgba(src: &PixelBuffer, rotation: Rotation) -> Result<PixelBuffer> {
    if src.format() != PixelFormat::Rgba32 {
        return Err(PixelError::UnsupportedRotation {
            format: src.format(),
        });
    }
    if rotation == Rotation::None {
        return Ok(src.clone());
    }

    let (sw, sh) = (src.width(), src.height());
    let (dw, dh) = rotated_dims(rotation, sw, sh);
    let data = src.data();
    let mut out = vec![0u8; data.len()];

    for y in 0..dh {
        for x in 0..dw {
            let (sx, sy) = source_coord(rotation, x, y, sw, sh);
            let dst = ((y * dw + x) * 4) as usize;
            let from = ((sy * sw + sx) * 4) as usize;
            out[dst..dst + 4].copy_from_slice(&data[from..from + 4]);
        }
    }

    PixelBuffer::new(dw, dh, PixelFormat::Rgba32, out)
}

/// Rotate a packed UYVY buffer clockwise, preserving pair alignment.
pub fn rotate_uyvy(src: &PixelBuffer, rotation: Rotation) -> Result<PixelBuffer> {
    if src.format() != PixelFormat::Uyvy {
        return Err(PixelError::UnsupportedRotation {
            format: src.format(),
        });
    }
    if rotation == Rotation::None {
        return Ok(src.clone());
    }

    let (sw, sh) = (src.width(), src.height());
    let (dw, dh) = rotated_dims(rotation, sw, sh);
    let data = src.data();
    let mut out = vec![0u8; data.len()];

    // Pair p of row y starts at ((y * w + 2p) * 2) — 4 bytes [U, Y0, V, Y1].
    let pair_offset = |w: u32, pair: u32, y: u32| -> usize { ((y * w + 2 * pair) * 2) as usize };
    let luma_offset =
        |w: u32, x: u32, y: u32| -> usize { pair_offset(w, x / 2, y) + 1 + 2 * (x % 2) as usize };

    for block_y in 0..dh / 2 {
        for block_x in 0..dw / 2 {
            // Luma: exact per-pixel remap.
            for dy in 0..2 {
                for dx in 0..2 {
                    let (x, y) = (2 * block_x + dx, 2 * block_y + dy);
                    let (sx, sy) = source_coord(rotation, x, y, sw, sh);
                    out[luma_offset(dw, x, y)] = data[luma_offset(sw, sx, sy)];
                }
            }

            // Chroma: rotation maps aligned 2x2 blocks onto aligned 2x2
            // blocks; the pairs keep their top/bottom order within the
            // block so repeated rotations compose to the identity.
            let (sx0, sy0) = source_coord(rotation, 2 * block_x, 2 * block_y, sw, sh);
            let (src_bx, src_by) = (sx0 / 2, sy0 / 2);
            for row in 0..2 {
                let dst = pair_offset(dw, block_x, 2 * block_y + row);
                let from = pair_offset(sw, src_bx, 2 * src_by + row);
                out[dst] = data[from]; // U
                out[dst + 2] = data[from + 2]; // V
            }
        }
    }

    PixelBuffer::new(dw, dh, PixelFormat::Uyvy, out)
}
