//! GRGB expansion.
//!
//! GRGB packs two horizontally adjacent pixels into four bytes
//! `[Gl, R, Gr, B]`: the pair shares R and B, each pixel keeps its own
//! green sample. Expansion is a fixed, lossless unpacking that doubles
//! the width.

use crate::error::{PixelError, Result};
use crate::format::{PixelBuffer, PixelFormat};

fn check_grgb(src: &PixelBuffer, to: PixelFormat) -> Result<()> {
    if src.format() != PixelFormat::Grgb {
        return Err(PixelError::UnsupportedConversion {
            from: src.format(),
            to,
        });
    }
    Ok(())
}

/// Expand GRGB to interleaved RGB, doubling the width.
pub fn grgb_to_rgb24(src: &PixelBuffer) -> Result<PixelBuffer> {
    check_grgb(src, PixelFormat::Rgb24)?;

    let (w, h) = (src.width() as usize, src.height() as usize);
    let data = src.data();
    let mut out = vec![0u8; w * 2 * h * 3];

    for y in 0..h {
        for x in 0..w {
            let group = (y * w + x) * 4;
            let px = (y * w * 2 + x * 2) * 3;

            let g_left = data[group];
            let r = data[group + 1];
            let g_right = data[group + 2];
            let b = data[group + 3];

            out[px] = r;
            out[px + 1] = g_left;
            out[px + 2] = b;

            out[px + 3] = r;
            out[px + 4] = g_right;
            out[px + 5] = b;
        }
    }

    PixelBuffer::new(src.width() * 2, src.height(), PixelFormat::Rgb24, out)
}

/// Expand GRGB to interleaved RGBA with opaque alpha, doubling the width.
pub fn grgb_to_rgba32(src: &PixelBuffer) -> Result<PixelBuffer> {
    check_grgb(src, PixelFormat::Rgba32)?;

    let (w, h) = (src.width() as usize, src.height() as usize);
    let data = src.data();
    let mut out = vec![0u8; w * 2 * h * 4];

    for y in 0..h {
        for x in 0..w {
            let group = (y * w + x) * 4;
            let px = (y * w * 2 + x * 2) * 4;

            let g_left = data[group];
            let r = data[group + 1];
            let g_right = data[group + 2];
            let b = data[group + 3];

            out[px] = r;
            out[px + 1] = g_left;
            out[px + 2] = b;
            out[px + 3] = 255;

            out[px + 4] = r;
            out[px + 5] = g_right;
            out[px + 6] = b;
            out[px + 7] = 255;
        }
    }

    PixelBuffer::new(src.width() * 2, src.height(), PixelFormat::Rgba32, out)
}
