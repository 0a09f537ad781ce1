//! YUV conversions: packed 4:2:2 / 4:4:4 down to planar 4:2:0 and back.
//!
//! Subsampling averages the four co-located chroma samples of each 2x2
//! luma block (sum >> 2); luma is copied per pixel and survives a
//! round trip exactly, chroma is lossy within one code value.

use crate::error::{PixelError, Result};
use crate::format::{PixelBuffer, PixelFormat, Rotation};
use crate::rotate::rotate_uyvy;

/// Byte offset of the UYVY pair containing pixel `x` in row `y`.
fn uyvy_pair_offset(width: usize, x: usize, y: usize) -> usize {
    (y * width / 2 + x / 2) * 4
}

/// Byte offset of pixel `x`'s luma within its UYVY pair group.
fn uyvy_luma_offset(width: usize, x: usize, y: usize) -> usize {
    uyvy_pair_offset(width, x, y) + 1 + 2 * (x % 2)
}

fn expect_format(src: &PixelBuffer, from: PixelFormat, to: PixelFormat) -> Result<()> {
    if src.format() != from {
        return Err(PixelError::UnsupportedConversion {
            from: src.format(),
            to,
        });
    }
    Ok(())
}

/// Subsample packed UYVY into planar I420.
pub fn uyvy_to_i420(src: &PixelBuffer) -> Result<PixelBuffer> {
    expect_format(src, PixelFormat::Uyvy, PixelFormat::I420)?;
    subsample_to_i420(src, |data, w, x, y| {
        let pair = uyvy_pair_offset(w, x, y);
        (data[uyvy_luma_offset(w, x, y)], data[pair], data[pair + 2])
    })
}

/// Subsample packed AYUV (`[A, Y, U, V]` per pixel) into planar I420.
/// Alpha is discarded.
pub fn ayuv_to_i420(src: &PixelBuffer) -> Result<PixelBuffer> {
    expect_format(src, PixelFormat::Ayuv, PixelFormat::I420)?;
    if src.width() % 2 != 0 || src.height() % 2 != 0 {
        return Err(PixelError::OddDimensions {
            format: PixelFormat::Ayuv,
            width: src.width(),
            height: src.height(),
        });
    }
    subsample_to_i420(src, |data, w, x, y| {
        let px = (y * w + x) * 4;
        (data[px + 1], data[px + 2], data[px + 3])
    })
}

/// Shared 4:2:0 subsampling walk. `sample` returns `(y, u, v)` for one
/// source pixel.
fn subsample_to_i420(
    src: &PixelBuffer,
    sample: impl Fn(&[u8], usize, usize, usize) -> (u8, u8, u8),
) -> Result<PixelBuffer> {
    let (w, h) = (src.width() as usize, src.height() as usize);
    let data = src.data();
    let chroma_w = w / 2;

    let mut out = vec![0u8; w * h + chroma_w * (h / 2) * 2];
    let (y_plane, chroma) = out.split_at_mut(w * h);
    let (u_plane, v_plane) = chroma.split_at_mut(chroma_w * (h / 2));

    for y in 0..h {
        for x in 0..w {
            y_plane[y * w + x] = sample(data, w, x, y).0;
        }
    }

    for block_y in 0..h / 2 {
        for block_x in 0..chroma_w {
            let mut u_sum = 0u32;
            let mut v_sum = 0u32;
            for dy in 0..2 {
                for dx in 0..2 {
                    let (_, u, v) = sample(data, w, 2 * block_x + dx, 2 * block_y + dy);
                    u_sum += u as u32;
                    v_sum += v as u32;
                }
            }
            u_plane[block_y * chroma_w + block_x] = (u_sum >> 2) as u8;
            v_plane[block_y * chroma_w + block_x] = (v_sum >> 2) as u8;
        }
    }

    PixelBuffer::new(src.width(), src.height(), PixelFormat::I420, out)
}

/// Interleave planar I420 back into packed UYVY, then rotate the packed
/// buffer. 90/270 degrees swap width and height.
pub fn i420_to_uyvy(src: &PixelBuffer, rotation: Rotation) -> Result<PixelBuffer> {
    expect_format(src, PixelFormat::I420, PixelFormat::Uyvy)?;

    let (w, h) = (src.width() as usize, src.height() as usize);
    let data = src.data();
    let chroma_w = w / 2;
    let y_plane = &data[..w * h];
    let u_plane = &data[w * h..w * h + chroma_w * (h / 2)];
    let v_plane = &data[w * h + chroma_w * (h / 2)..];

    let mut out = vec![0u8; w * h * 2];
    for y in 0..h {
        for pair in 0..w / 2 {
            let x = pair * 2;
            let chroma = (y / 2) * chroma_w + pair;
            let dst = uyvy_pair_offset(w, x, y);
            out[dst] = u_plane[chroma];
            out[dst + 1] = y_plane[y * w + x];
            out[dst + 2] = v_plane[chroma];
            out[dst + 3] = y_plane[y * w + x + 1];
        }
    }

    let packed = PixelBuffer::new(src.width(), src.height(), PixelFormat::Uyvy, out)?;
    rotate_uyvy(&packed, rotation)
}
