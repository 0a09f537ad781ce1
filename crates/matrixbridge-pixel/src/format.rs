use std::fmt;
use std::str::FromStr;

use bytes::Bytes;

use crate::error::{PixelError, Result};

/// Pixel format of a raw frame buffer.
///
/// Width semantics differ per format and matter for the conversions:
/// - `Grgb` width counts 4-byte `[Gl, R, Gr, B]` groups, each describing
///   two horizontally adjacent pixels (expansion doubles the width).
/// - All other formats count real pixels; `Uyvy` and `I420` require even
///   dimensions because chroma is shared across pixel pairs / 2x2 blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// Packed 2-pixels-per-4-bytes with shared R/B, independent G.
    Grgb,
    /// Interleaved RGB, 3 bytes per pixel.
    Rgb24,
    /// Interleaved RGBA, 4 bytes per pixel.
    Rgba32,
    /// Packed YUV 4:2:2, `[U, Y0, V, Y1]` per pixel pair.
    Uyvy,
    /// Packed YUV 4:4:4 with alpha, `[A, Y, U, V]` per pixel.
    Ayuv,
    /// Planar YUV 4:2:0 — full Y plane, then quarter-size U and V planes.
    I420,
}

impl PixelFormat {
    /// Exact byte length a buffer of this format must have.
    pub fn buffer_len(self, width: u32, height: u32) -> usize {
        let (w, h) = (width as usize, height as usize);
        match self {
            Self::Grgb => w * h * 4,
            Self::Rgb24 => w * h * 3,
            Self::Rgba32 => w * h * 4,
            Self::Uyvy => w * h * 2,
            Self::Ayuv => w * h * 4,
            Self::I420 => w * h + (w / 2) * (h / 2) * 2,
        }
    }

    /// Whether this format shares chroma across pixels and therefore
    /// requires even dimensions.
    pub fn requires_even_dimensions(self) -> bool {
        matches!(self, Self::Uyvy | Self::I420)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Grgb => "grgb",
            Self::Rgb24 => "rgb24",
            Self::Rgba32 => "rgba32",
            Self::Uyvy => "uyvy",
            Self::Ayuv => "ayuv",
            Self::I420 => "i420",
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PixelFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "grgb" => Ok(Self::Grgb),
            "rgb24" | "rgb" => Ok(Self::Rgb24),
            "rgba32" | "rgba" => Ok(Self::Rgba32),
            "uyvy" => Ok(Self::Uyvy),
            "ayuv" => Ok(Self::Ayuv),
            "i420" | "yuv420p" => Ok(Self::I420),
            other => Err(format!("unknown pixel format: {other}")),
        }
    }
}

/// Rotation applied when repacking a frame, clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    None,
    Quarter,
    Half,
    ThreeQuarter,
}

impl Rotation {
    /// Map a degree value (the transport's rotation hint) to a rotation.
    pub fn from_degrees(degrees: u32) -> Option<Self> {
        match degrees % 360 {
            0 => Some(Self::None),
            90 => Some(Self::Quarter),
            180 => Some(Self::Half),
            270 => Some(Self::ThreeQuarter),
            _ => None,
        }
    }

    pub fn degrees(self) -> u32 {
        match self {
            Self::None => 0,
            Self::Quarter => 90,
            Self::Half => 180,
            Self::ThreeQuarter => 270,
        }
    }

    /// Whether this rotation swaps width and height.
    pub fn swaps_axes(self) -> bool {
        matches!(self, Self::Quarter | Self::ThreeQuarter)
    }
}

/// An owned raw frame: dimensions, format, and exactly-sized pixel data.
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    format: PixelFormat,
    data: Bytes,
}

impl PixelBuffer {
    /// Build a buffer, validating length and dimension parity.
    pub fn new(
        width: u32,
        height: u32,
        format: PixelFormat,
        data: impl Into<Bytes>,
    ) -> Result<Self> {
        let data = data.into();

        if format.requires_even_dimensions() && (width % 2 != 0 || height % 2 != 0) {
            return Err(PixelError::OddDimensions {
                format,
                width,
                height,
            });
        }

        let expected = format.buffer_len(width, height);
        if data.len() != expected {
            return Err(PixelError::LengthMismatch {
                format,
                width,
                height,
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            format,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume the buffer and return the raw bytes.
    pub fn into_data(self) -> Bytes {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_lengths_per_format() {
        assert_eq!(PixelFormat::Grgb.buffer_len(4, 2), 32);
        assert_eq!(PixelFormat::Rgb24.buffer_len(4, 2), 24);
        assert_eq!(PixelFormat::Rgba32.buffer_len(4, 2), 32);
        assert_eq!(PixelFormat::Uyvy.buffer_len(4, 2), 16);
        assert_eq!(PixelFormat::Ayuv.buffer_len(4, 2), 32);
        assert_eq!(PixelFormat::I420.buffer_len(4, 2), 12);
    }

    #[test]
    fn constructor_validates_length() {
        let err = PixelBuffer::new(4, 2, PixelFormat::Rgb24, vec![0u8; 10]).unwrap_err();
        assert!(matches!(
            err,
            PixelError::LengthMismatch {
                expected: 24,
                actual: 10,
                ..
            }
        ));
    }

    #[test]
    fn constructor_rejects_odd_chroma_dimensions() {
        let err = PixelBuffer::new(3, 2, PixelFormat::Uyvy, vec![0u8; 12]).unwrap_err();
        assert!(matches!(err, PixelError::OddDimensions { .. }));

        let err = PixelBuffer::new(4, 3, PixelFormat::I420, vec![0u8; 18]).unwrap_err();
        assert!(matches!(err, PixelError::OddDimensions { .. }));
    }

    #[test]
    fn odd_dimensions_fine_for_full_chroma_formats() {
        assert!(PixelBuffer::new(3, 3, PixelFormat::Rgba32, vec![0u8; 36]).is_ok());
        assert!(PixelBuffer::new(3, 3, PixelFormat::Ayuv, vec![0u8; 36]).is_ok());
    }

    #[test]
    fn rotation_from_degrees() {
        assert_eq!(Rotation::from_degrees(0), Some(Rotation::None));
        assert_eq!(Rotation::from_degrees(90), Some(Rotation::Quarter));
        assert_eq!(Rotation::from_degrees(180), Some(Rotation::Half));
        assert_eq!(Rotation::from_degrees(270), Some(Rotation::ThreeQuarter));
        assert_eq!(Rotation::from_degrees(360), Some(Rotation::None));
        assert_eq!(Rotation::from_degrees(45), None);
    }

    #[test]
    fn format_parsing() {
        assert_eq!("UYVY".parse::<PixelFormat>().unwrap(), PixelFormat::Uyvy);
        assert_eq!("rgba".parse::<PixelFormat>().unwrap(), PixelFormat::Rgba32);
        assert!("bgr".parse::<PixelFormat>().is_err());
    }
}
