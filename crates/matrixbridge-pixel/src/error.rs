use crate::format::PixelFormat;

/// Errors from pixel buffer construction and conversion.
#[derive(Debug, thiserror::Error)]
pub enum PixelError {
    /// No conversion path exists for this format pair. Callers must chain
    /// through an intermediate format; unmapped pairs are never
    /// approximated.
    #[error("no conversion from {from} to {to}")]
    UnsupportedConversion { from: PixelFormat, to: PixelFormat },

    /// Chroma-subsampled formats require even dimensions.
    #[error("{format} requires even dimensions, got {width}x{height}")]
    OddDimensions {
        format: PixelFormat,
        width: u32,
        height: u32,
    },

    /// The buffer length does not match the size implied by the
    /// dimensions and format.
    #[error("{format} buffer for {width}x{height} must be {expected} bytes, got {actual}")]
    LengthMismatch {
        format: PixelFormat,
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    /// Rotation is only defined for RGBA and packed UYVY buffers.
    #[error("rotation is not supported for {format}")]
    UnsupportedRotation { format: PixelFormat },
}

pub type Result<T> = std::result::Result<T, PixelError>;
