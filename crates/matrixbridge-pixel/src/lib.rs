//! Raw frame buffers and the pixel format conversions between them.
//!
//! The crate models frames as [`PixelBuffer`] values whose byte length
//! is validated against their dimensions and [`PixelFormat`] at
//! construction, so the conversion routines can index without bounds
//! anxiety. Conversions cover the camera-side packed formats (GRGB,
//! UYVY, AYUV) and the encoder-side planar I420, plus clockwise
//! rotation of RGBA and packed UYVY buffers.

pub mod convert;
pub mod error;
pub mod format;
pub mod grgb;
pub mod rotate;
pub mod yuv;

pub use convert::{convert, supports};
pub use error::{PixelError, Result};
pub use format::{PixelBuffer, PixelFormat, Rotation};
pub use grgb::{grgb_to_rgb24, grgb_to_rgba32};
pub use rotate::{rotate_rgba, rotate_uyvy};
pub use yuv::{ayuv_to_i420, i420_to_uyvy, uyvy_to_i420};
