//! Outbound path: planar I420 frames from the peer transport repacked
//! into matrix packets for the legacy socket.
//!
//! The legacy receiver expects a 2D char matrix of 4-byte cells, each
//! cell one UYVY pixel pair, so `dims[0]` is half the pixel width.

use bytes::{Bytes, BytesMut};
use matrixbridge_pixel::{i420_to_uyvy, PixelBuffer, PixelFormat, Rotation};
use matrixbridge_wire::{encode_packet, MatrixHeader};

use crate::error::Result;

/// One decoded frame headed back to the legacy socket.
#[derive(Debug, Clone)]
pub struct OutboundFrame {
    pub width: u32,
    pub height: u32,
    /// Planar I420 pixel data.
    pub data: Bytes,
    /// Clockwise rotation applied while repacking.
    pub rotation: Rotation,
    /// Capture timestamp echoed in the matrix header, in seconds.
    pub capture_time: f64,
}

/// Repack an outbound frame into a matrix header and UYVY payload.
pub fn encode_outbound(frame: &OutboundFrame) -> Result<(MatrixHeader, Bytes)> {
    let planar = PixelBuffer::new(frame.width, frame.height, PixelFormat::I420, frame.data.clone())?;
    let packed = i420_to_uyvy(&planar, frame.rotation)?;

    let header = MatrixHeader::char_matrix(
        4,
        packed.width() / 2,
        packed.height(),
        frame.capture_time,
    );
    Ok((header, packed.into_data()))
}

/// Serialize an outbound frame straight to wire bytes.
pub fn outbound_packet_bytes(frame: &OutboundFrame) -> Result<Bytes> {
    let (header, payload) = encode_outbound(frame)?;
    let mut wire = BytesMut::new();
    encode_packet(&header, &payload, &mut wire)?;
    Ok(wire.freeze())
}
