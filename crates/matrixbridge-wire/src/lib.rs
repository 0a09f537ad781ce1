//! Streaming codec for the Jitter matrix-frame wire protocol.
//!
//! Every frame travels as a tagged chunk:
//! - A 4-byte ASCII tag ("JMTX") plus a 4-byte little-endian header size
//! - A fixed 288-byte big-endian header describing planes, dims, strides
//! - The raw payload, with the next tag following immediately
//!
//! The decoder is lenient about framing: an unrecognized tag skips the
//! presumed chunk and keeps scanning, so a long-lived connection survives
//! garbage. Oversized length fields are fatal to bound memory.

pub mod codec;
pub mod decoder;
pub mod error;
pub mod reader;
pub mod timing;
pub mod writer;

pub use codec::{
    decode_step, encode_packet, DecodeStep, MatrixElement, MatrixHeader, MatrixPacket,
    WireConfig, DEFAULT_MAX_HEADER, DEFAULT_MAX_PAYLOAD, FRAME_TAG, HEADER_BODY_SIZE,
    PACKET_PREFIX_SIZE,
};
pub use decoder::MatrixDecoder;
pub use error::{Result, WireError};
pub use reader::MatrixReader;
pub use timing::{decode_record, encode_record, TimingRecord, TIMING_RECORD_SIZE, TIMING_TAG};
pub use writer::MatrixWriter;
