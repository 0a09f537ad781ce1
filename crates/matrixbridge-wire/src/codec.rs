use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{Result, WireError};

/// Chunk prefix: 4-byte ASCII tag + 4-byte little-endian header size.
pub const CHUNK_PREFIX_SIZE: usize = 8;

/// Frame tag: "JMTX".
pub const FRAME_TAG: [u8; 4] = *b"JMTX";

/// The embedded copy of the tag is byte-reversed on the wire (legacy
/// byte-order artifact kept for compatibility).
pub const EMBEDDED_TAG: [u8; 4] = *b"XTMJ";

/// Fixed size of the matrix header body that follows the chunk prefix.
pub const HEADER_BODY_SIZE: usize = 288;

/// Total bytes before the payload: chunk prefix + header body.
pub const PACKET_PREFIX_SIZE: usize = CHUNK_PREFIX_SIZE + HEADER_BODY_SIZE;

/// Number of dimension slots carried by every header.
pub const MAX_DIMS: usize = 32;

/// Default maximum payload size: 16 MiB.
pub const DEFAULT_MAX_PAYLOAD: usize = 16 * 1024 * 1024;

/// Default sanity ceiling for the header-size field.
pub const DEFAULT_MAX_HEADER: usize = 4096;

/// Cell element type of a matrix frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum MatrixElement {
    Char = 0,
    Long = 1,
    Float32 = 2,
    Float64 = 3,
}

impl MatrixElement {
    /// Map the on-wire type code, `None` for unknown codes.
    pub fn from_wire(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::Char),
            1 => Some(Self::Long),
            2 => Some(Self::Float32),
            3 => Some(Self::Float64),
            _ => None,
        }
    }
}

/// Parsed matrix-frame header.
///
/// Only `dims[..dim_count]` (and the matching strides) are meaningful;
/// the remaining slots are padding fixed at 1.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixHeader {
    pub plane_count: u32,
    pub element_type: MatrixElement,
    pub dim_count: u32,
    pub dims: [i32; MAX_DIMS],
    pub dim_strides: [i32; MAX_DIMS],
    pub data_size: u32,
    pub capture_time: f64,
}

impl MatrixHeader {
    /// Build a header for a 2D char matrix (the layout every video frame
    /// in this protocol uses).
    ///
    /// `width` counts matrix cells per row, each cell `plane_count` bytes.
    pub fn char_matrix(plane_count: u32, width: u32, height: u32, capture_time: f64) -> Self {
        let mut dims = [1i32; MAX_DIMS];
        let mut dim_strides = [1i32; MAX_DIMS];
        dims[0] = width as i32;
        dims[1] = height as i32;
        dim_strides[0] = plane_count as i32;
        dim_strides[1] = (plane_count * width) as i32;

        Self {
            plane_count,
            element_type: MatrixElement::Char,
            dim_count: 2,
            dims,
            dim_strides,
            data_size: plane_count * width * height,
            capture_time,
        }
    }

    /// First meaningful dimension (cells per row).
    pub fn width(&self) -> u32 {
        self.dims[0].max(0) as u32
    }

    /// Second meaningful dimension (rows).
    pub fn height(&self) -> u32 {
        self.dims[1].max(0) as u32
    }
}

/// One complete matrix frame extracted from the stream.
///
/// `payload` is copied out of the decoder's accumulation buffer; holding
/// it does not pin any decoder state. `server_start` is the decoder's
/// monotonic millisecond stamp taken when the chunk that completed this
/// packet arrived.
#[derive(Debug, Clone)]
pub struct MatrixPacket {
    pub header: MatrixHeader,
    pub payload: Bytes,
    pub server_start: f64,
}

/// Limits applied while decoding.
#[derive(Debug, Clone)]
pub struct WireConfig {
    /// Maximum payload size in bytes. Default: 16 MiB.
    pub max_payload_size: usize,
    /// Sanity ceiling for the header-size field. Default: 4 KiB.
    pub max_header_size: usize,
}

impl Default for WireConfig {
    fn default() -> Self {
        Self {
            max_payload_size: DEFAULT_MAX_PAYLOAD,
            max_header_size: DEFAULT_MAX_HEADER,
        }
    }
}

/// Outcome of a single decode step.
#[derive(Debug)]
pub enum DecodeStep {
    /// A complete packet was consumed from the buffer. The stamp is left
    /// at 0; the caller owns timing.
    Complete(MatrixPacket),
    /// Not enough buffered bytes; wait for more data.
    NeedMore,
    /// Framing was lost; `consumed` garbage bytes were dropped from the
    /// buffer and `remaining` more must be dropped as they arrive.
    Skipped { consumed: usize, remaining: usize },
}

/// Run one decode step against the accumulation buffer.
///
/// An unexpected tag is a synchronization loss, not an error: the whole
/// presumed chunk (`8 + headerSize` bytes, the size clamped to the header
/// ceiling) is skipped so a long-lived connection survives garbage. Only
/// a tagged header or payload length above the configured ceiling is
/// fatal, to bound memory on a corrupt stream.
pub fn decode_step(src: &mut BytesMut, config: &WireConfig) -> Result<DecodeStep> {
    if src.len() < CHUNK_PREFIX_SIZE {
        return Ok(DecodeStep::NeedMore);
    }

    let tag_matches = src[0..4] == FRAME_TAG;
    let header_size = u32::from_le_bytes(src[4..8].try_into().expect("4-byte slice")) as usize;

    if tag_matches && header_size > config.max_header_size {
        return Err(WireError::OversizedHeader {
            size: header_size,
            max: config.max_header_size,
        });
    }

    // Tag mismatch, or a tag with a header size the fixed layout below
    // cannot describe: skip the presumed chunk and keep scanning. On a
    // mismatch the length field is itself garbage, so the skip is
    // clamped to the header ceiling.
    if !tag_matches || header_size != HEADER_BODY_SIZE {
        let skip = CHUNK_PREFIX_SIZE + header_size.min(config.max_header_size);
        let consumed = skip.min(src.len());
        src.advance(consumed);
        return Ok(DecodeStep::Skipped {
            consumed,
            remaining: skip - consumed,
        });
    }

    if src.len() < PACKET_PREFIX_SIZE {
        return Ok(DecodeStep::NeedMore);
    }

    let data_size =
        u32::from_be_bytes(src[284..288].try_into().expect("4-byte slice")) as usize;
    if data_size > config.max_payload_size {
        return Err(WireError::OversizedPayload {
            size: data_size,
            max: config.max_payload_size,
        });
    }

    if src.len() < PACKET_PREFIX_SIZE + data_size {
        return Ok(DecodeStep::NeedMore);
    }

    let element_code = u32::from_be_bytes(src[20..24].try_into().expect("4-byte slice"));
    let Some(element_type) = MatrixElement::from_wire(element_code) else {
        // Unknown element code: the chunk length is still trustworthy, so
        // resync past it rather than emitting an unusable packet.
        let skip = PACKET_PREFIX_SIZE + data_size;
        src.advance(skip);
        return Ok(DecodeStep::Skipped {
            consumed: skip,
            remaining: 0,
        });
    };

    let plane_count = u32::from_be_bytes(src[16..20].try_into().expect("4-byte slice"));
    let dim_count = u32::from_be_bytes(src[24..28].try_into().expect("4-byte slice"));

    let mut dims = [0i32; MAX_DIMS];
    let mut dim_strides = [0i32; MAX_DIMS];
    for i in 0..MAX_DIMS {
        let at = 28 + i * 4;
        dims[i] = i32::from_be_bytes(src[at..at + 4].try_into().expect("4-byte slice"));
        let at = 156 + i * 4;
        dim_strides[i] = i32::from_be_bytes(src[at..at + 4].try_into().expect("4-byte slice"));
    }

    let capture_time =
        f64::from_be_bytes(src[288..296].try_into().expect("8-byte slice"));

    src.advance(PACKET_PREFIX_SIZE);
    let payload = src.split_to(data_size).freeze();

    Ok(DecodeStep::Complete(MatrixPacket {
        header: MatrixHeader {
            plane_count,
            element_type,
            dim_count,
            dims,
            dim_strides,
            data_size: data_size as u32,
            capture_time,
        },
        payload,
        server_start: 0.0,
    }))
}

/// Serialize one packet. Exact inverse of [`decode_step`]: no delimiter
/// follows the payload, the next tag begins immediately.
pub fn encode_packet(header: &MatrixHeader, payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    if payload.len() > u32::MAX as usize {
        return Err(WireError::OversizedPayload {
            size: payload.len(),
            max: u32::MAX as usize,
        });
    }

    dst.reserve(PACKET_PREFIX_SIZE + payload.len());
    dst.put_slice(&FRAME_TAG);
    dst.put_u32_le(HEADER_BODY_SIZE as u32);
    dst.put_slice(&EMBEDDED_TAG);
    dst.put_i32(HEADER_BODY_SIZE as i32);
    dst.put_u32(header.plane_count);
    dst.put_u32(header.element_type as u32);
    dst.put_u32(header.dim_count);
    for dim in &header.dims {
        dst.put_i32(*dim);
    }
    for stride in &header.dim_strides {
        dst.put_i32(*stride);
    }
    dst.put_u32(payload.len() as u32);
    dst.put_f64(header.capture_time);
    dst.put_slice(payload);
    Ok(())
}
