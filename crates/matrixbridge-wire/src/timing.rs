//! Round-trip timing acknowledgement records.
//!
//! After every decoded frame the bridge writes one fixed 28-byte record
//! back on the originating connection: a 4-byte tag followed by three
//! big-endian doubles. The sender uses the three stamps to measure
//! end-to-end latency.

use bytes::{BufMut, BytesMut};

use crate::error::{Result, WireError};

/// Timing record tag: "JMLP".
pub const TIMING_TAG: [u8; 4] = *b"JMLP";

/// Total wire size: tag + three f64s.
pub const TIMING_RECORD_SIZE: usize = 4 + 8 * 3;

/// One latency acknowledgement.
///
/// `client_time` echoes the frame's embedded capture timestamp (seconds,
/// or wall-clock milliseconds if the caller re-based it); `server_start`
/// and `server_end` bracket the server-side processing of that frame in
/// monotonic milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingRecord {
    pub client_time: f64,
    pub server_start: f64,
    pub server_end: f64,
}

impl TimingRecord {
    pub fn new(client_time: f64, server_start: f64, server_end: f64) -> Self {
        Self {
            client_time,
            server_start,
            server_end,
        }
    }
}

/// Serialize a timing record into `dst`.
pub fn encode_record(record: &TimingRecord, dst: &mut BytesMut) {
    dst.reserve(TIMING_RECORD_SIZE);
    dst.put_slice(&TIMING_TAG);
    dst.put_f64(record.client_time);
    dst.put_f64(record.server_start);
    dst.put_f64(record.server_end);
}

/// Parse a timing record from the start of `src`.
///
/// Unlike the frame decoder this has no resync path: records are written
/// as discrete units, so a wrong tag or short input is simply malformed.
pub fn decode_record(src: &[u8]) -> Result<TimingRecord> {
    if src.len() < TIMING_RECORD_SIZE || src[0..4] != TIMING_TAG {
        return Err(WireError::MalformedTimingRecord);
    }

    Ok(TimingRecord {
        client_time: f64::from_be_bytes(src[4..12].try_into().expect("8-byte slice")),
        server_start: f64::from_be_bytes(src[12..20].try_into().expect("8-byte slice")),
        server_end: f64::from_be_bytes(src[20..28].try_into().expect("8-byte slice")),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(a: f64, b: f64, c: f64) {
        let mut wire = BytesMut::new();
        encode_record(&TimingRecord::new(a, b, c), &mut wire);
        assert_eq!(wire.len(), TIMING_RECORD_SIZE);

        let record = decode_record(&wire).unwrap();
        assert_eq!(record, TimingRecord::new(a, b, c));
    }

    #[test]
    fn roundtrip_simple_values() {
        roundtrip(1.5, 2.25, 3.125);
    }

    #[test]
    fn roundtrip_negative_and_extreme_values() {
        roundtrip(-1234.5678, f64::MIN, f64::MAX);
        roundtrip(0.0, -0.0, f64::EPSILON);
        roundtrip(1.7e308, -2.3e-308, 1e15 + 0.5);
    }

    #[test]
    fn wire_layout_matches_legacy_sender() {
        let mut wire = BytesMut::new();
        encode_record(&TimingRecord::new(1.0, 2.0, 3.0), &mut wire);

        assert_eq!(&wire[0..4], b"JMLP");
        assert_eq!(&wire[4..12], &1.0f64.to_be_bytes());
        assert_eq!(&wire[12..20], &2.0f64.to_be_bytes());
        assert_eq!(&wire[20..28], &3.0f64.to_be_bytes());
    }

    #[test]
    fn rejects_wrong_tag() {
        let mut wire = BytesMut::new();
        encode_record(&TimingRecord::new(1.0, 2.0, 3.0), &mut wire);
        wire[0] = b'X';

        assert!(matches!(
            decode_record(&wire),
            Err(WireError::MalformedTimingRecord)
        ));
    }

    #[test]
    fn rejects_short_input() {
        let mut wire = BytesMut::new();
        encode_record(&TimingRecord::new(1.0, 2.0, 3.0), &mut wire);

        assert!(matches!(
            decode_record(&wire[..20]),
            Err(WireError::MalformedTimingRecord)
        ));
    }
}
