use std::io::{ErrorKind, Write};

use bytes::BytesMut;

use crate::codec::{encode_packet, MatrixHeader};
use crate::error::{Result, WireError};
use crate::timing::{encode_record, TimingRecord};

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;

/// Writes matrix packets and timing acknowledgements to any `Write` stream.
pub struct MatrixWriter<T> {
    inner: T,
    buf: BytesMut,
}

impl<T: Write> MatrixWriter<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
        }
    }

    /// Encode and send one matrix packet (blocking).
    pub fn write_packet(&mut self, header: &MatrixHeader, payload: &[u8]) -> Result<()> {
        self.buf.clear();
        encode_packet(header, payload, &mut self.buf)?;
        self.write_buffered()
    }

    /// Encode and send one timing acknowledgement (blocking).
    pub fn write_timing(&mut self, record: &TimingRecord) -> Result<()> {
        self.buf.clear();
        encode_record(record, &mut self.buf);
        self.write_buffered()
    }

    fn write_buffered(&mut self) -> Result<()> {
        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => return Err(WireError::ConnectionClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(WireError::Io(err)),
            }
        }
        self.flush()
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(WireError::Io(err)),
            }
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use bytes::BytesMut;

    use super::*;
    use crate::codec::{decode_step, DecodeStep, WireConfig};
    use crate::timing::{decode_record, TIMING_RECORD_SIZE};

    #[test]
    fn written_packet_decodes() {
        let mut writer = MatrixWriter::new(Cursor::new(Vec::<u8>::new()));
        let header = MatrixHeader::char_matrix(1, 5, 1, 9.0);

        writer.write_packet(&header, b"hello").unwrap();

        let mut wire = BytesMut::from(writer.into_inner().into_inner().as_slice());
        let DecodeStep::Complete(packet) = decode_step(&mut wire, &WireConfig::default()).unwrap()
        else {
            panic!("expected complete packet");
        };
        assert_eq!(packet.payload.as_ref(), b"hello");
        assert_eq!(packet.header.capture_time, 9.0);
    }

    #[test]
    fn written_timing_record_decodes() {
        let mut writer = MatrixWriter::new(Cursor::new(Vec::<u8>::new()));
        let record = TimingRecord::new(1.0, 2.0, 3.0);

        writer.write_timing(&record).unwrap();

        let wire = writer.into_inner().into_inner();
        assert_eq!(wire.len(), TIMING_RECORD_SIZE);
        assert_eq!(decode_record(&wire).unwrap(), record);
    }

    #[test]
    fn interleaved_writes_share_one_stream() {
        let mut writer = MatrixWriter::new(Cursor::new(Vec::<u8>::new()));
        let header = MatrixHeader::char_matrix(1, 2, 1, 0.0);

        writer.write_packet(&header, b"ab").unwrap();
        writer.write_timing(&TimingRecord::new(4.0, 5.0, 6.0)).unwrap();

        let wire = writer.into_inner().into_inner();
        let mut buf = BytesMut::from(&wire[..wire.len() - TIMING_RECORD_SIZE]);
        assert!(matches!(
            decode_step(&mut buf, &WireConfig::default()).unwrap(),
            DecodeStep::Complete(_)
        ));
        let record = decode_record(&wire[wire.len() - TIMING_RECORD_SIZE..]).unwrap();
        assert_eq!(record.server_end, 6.0);
    }

    #[test]
    fn zero_write_is_connection_closed() {
        struct ZeroWriter;
        impl Write for ZeroWriter {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Ok(0)
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut writer = MatrixWriter::new(ZeroWriter);
        let err = writer
            .write_timing(&TimingRecord::new(0.0, 0.0, 0.0))
            .unwrap_err();
        assert!(matches!(err, WireError::ConnectionClosed));
    }

    #[test]
    fn interrupted_write_retries() {
        struct InterruptedOnce {
            hit: bool,
            data: Vec<u8>,
        }
        impl Write for InterruptedOnce {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                if !self.hit {
                    self.hit = true;
                    return Err(std::io::Error::from(ErrorKind::Interrupted));
                }
                self.data.extend_from_slice(buf);
                Ok(buf.len())
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut writer = MatrixWriter::new(InterruptedOnce {
            hit: false,
            data: Vec::new(),
        });
        writer.write_timing(&TimingRecord::new(1.0, 2.0, 3.0)).unwrap();
        assert_eq!(writer.into_inner().data.len(), TIMING_RECORD_SIZE);
    }
}
