use std::io::{ErrorKind, Read};

use crate::codec::WireConfig;
use crate::decoder::MatrixDecoder;
use crate::error::{Result, WireError};

const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Reads complete matrix packets from any `Read` stream.
///
/// Blocking counterpart to [`MatrixDecoder`] for callers that own the
/// socket read half directly; partial reads and resync are handled
/// internally, callers always get complete packets.
pub struct MatrixReader<T> {
    inner: T,
    decoder: MatrixDecoder,
}

impl<T: Read> MatrixReader<T> {
    /// Create a reader with default limits.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, WireConfig::default())
    }

    /// Create a reader with explicit limits.
    pub fn with_config(inner: T, config: WireConfig) -> Self {
        Self {
            inner,
            decoder: MatrixDecoder::with_config(config),
        }
    }

    /// Read the next complete packet (blocking).
    ///
    /// Returns `Err(WireError::ConnectionClosed)` when EOF is reached.
    pub fn read_packet(&mut self) -> Result<crate::codec::MatrixPacket> {
        loop {
            if let Some(packet) = self.decoder.try_next()? {
                return Ok(packet);
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(WireError::Io(err)),
            };

            if read == 0 {
                return Err(WireError::ConnectionClosed);
            }

            self.decoder.feed(&chunk[..read])?;
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

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}
