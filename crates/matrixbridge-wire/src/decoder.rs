use std::time::Instant;

use bytes::{Buf, BytesMut};
use tracing::debug;

use crate::codec::{decode_step, DecodeStep, MatrixPacket, WireConfig};
use crate::error::{Result, WireError};

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;

/// Stateful streaming decoder for one connection.
///
/// Bytes arrive in arbitrary chunks via [`feed`](Self::feed); complete
/// packets are drained with [`try_next`](Self::try_next). The decoder
/// never blocks: partial frames stay buffered until more data arrives.
///
/// Each drained packet carries `server_start`, the monotonic millisecond
/// stamp of the feed call that completed it (the timing channel's
/// processing-start anchor).
pub struct MatrixDecoder {
    buf: BytesMut,
    config: WireConfig,
    epoch: Instant,
    last_feed_millis: f64,
    pending_skip: usize,
    closed: bool,
}

impl Default for MatrixDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl MatrixDecoder {
    /// Create a decoder with default limits.
    pub fn new() -> Self {
        Self::with_config(WireConfig::default())
    }

    /// Create a decoder with explicit limits.
    pub fn with_config(config: WireConfig) -> Self {
        Self {
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
            epoch: Instant::now(),
            last_feed_millis: 0.0,
            pending_skip: 0,
            closed: false,
        }
    }

    /// Append one chunk from the byte stream.
    ///
    /// Bytes still owed to an in-progress resync skip are discarded here
    /// without ever touching the accumulation buffer.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<()> {
        if self.closed {
            return Err(WireError::DecoderClosed);
        }
        self.last_feed_millis = self.now_millis();

        let mut chunk = chunk;
        if self.pending_skip > 0 {
            let n = self.pending_skip.min(chunk.len());
            self.pending_skip -= n;
            chunk = &chunk[n..];
            if self.pending_skip > 0 {
                debug!(remaining = self.pending_skip, "resync skip continues");
                return Ok(());
            }
        }

        self.buf.extend_from_slice(chunk);
        Ok(())
    }

    /// Drain the next complete packet, if one is buffered.
    ///
    /// Runs decode steps until a packet is produced or the buffer runs
    /// dry; resync skips are absorbed silently. Call in a loop after each
    /// [`feed`](Self::feed) to reach quiescence.
    pub fn try_next(&mut self) -> Result<Option<MatrixPacket>> {
        if self.closed {
            return Ok(None);
        }

        loop {
            match decode_step(&mut self.buf, &self.config)? {
                DecodeStep::Complete(mut packet) => {
                    packet.server_start = self.last_feed_millis;
                    return Ok(Some(packet));
                }
                DecodeStep::NeedMore => return Ok(None),
                DecodeStep::Skipped {
                    consumed,
                    remaining,
                } => {
                    debug!(consumed, remaining, "framing lost, resynchronizing");
                    if remaining > 0 {
                        // Partial skip: the rest is discarded as it arrives.
                        let drop_now = remaining.min(self.buf.len());
                        self.buf.advance(drop_now);
                        self.pending_skip = remaining - drop_now;
                        if self.pending_skip > 0 {
                            return Ok(None);
                        }
                    }
                }
            }
        }
    }

    /// Milliseconds elapsed on this decoder's monotonic clock.
    pub fn now_millis(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64() * 1000.0
    }

    /// Release the accumulation buffer and stop decoding.
    ///
    /// Subsequent feeds fail with [`WireError::DecoderClosed`];
    /// `try_next` yields nothing.
    pub fn close(&mut self) {
        self.closed = true;
        self.buf = BytesMut::new();
        self.pending_skip = 0;
    }

    /// Whether the decoder has been closed.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Bytes currently buffered while waiting for a complete frame.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }
}
