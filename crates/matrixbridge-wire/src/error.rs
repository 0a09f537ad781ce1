/// Errors that can occur while encoding or decoding matrix frames.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// The header-size field exceeds the configured sanity ceiling.
    ///
    /// A corrupt length this large cannot be resynchronized past safely;
    /// the connection must be closed.
    #[error("header size too large ({size} bytes, max {max})")]
    OversizedHeader { size: usize, max: usize },

    /// The payload length declared in the header exceeds the configured
    /// maximum. Fatal for the connection; the buffer is never allocated.
    #[error("payload too large ({size} bytes, max {max})")]
    OversizedPayload { size: usize, max: usize },

    /// A timing record had the wrong tag or was shorter than 28 bytes.
    #[error("malformed timing record")]
    MalformedTimingRecord,

    /// The decoder was fed after `close()`.
    #[error("decoder is closed")]
    DecoderClosed,

    /// An I/O error occurred while reading or writing frames.
    #[error("wire I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The connection was closed before a complete frame was received.
    #[error("connection closed (incomplete frame)")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, WireError>;
