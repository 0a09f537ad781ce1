use matrixbridge_pixel::PixelError;
use matrixbridge_wire::WireError;

/// Errors surfaced by the pipeline.
///
/// Per-frame conversion failures are absorbed (the frame is dropped and
/// the stream continues); only stream-level faults reach the caller.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Wire(#[from] WireError),

    /// Outbound frame encoding failed before anything hit the wire.
    #[error(transparent)]
    Pixel(#[from] PixelError),

    /// A data-channel message was not valid JSON.
    #[error("malformed data channel message: {0}")]
    MalformedMessage(#[from] serde_json::Error),

    /// The pipeline was closed; no further chunks are accepted.
    #[error("pipeline is closed")]
    Closed,
}

pub type Result<T> = std::result::Result<T, PipelineError>;
