use matrixbridge_pixel::PixelFormat;
use matrixbridge_wire::{WireConfig, DEFAULT_MAX_PAYLOAD};

/// Frame-rate ceiling applied when none is configured, in frames per
/// second. Matches the pacing the legacy sender patch uses.
pub const DEFAULT_MAX_FRAME_RATE: f64 = 25.0;

/// Per-connection pipeline configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Pixel format the incoming matrix payloads carry.
    pub source_format: PixelFormat,
    /// Pixel format handed to the sink.
    pub target_format: PixelFormat,
    /// Maximum accepted matrix payload, in bytes.
    pub max_payload_size: usize,
    /// Frame-rate ceiling in frames per second. Frames above the ceiling
    /// are dropped, never queued. Zero disables the ceiling.
    pub max_frame_rate: f64,
    /// Re-base the echoed capture timestamp from the sender's seconds
    /// clock to wall-clock milliseconds in timing acknowledgements.
    pub rebase_client_time: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source_format: PixelFormat::Grgb,
            target_format: PixelFormat::Rgba32,
            max_payload_size: DEFAULT_MAX_PAYLOAD,
            max_frame_rate: DEFAULT_MAX_FRAME_RATE,
            rebase_client_time: false,
        }
    }
}

impl PipelineConfig {
    pub fn with_formats(mut self, source: PixelFormat, target: PixelFormat) -> Self {
        self.source_format = source;
        self.target_format = target;
        self
    }

    pub fn with_max_payload_size(mut self, bytes: usize) -> Self {
        self.max_payload_size = bytes;
        self
    }

    pub fn with_max_frame_rate(mut self, fps: f64) -> Self {
        self.max_frame_rate = fps;
        self
    }

    pub fn with_rebase_client_time(mut self, rebase: bool) -> Self {
        self.rebase_client_time = rebase;
        self
    }

    /// Minimum milliseconds between delivered frames, or 0 when the
    /// ceiling is disabled.
    pub fn min_interval_millis(&self) -> f64 {
        if self.max_frame_rate > 0.0 {
            1000.0 / self.max_frame_rate
        } else {
            0.0
        }
    }

    /// Decoder limits implied by this configuration.
    pub fn wire_config(&self) -> WireConfig {
        WireConfig {
            max_payload_size: self.max_payload_size,
            ..WireConfig::default()
        }
    }
}
