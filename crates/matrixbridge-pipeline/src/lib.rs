//! Per-connection frame pipeline for the matrix-video bridge.
//!
//! Wires the streaming decoder to the pixel conversion engine and a
//! frame sink: incoming matrix packets are decoded, acknowledged with a
//! timing record, rate-limited, converted, and delivered in order. The
//! reverse path repacks planar frames into matrix packets for the
//! legacy socket, and a detection side channel routes inference reports
//! from the peer transport to an injected outlet.

pub mod config;
pub mod detection;
pub mod error;
pub mod outbound;
pub mod pipeline;
pub mod sink;

pub use config::{PipelineConfig, DEFAULT_MAX_FRAME_RATE};
pub use detection::{
    route_data_channel_message, Detection, DetectionOutlet, DetectionReport, NullOutlet,
};
pub use error::{PipelineError, Result};
pub use outbound::{encode_outbound, outbound_packet_bytes, OutboundFrame};
pub use pipeline::Pipeline;
pub use sink::{CollectSink, FrameSink};
