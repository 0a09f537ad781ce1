use std::io::Write;
use std::time::{SystemTime, UNIX_EPOCH};

use matrixbridge_pixel::{convert, PixelBuffer, PixelFormat, Rotation};
use matrixbridge_wire::{MatrixDecoder, MatrixPacket, MatrixWriter, TimingRecord};
use tracing::{debug, warn};

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::outbound::{encode_outbound, OutboundFrame};
use crate::sink::FrameSink;

/// Per-connection frame pipeline: decode, convert, acknowledge, deliver.
///
/// One pipeline serves one legacy connection and is driven from a single
/// thread. [`feed`](Self::feed) runs the decoder to quiescence; every
/// decoded packet is acknowledged with a timing record on the writer,
/// whether or not the frame itself survives the rate ceiling and the
/// conversion. Delivered frames carry strictly increasing sequence
/// numbers.
///
/// Back-pressure is drop-not-buffer: a frame arriving inside the
/// minimum interval is discarded immediately and nothing is queued.
pub struct Pipeline<W, S> {
    decoder: MatrixDecoder,
    writer: MatrixWriter<W>,
    sink: S,
    config: PipelineConfig,
    next_seq: u64,
    last_emit_millis: Option<f64>,
    clock_base_millis: f64,
    closed: bool,
}

impl<W: Write, S: FrameSink> Pipeline<W, S> {
    /// Build a pipeline with default configuration.
    pub fn new(writer: W, sink: S) -> Self {
        Self::with_config(writer, sink, PipelineConfig::default())
    }

    /// Build a pipeline with explicit configuration.
    pub fn with_config(writer: W, sink: S, config: PipelineConfig) -> Self {
        let clock_base_millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64() * 1000.0)
            .unwrap_or(0.0);

        Self {
            decoder: MatrixDecoder::with_config(config.wire_config()),
            writer: MatrixWriter::new(writer),
            sink,
            config,
            next_seq: 0,
            last_emit_millis: None,
            clock_base_millis,
            closed: false,
        }
    }

    /// Ingest one chunk from the legacy socket and process every packet
    /// it completes.
    ///
    /// Wire faults (oversized lengths, a dead ack stream) are fatal and
    /// leave the connection to be torn down by the caller; per-frame
    /// conversion faults only drop that frame.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<()> {
        if self.closed {
            return Err(PipelineError::Closed);
        }

        self.decoder.feed(chunk)?;
        while let Some(packet) = self.decoder.try_next()? {
            self.handle_packet(packet)?;
        }
        Ok(())
    }

    fn handle_packet(&mut self, packet: MatrixPacket) -> Result<()> {
        let server_start = packet.server_start;
        let capture_time = packet.header.capture_time;

        self.process_frame(&packet);

        let client_time = if self.config.rebase_client_time {
            self.clock_base_millis + capture_time * 1000.0
        } else {
            capture_time
        };
        let record = TimingRecord::new(client_time, server_start, self.decoder.now_millis());
        self.writer.write_timing(&record)?;
        Ok(())
    }

    /// Rate-limit, convert, and deliver one frame. Failures drop the
    /// frame; the acknowledgement is the caller's concern.
    fn process_frame(&mut self, packet: &MatrixPacket) {
        let now = self.decoder.now_millis();
        let min_interval = self.config.min_interval_millis();
        if let Some(last) = self.last_emit_millis {
            if min_interval > 0.0 && now - last < min_interval {
                debug!(elapsed = now - last, min_interval, "frame above rate ceiling, dropping");
                return;
            }
        }

        let source = match self.buffer_from_packet(packet) {
            Ok(buffer) => buffer,
            Err(err) => {
                warn!(%err, "frame geometry rejected, dropping");
                return;
            }
        };

        let frame = match convert(&source, self.config.target_format, Rotation::None) {
            Ok(frame) => frame,
            Err(err) => {
                warn!(%err, "frame conversion failed, dropping");
                return;
            }
        };

        let seq = self.next_seq;
        self.next_seq += 1;
        self.last_emit_millis = Some(now);
        self.sink.on_frame(seq, frame);
    }

    /// Wrap a packet's payload as a pixel buffer of the source format.
    ///
    /// `dims[0]` counts matrix cells per row; for UYVY each 4-byte cell
    /// covers two pixels, so the pixel width doubles.
    fn buffer_from_packet(&self, packet: &MatrixPacket) -> matrixbridge_pixel::Result<PixelBuffer> {
        let format = self.config.source_format;
        let (width, height) = match format {
            PixelFormat::Uyvy => (packet.header.width() * 2, packet.header.height()),
            _ => (packet.header.width(), packet.header.height()),
        };
        PixelBuffer::new(width, height, format, packet.payload.clone())
    }

    /// Send one frame back over the legacy socket.
    pub fn send_frame(&mut self, frame: &OutboundFrame) -> Result<()> {
        if self.closed {
            return Err(PipelineError::Closed);
        }
        let (header, payload) = encode_outbound(frame)?;
        self.writer.write_packet(&header, &payload)?;
        Ok(())
    }

    /// Stop the pipeline: release the decoder's buffer and flush the
    /// writer. Further feeds fail; the sink sees nothing more.
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.decoder.close();
        self.writer.flush()?;
        Ok(())
    }

    /// Frames delivered to the sink so far.
    pub fn frames_delivered(&self) -> u64 {
        self.next_seq
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Tear the pipeline apart into its writer stream and sink.
    pub fn into_parts(self) -> (W, S) {
        (self.writer.into_inner(), self.sink)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use bytes::BytesMut;
    use matrixbridge_wire::{
        decode_record, encode_packet, MatrixHeader, WireError, TIMING_RECORD_SIZE,
    };

    use super::*;
    use crate::sink::CollectSink;

    fn grgb_packet(groups_wide: u32, height: u32, capture_time: f64) -> Vec<u8> {
        let payload: Vec<u8> = (0..groups_wide * height * 4).map(|i| i as u8).collect();
        let header = MatrixHeader::char_matrix(4, groups_wide, height, capture_time);
        let mut wire = BytesMut::new();
        encode_packet(&header, &payload, &mut wire).unwrap();
        wire.to_vec()
    }

    fn acks(stream: &[u8]) -> Vec<TimingRecord> {
        stream
            .chunks_exact(TIMING_RECORD_SIZE)
            .map(|chunk| decode_record(chunk).unwrap())
            .collect()
    }

    #[test]
    fn frame_is_decoded_converted_and_acked() {
        let mut pipeline = Pipeline::new(Cursor::new(Vec::<u8>::new()), CollectSink::default());

        pipeline.feed(&grgb_packet(2, 2, 1.5)).unwrap();

        assert_eq!(pipeline.frames_delivered(), 1);
        let (stream, sink) = pipeline.into_parts();

        let (seq, frame) = &sink.frames[0];
        assert_eq!(*seq, 0);
        assert_eq!(frame.format(), PixelFormat::Rgba32);
        assert_eq!((frame.width(), frame.height()), (4, 2));

        let acks = acks(&stream.into_inner());
        assert_eq!(acks.len(), 1);
        assert_eq!(acks[0].client_time, 1.5);
        assert!(acks[0].server_end >= acks[0].server_start);
    }

    #[test]
    fn sequence_numbers_increase_without_gaps() {
        let config = PipelineConfig::default().with_max_frame_rate(0.0);
        let mut pipeline =
            Pipeline::with_config(Cursor::new(Vec::<u8>::new()), CollectSink::default(), config);

        for t in 0..3 {
            pipeline.feed(&grgb_packet(1, 1, t as f64)).unwrap();
        }

        let (_, sink) = pipeline.into_parts();
        let seqs: Vec<u64> = sink.frames.iter().map(|(seq, _)| *seq).collect();
        assert_eq!(seqs, vec![0, 1, 2]);
    }

    #[test]
    fn rate_ceiling_drops_frames_but_still_acks() {
        let config = PipelineConfig::default().with_max_frame_rate(1.0);
        let mut pipeline =
            Pipeline::with_config(Cursor::new(Vec::<u8>::new()), CollectSink::default(), config);

        // Two packets well inside the one-second minimum interval.
        pipeline.feed(&grgb_packet(1, 1, 0.1)).unwrap();
        pipeline.feed(&grgb_packet(1, 1, 0.2)).unwrap();

        assert_eq!(pipeline.frames_delivered(), 1);
        let (stream, sink) = pipeline.into_parts();
        assert_eq!(sink.frames.len(), 1);
        assert_eq!(acks(&stream.into_inner()).len(), 2);
    }

    #[test]
    fn geometry_mismatch_drops_frame_and_continues() {
        let config = PipelineConfig::default().with_max_frame_rate(0.0);
        let mut pipeline =
            Pipeline::with_config(Cursor::new(Vec::<u8>::new()), CollectSink::default(), config);

        // Header claims 2x2 groups but carries half the bytes.
        let header = MatrixHeader::char_matrix(4, 2, 2, 0.0);
        let mut wire = BytesMut::new();
        encode_packet(&header, &[0u8; 8], &mut wire).unwrap();
        pipeline.feed(&wire).unwrap();
        pipeline.feed(&grgb_packet(1, 1, 0.0)).unwrap();

        assert_eq!(pipeline.frames_delivered(), 1);
        let (stream, sink) = pipeline.into_parts();
        assert_eq!(sink.frames.len(), 1);
        assert_eq!(acks(&stream.into_inner()).len(), 2);
    }

    #[test]
    fn rebased_client_time_is_wall_clock() {
        let config = PipelineConfig::default().with_rebase_client_time(true);
        let mut pipeline =
            Pipeline::with_config(Cursor::new(Vec::<u8>::new()), CollectSink::default(), config);

        pipeline.feed(&grgb_packet(1, 1, 2.0)).unwrap();

        let (stream, _) = pipeline.into_parts();
        let acks = acks(&stream.into_inner());
        // Unix milliseconds, far above any sender seconds clock.
        assert!(acks[0].client_time > 1.0e12);
    }

    #[test]
    fn oversized_payload_is_fatal() {
        let mut pipeline = Pipeline::new(Cursor::new(Vec::<u8>::new()), CollectSink::default());

        let mut wire = BytesMut::new();
        encode_packet(&MatrixHeader::char_matrix(4, 1, 1, 0.0), &[0; 4], &mut wire).unwrap();
        wire[284..288].copy_from_slice(&u32::MAX.to_be_bytes());

        let err = pipeline.feed(&wire).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Wire(WireError::OversizedPayload { .. })
        ));
    }

    #[test]
    fn close_stops_the_pipeline() {
        let mut pipeline = Pipeline::new(Cursor::new(Vec::<u8>::new()), CollectSink::default());
        pipeline.close().unwrap();

        assert!(matches!(
            pipeline.feed(&grgb_packet(1, 1, 0.0)),
            Err(PipelineError::Closed)
        ));
        assert!(matches!(
            pipeline.send_frame(&OutboundFrame {
                width: 2,
                height: 2,
                data: vec![0u8; 6].into(),
                rotation: Rotation::None,
                capture_time: 0.0,
            }),
            Err(PipelineError::Closed)
        ));
    }
}
