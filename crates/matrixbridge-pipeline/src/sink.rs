use matrixbridge_pixel::PixelBuffer;

/// Receiver of converted frames.
///
/// Called from the thread driving [`Pipeline::feed`](crate::Pipeline::feed)
/// with strictly increasing sequence numbers; the single-threaded drive
/// loop is what guarantees delivery order.
pub trait FrameSink {
    fn on_frame(&mut self, seq: u64, frame: PixelBuffer);
}

/// Collects frames in memory. Useful for tests and one-shot tools.
#[derive(Debug, Default)]
pub struct CollectSink {
    pub frames: Vec<(u64, PixelBuffer)>,
}

impl FrameSink for CollectSink {
    fn on_frame(&mut self, seq: u64, frame: PixelBuffer) {
        self.frames.push((seq, frame));
    }
}
