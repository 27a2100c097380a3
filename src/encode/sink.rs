use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{FadioError, FadioResult};
use crate::frame::raster::FrameRgb8;
use std::io::Write;

/// Configuration provided to a [`FrameSink`] at the start of a render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frames-per-second.
    pub fps: Fps,
}

impl SinkConfig {
    /// Reject zero-sized outputs.
    pub fn validate(&self) -> FadioResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(FadioError::configuration(
                "sink width/height must be non-zero",
            ));
        }
        Ok(())
    }
}

/// Sink contract for consuming synthesized frames in timeline order.
///
/// Ordering contract: `push_frame` is called in strictly increasing `FrameIndex` order, and
/// `end` is called exactly once after `begin`, including when the render stops early.
pub trait FrameSink {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> FadioResult<()>;
    /// Push one frame in strictly increasing timeline order.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRgb8) -> FadioResult<()>;
    /// Called once after the last frame is pushed, and also after a failed or cancelled render.
    /// Flushes or finalizes the output.
    fn end(&mut self) -> FadioResult<()>;
}

/// Write one frame of raw RGB bytes to `sink`.
///
/// Blocks until the whole frame has been accepted. Any failure (closed pipe, encoder exit) is
/// reported as [`FadioError::EncoderIo`].
pub fn emit(frame_bytes: &[u8], sink: &mut dyn Write) -> FadioResult<()> {
    sink.write_all(frame_bytes)
        .map_err(|e| FadioError::encoder_io(format!("failed to write frame to encoder: {e}")))
}

/// Check `idx` against the last pushed index and record it.
pub(crate) fn advance_frame_order(
    last_idx: &mut Option<FrameIndex>,
    idx: FrameIndex,
) -> FadioResult<()> {
    if let Some(last) = *last_idx
        && idx.0 <= last.0
    {
        return Err(FadioError::encoder_io(format!(
            "sink received out-of-order frame index {} after {}",
            idx.0, last.0
        )));
    }
    *last_idx = Some(idx);
    Ok(())
}

pub(crate) fn check_frame_shape(cfg: &SinkConfig, frame: &FrameRgb8) -> FadioResult<()> {
    if frame.width != cfg.width || frame.height != cfg.height {
        return Err(FadioError::shape_mismatch(format!(
            "frame size mismatch: got {}x{}, expected {}x{}",
            frame.width, frame.height, cfg.width, cfg.height
        )));
    }
    frame.validate()
}

/// Sink that streams raw, headerless RGB24 frames into any writer.
///
/// Useful for piping into an encoder that was launched elsewhere, or for writing a `.rgb` dump.
pub struct WriterSink<W: Write> {
    writer: Option<W>,
    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
    frames_written: u64,
}

impl<W: Write> WriterSink<W> {
    /// Wrap `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            writer: Some(writer),
            cfg: None,
            last_idx: None,
            frames_written: 0,
        }
    }

    /// Number of frames fully written so far.
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Return the writer once the sink has ended, or `None` if it was already taken.
    pub fn into_inner(mut self) -> Option<W> {
        self.writer.take()
    }
}

impl<W: Write> FrameSink for WriterSink<W> {
    fn begin(&mut self, cfg: SinkConfig) -> FadioResult<()> {
        cfg.validate()?;
        if self.writer.is_none() {
            return Err(FadioError::encoder_io("writer sink is already finalized"));
        }
        self.cfg = Some(cfg);
        self.last_idx = None;
        self.frames_written = 0;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRgb8) -> FadioResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| FadioError::encoder_io("writer sink not started"))?;
        advance_frame_order(&mut self.last_idx, idx)?;
        check_frame_shape(cfg, frame)?;

        let Some(writer) = self.writer.as_mut() else {
            return Err(FadioError::encoder_io("writer sink is already finalized"));
        };
        emit(&frame.data, writer)?;
        self.frames_written += 1;
        Ok(())
    }

    fn end(&mut self) -> FadioResult<()> {
        self.cfg = None;
        if let Some(writer) = self.writer.as_mut() {
            writer
                .flush()
                .map_err(|e| FadioError::encoder_io(format!("failed to flush encoder: {e}")))?;
        }
        Ok(())
    }
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    ended: bool,
    /// Frames in timeline order.
    pub(crate) frames: Vec<(FrameIndex, FrameRgb8)>,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[(FrameIndex, FrameRgb8)] {
        &self.frames
    }

    /// `true` once `end` has been called.
    pub fn ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> FadioResult<()> {
        self.cfg = Some(cfg);
        self.ended = false;
        self.frames.clear();
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRgb8) -> FadioResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> FadioResult<()> {
        self.ended = true;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
