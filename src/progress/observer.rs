use crate::foundation::core::FrameIndex;
use crate::kernel::weights::WeightVector;
use crate::progress::sparkline::{DEFAULT_LEVELS, render_sparkline};
use std::io::Write;

/// Receives one callback per frame handed to the sink, in frame order.
pub trait ProgressObserver {
    /// Called after frame `idx` of `total` has been synthesized, before it is written.
    fn on_frame(&mut self, idx: FrameIndex, total: u64, weights: &WeightVector);

    /// Called once when the render loop stops, successfully or not.
    fn finish(&mut self) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_frame(&mut self, _idx: FrameIndex, _total: u64, _weights: &WeightVector) {}
}

/// Single-line `"   i/   L [sparkline]"` status, rewritten in place with `\r`.
pub struct TerminalProgress<W: Write> {
    out: W,
    levels: Vec<char>,
}

impl<W: Write> TerminalProgress<W> {
    /// Report to `out` using [`DEFAULT_LEVELS`].
    pub fn new(out: W) -> Self {
        Self {
            out,
            levels: DEFAULT_LEVELS.chars().collect(),
        }
    }

    /// Use a custom level ramp (lowest first). Empty ramps fall back to the default.
    pub fn with_levels(mut self, levels: &str) -> Self {
        if !levels.is_empty() {
            self.levels = levels.chars().collect();
        }
        self
    }

    /// Return the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Format one status line (without the trailing `\r`).
pub fn format_progress_line(idx: FrameIndex, total: u64, sparkline: &str) -> String {
    format!("{:4}/{:4} [{}]", idx.0, total, sparkline)
}

impl<W: Write> ProgressObserver for TerminalProgress<W> {
    fn on_frame(&mut self, idx: FrameIndex, total: u64, weights: &WeightVector) {
        let spark = render_sparkline(weights.as_slice(), &self.levels).unwrap_or_default();
        // Progress output is best-effort.
        let _ = write!(self.out, "{}\r", format_progress_line(idx, total, &spark));
        let _ = self.out.flush();
    }

    fn finish(&mut self) {
        let _ = writeln!(self.out);
        let _ = self.out.flush();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/progress/observer.rs"]
mod tests;
