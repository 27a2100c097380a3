use crate::foundation::core::Canvas;
use crate::foundation::error::{FadioError, FadioResult};
use crate::frame::raster::Raster;

/// Ordered input rasters sharing one resolution.
///
/// Built once before rendering and only ever borrowed afterwards.
#[derive(Clone, Debug)]
pub struct InputFrameSet {
    canvas: Canvas,
    frames: Vec<Raster>,
}

impl InputFrameSet {
    /// Validate that `frames` is non-empty, non-degenerate and uniformly sized.
    pub fn new(frames: Vec<Raster>) -> FadioResult<Self> {
        let Some(first) = frames.first() else {
            return Err(FadioError::configuration(
                "input frame set must contain at least one frame",
            ));
        };
        let canvas = first.canvas();
        if canvas.width == 0 || canvas.height == 0 {
            return Err(FadioError::shape_mismatch(
                "input frames must have non-zero width and height",
            ));
        }
        for (i, f) in frames.iter().enumerate() {
            if f.canvas() != canvas {
                return Err(FadioError::shape_mismatch(format!(
                    "input frame {i} is {}x{}, expected {}x{}",
                    f.width(),
                    f.height(),
                    canvas.width,
                    canvas.height
                )));
            }
        }
        Ok(Self { canvas, frames })
    }

    /// Shared frame dimensions.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Number of input frames (`N`).
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always `false` for a validated set.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frames in input order.
    pub fn frames(&self) -> &[Raster] {
        &self.frames
    }
}

#[cfg(test)]
#[path = "../../tests/unit/frame/set.rs"]
mod tests;
