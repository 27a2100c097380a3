use crate::foundation::error::{FadioError, FadioResult};
use crate::frame::raster::Raster;
use crate::frame::set::InputFrameSet;
use crate::kernel::weights::WeightVector;
use rayon::prelude::*;

/// Options for [`synthesize_into`].
#[derive(Clone, Copy, Debug, Default)]
pub struct BlendOpts {
    /// Split the contraction by rows across the current rayon pool.
    pub parallel: bool,
}

/// Blend `frames` with `weights` into a new raster.
///
/// Every output sample is the dot product of `weights` with the matching samples of all input
/// frames, accumulated in input order.
pub fn synthesize(weights: &WeightVector, frames: &InputFrameSet) -> FadioResult<Raster> {
    let canvas = frames.canvas();
    let mut out = Raster::zeroed(canvas.width, canvas.height);
    synthesize_into(&mut out, weights, frames, BlendOpts::default())?;
    Ok(out)
}

/// Blend into an existing raster of the input dimensions.
pub fn synthesize_into(
    dst: &mut Raster,
    weights: &WeightVector,
    frames: &InputFrameSet,
    opts: BlendOpts,
) -> FadioResult<()> {
    if weights.len() != frames.len() {
        return Err(FadioError::shape_mismatch(format!(
            "got {} weights for {} input frames",
            weights.len(),
            frames.len()
        )));
    }
    let canvas = frames.canvas();
    if dst.canvas() != canvas {
        return Err(FadioError::shape_mismatch(format!(
            "destination raster is {}x{}, input frames are {}x{}",
            dst.width(),
            dst.height(),
            canvas.width,
            canvas.height
        )));
    }

    let w = weights.as_slice();
    let src = frames.frames();
    let row_len = (canvas.width as usize) * 3;

    if opts.parallel {
        dst.samples_mut()
            .par_chunks_mut(row_len)
            .enumerate()
            .for_each(|(y, row)| blend_span(row, w, src, y * row_len));
    } else {
        blend_span(dst.samples_mut(), w, src, 0);
    }
    Ok(())
}

fn blend_span(dst: &mut [f64], weights: &[f64], frames: &[Raster], offset: usize) {
    dst.fill(0.0);
    let end = offset + dst.len();
    for (w, f) in weights.iter().zip(frames) {
        for (d, s) in dst.iter_mut().zip(&f.samples()[offset..end]) {
            *d += w * s;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/blend.rs"]
mod tests;
