use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Canvas, Fps, FrameIndex, FrameRange};
use crate::foundation::error::{FadioError, FadioResult};
use crate::frame::raster::{FrameRgb8, Raster};
use crate::frame::set::InputFrameSet;
use crate::kernel::weights::{KernelParams, WeightVector};
use crate::progress::observer::ProgressObserver;
use crate::render::blend::{BlendOpts, synthesize_into};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;

/// Options controlling [`MorphSession`] rendering.
#[derive(Clone, Debug)]
pub struct MorphSessionOpts {
    /// Gaussian spread of each input's influence on the `[0, 1]` timeline.
    pub influence_width: f64,
    /// Output frame rate passed to the sink.
    pub fps: Fps,
    /// Frames synthesized ahead of the sink. `0` runs a strictly sequential loop.
    pub lookahead: usize,
    /// Blend each frame with rayon row parallelism on a dedicated pool.
    pub parallel: bool,
    /// Override the number of rayon worker threads. `None` uses rayon defaults.
    pub threads: Option<usize>,
}

impl Default for MorphSessionOpts {
    fn default() -> Self {
        Self {
            influence_width: 0.07,
            fps: Fps::default(),
            lookahead: 0,
            parallel: false,
            threads: None,
        }
    }
}

/// Shared flag checked between frames to stop a render early.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create an un-cancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. The frame being written is finished first.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// `true` once [`CancelToken::cancel`] has been called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Render statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Output length requested.
    pub frames_total: u64,
    /// Frames fully written to the sink.
    pub frames_written: u64,
    /// `true` when the render stopped early because of a [`CancelToken`].
    pub cancelled: bool,
}

/// A validated morph run: input frames plus kernel parameters.
///
/// Construction checks every kernel precondition, so configuration errors surface before the
/// sink is opened.
pub struct MorphSession {
    frames: InputFrameSet,
    params: KernelParams,
    opts: MorphSessionOpts,
    pool: Option<rayon::ThreadPool>,
}

impl MorphSession {
    /// Create a session producing `length` output frames from `frames`.
    pub fn new(frames: InputFrameSet, length: u64, opts: MorphSessionOpts) -> FadioResult<Self> {
        let params = KernelParams::new(length, frames.len(), opts.influence_width);
        params.validate()?;
        let pool = if opts.parallel {
            Some(build_thread_pool(opts.threads)?)
        } else {
            None
        };
        Ok(Self {
            frames,
            params,
            opts,
            pool,
        })
    }

    /// Kernel parameters of this run.
    pub fn params(&self) -> KernelParams {
        self.params
    }

    /// Output dimensions.
    pub fn canvas(&self) -> Canvas {
        self.frames.canvas()
    }

    /// The input frames.
    pub fn frames(&self) -> &InputFrameSet {
        &self.frames
    }

    /// Weights for output frame `idx`.
    pub fn weights(&self, idx: FrameIndex) -> FadioResult<WeightVector> {
        self.params.weights_at(idx)
    }

    /// Synthesize a single output frame.
    pub fn render_frame(&self, idx: FrameIndex) -> FadioResult<FrameRgb8> {
        let canvas = self.canvas();
        let mut scratch = Raster::zeroed(canvas.width, canvas.height);
        self.blend_frame(idx, &mut scratch)?;
        Ok(scratch.to_rgb8())
    }

    /// Render every output frame into `sink`, in order.
    ///
    /// `sink.end` is always called once `sink.begin` has succeeded, so the sink's stream is
    /// released before any error is returned. When the loop and `end` both fail, the loop's
    /// error wins.
    #[tracing::instrument(
        skip_all,
        fields(frames = self.params.frame_count, inputs = self.params.weight_count)
    )]
    pub fn render(
        &self,
        sink: &mut dyn FrameSink,
        progress: &mut dyn ProgressObserver,
        cancel: &CancelToken,
    ) -> FadioResult<RenderStats> {
        let canvas = self.canvas();
        sink.begin(SinkConfig {
            width: canvas.width,
            height: canvas.height,
            fps: self.opts.fps,
        })?;

        let loop_res = if self.opts.lookahead == 0 {
            self.run_sequential(sink, progress, cancel)
        } else {
            self.run_pipelined(sink, progress, cancel)
        };
        progress.finish();
        let end_res = sink.end();

        match (loop_res, end_res) {
            (Ok(stats), Ok(())) => {
                if stats.cancelled {
                    tracing::info!(written = stats.frames_written, "render cancelled");
                }
                Ok(stats)
            }
            (Ok(_), Err(e)) => Err(e),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(end_err)) => {
                tracing::warn!("closing the sink after a failed render also failed: {end_err}");
                Err(e)
            }
        }
    }

    fn run_sequential(
        &self,
        sink: &mut dyn FrameSink,
        progress: &mut dyn ProgressObserver,
        cancel: &CancelToken,
    ) -> FadioResult<RenderStats> {
        let total = self.params.frame_count;
        let canvas = self.canvas();
        let mut stats = RenderStats {
            frames_total: total,
            ..RenderStats::default()
        };
        let mut scratch = Raster::zeroed(canvas.width, canvas.height);
        let mut out = scratch.to_rgb8();

        for idx in FrameRange::with_len(total).iter() {
            if cancel.is_cancelled() {
                stats.cancelled = true;
                break;
            }
            let weights = self.blend_frame(idx, &mut scratch)?;
            scratch.to_rgb8_into(&mut out);
            progress.on_frame(idx, total, &weights);
            sink.push_frame(idx, &out)?;
            stats.frames_written += 1;
            tracing::debug!(frame = idx.0, "frame written");
        }
        Ok(stats)
    }

    fn run_pipelined(
        &self,
        sink: &mut dyn FrameSink,
        progress: &mut dyn ProgressObserver,
        cancel: &CancelToken,
    ) -> FadioResult<RenderStats> {
        let total = self.params.frame_count;
        let canvas = self.canvas();

        // Single producer, single consumer: the channel's FIFO order is the output order.
        std::thread::scope(|scope| -> FadioResult<RenderStats> {
            let (tx, rx) = mpsc::sync_channel::<FrameMsg>(self.opts.lookahead);

            let producer = scope.spawn(move || -> FadioResult<()> {
                let mut scratch = Raster::zeroed(canvas.width, canvas.height);
                for idx in FrameRange::with_len(total).iter() {
                    if cancel.is_cancelled() {
                        break;
                    }
                    let weights = self.blend_frame(idx, &mut scratch)?;
                    let msg = FrameMsg {
                        idx,
                        weights,
                        frame: scratch.to_rgb8(),
                    };
                    if tx.send(msg).is_err() {
                        // Consumer stopped; its result carries the reason.
                        break;
                    }
                }
                Ok(())
            });

            let mut stats = RenderStats {
                frames_total: total,
                ..RenderStats::default()
            };
            let consume_res = consume_frames(&rx, sink, progress, cancel, total, &mut stats);
            drop(rx);

            let produce_res = producer
                .join()
                .map_err(|_| FadioError::Other(anyhow::anyhow!("synthesis thread panicked")))?;

            consume_res?;
            produce_res?;
            stats.cancelled = stats.frames_written < total && cancel.is_cancelled();
            Ok(stats)
        })
    }

    fn blend_frame(&self, idx: FrameIndex, scratch: &mut Raster) -> FadioResult<WeightVector> {
        let weights = self.params.weights_at(idx)?;
        match self.pool.as_ref() {
            Some(pool) => pool.install(|| {
                synthesize_into(scratch, &weights, &self.frames, BlendOpts { parallel: true })
            })?,
            None => synthesize_into(scratch, &weights, &self.frames, BlendOpts::default())?,
        }
        Ok(weights)
    }
}

#[derive(Debug)]
struct FrameMsg {
    idx: FrameIndex,
    weights: WeightVector,
    frame: FrameRgb8,
}

fn consume_frames(
    rx: &mpsc::Receiver<FrameMsg>,
    sink: &mut dyn FrameSink,
    progress: &mut dyn ProgressObserver,
    cancel: &CancelToken,
    total: u64,
    stats: &mut RenderStats,
) -> FadioResult<()> {
    for msg in rx.iter() {
        if cancel.is_cancelled() {
            break;
        }
        progress.on_frame(msg.idx, total, &msg.weights);
        sink.push_frame(msg.idx, &msg.frame)?;
        stats.frames_written += 1;
        tracing::debug!(frame = msg.idx.0, "frame written");
    }
    Ok(())
}

fn build_thread_pool(threads: Option<usize>) -> FadioResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(FadioError::configuration(
            "'threads' must be >= 1 when set",
        ));
    }
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| FadioError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/session/morph_session.rs"]
mod tests;
