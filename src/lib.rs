//! fadio morphs a set of still images into a fixed-length video.
//!
//! Every output frame is a weighted blend of all input frames. Input `k` of `N` sits at
//! `k / (N - 1)` on a normalized timeline and its weight is a Gaussian bump around the output
//! frame's own position, normalized so the weights sum to 1:
//!
//! - Decode inputs with [`load_input_frames`] (or build an [`InputFrameSet`] directly)
//! - Create a [`MorphSession`]
//! - Stream frames into a [`FrameSink`], typically an [`FfmpegSink`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Input image decoding.
pub mod assets;
/// Encoding sinks.
pub mod encode;
/// Rasters and output frames.
pub mod frame;
/// Weight kernel.
pub mod kernel;
/// Progress reporting.
pub mod progress;
/// Frame synthesis.
pub mod render;
/// Session-oriented rendering API.
pub mod session;

pub use crate::foundation::core::{Canvas, Fps, FrameIndex, FrameRange};
pub use crate::foundation::error::{FadioError, FadioResult};

pub use crate::assets::decode::{LoadOpts, load_input_frames};
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig, WriterSink, emit};
pub use crate::frame::raster::{FrameRgb8, Raster};
pub use crate::frame::set::InputFrameSet;
pub use crate::kernel::weights::{KernelParams, WEIGHT_SUM_TOLERANCE, WeightVector, compute_weights};
pub use crate::progress::observer::{NoProgress, ProgressObserver, TerminalProgress};
pub use crate::progress::sparkline::{DEFAULT_LEVELS, render_sparkline};
pub use crate::render::blend::{BlendOpts, synthesize, synthesize_into};
pub use crate::session::morph_session::{CancelToken, MorphSession, MorphSessionOpts, RenderStats};
