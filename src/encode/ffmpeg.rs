use crate::encode::sink::{
    FrameSink, SinkConfig, advance_frame_order, check_frame_shape, emit,
};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{FadioError, FadioResult};
use crate::frame::raster::FrameRgb8;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

/// Options for [`FfmpegSink`] MP4 output.
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Output MP4 file path.
    pub out_path: PathBuf,
    /// Overwrite output file if it already exists.
    pub overwrite: bool,
    /// `ffmpeg` executable to run.
    pub program: PathBuf,
}

impl FfmpegSinkOpts {
    /// Create options for outputting an MP4 to `out_path`.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            program: PathBuf::from("ffmpeg"),
        }
    }
}

/// Sink that spawns the system `ffmpeg` and streams raw RGB24 frames to its stdin.
///
/// Writes block while ffmpeg's pipe buffer is full. The child is reaped in `end`, or on drop if
/// the sink is abandoned mid-render.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,

    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
    frames_written: u64,
}

impl FfmpegSink {
    /// Create a new sink that streams into `ffmpeg`.
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            child: None,
            stdin: None,
            stderr_drain: None,
            cfg: None,
            last_idx: None,
            frames_written: 0,
        }
    }

    /// Number of frames fully written to ffmpeg so far.
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> FadioResult<()> {
        validate_sink_config(&cfg)?;

        ensure_parent_dir(&self.opts.out_path)?;
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(FadioError::configuration(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }

        let mut cmd = build_command(&self.opts, &cfg);
        tracing::info!(
            out = %self.opts.out_path.display(),
            width = cfg.width,
            height = cfg.height,
            fps = cfg.fps.as_f64(),
            "spawning ffmpeg"
        );
        let mut child = cmd.spawn().map_err(|e| {
            FadioError::encoder_io(format!(
                "failed to spawn {} (is it installed and on PATH?): {e}",
                self.opts.program.display()
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| FadioError::encoder_io("failed to open ffmpeg stdin (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| FadioError::encoder_io("failed to open ffmpeg stderr (unexpected)"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        self.cfg = Some(cfg);
        self.last_idx = None;
        self.frames_written = 0;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRgb8) -> FadioResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| FadioError::encoder_io("ffmpeg sink not started"))?;
        advance_frame_order(&mut self.last_idx, idx)?;
        check_frame_shape(cfg, frame)?;

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(FadioError::encoder_io("ffmpeg sink is already finalized"));
        };
        emit(&frame.data, stdin)?;
        self.frames_written += 1;
        Ok(())
    }

    fn end(&mut self) -> FadioResult<()> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| FadioError::encoder_io("ffmpeg sink not started"))?;

        let status = child.wait().map_err(|e| {
            FadioError::encoder_io(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| FadioError::encoder_io("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| FadioError::encoder_io(format!("ffmpeg stderr read failed: {e}")))?,
            None => Vec::new(),
        };
        self.cfg = None;

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(FadioError::encoder_io(format!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }

        tracing::info!(
            out = %self.opts.out_path.display(),
            frames = self.frames_written,
            "ffmpeg finished"
        );
        Ok(())
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            // Closing stdin lets ffmpeg finalize whatever it has received.
            if let Err(e) = child.wait() {
                tracing::warn!("failed to reap abandoned ffmpeg process: {e}");
            }
        }
        if let Some(handle) = self.stderr_drain.take() {
            let _ = handle.join();
        }
    }
}

fn validate_sink_config(cfg: &SinkConfig) -> FadioResult<()> {
    if cfg.fps.num == 0 || cfg.fps.den == 0 {
        return Err(FadioError::configuration("fps must be non-zero"));
    }
    if cfg.width == 0 || cfg.height == 0 {
        return Err(FadioError::configuration(
            "ffmpeg sink width/height must be non-zero",
        ));
    }
    if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
        return Err(FadioError::configuration(format!(
            "ffmpeg sink width/height must be even (required for yuv420p mp4 output), got {}x{}",
            cfg.width, cfg.height
        )));
    }
    Ok(())
}

fn build_command(opts: &FfmpegSinkOpts, cfg: &SinkConfig) -> Command {
    let mut cmd = Command::new(&opts.program);
    cmd.stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped());

    // Keep terminal SIGINT away from ffmpeg; the render loop stops and closes stdin instead.
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt as _;
        cmd.process_group(0);
    }

    if opts.overwrite {
        cmd.arg("-y");
    } else {
        cmd.arg("-n");
    }

    // Input: headerless rgb24 frames, one per synthesized output frame.
    cmd.args([
        "-loglevel",
        "error",
        "-f",
        "rawvideo",
        "-pix_fmt",
        "rgb24",
        "-s",
        &format!("{}x{}", cfg.width, cfg.height),
    ]);
    push_input_fps(&mut cmd, cfg.fps);
    cmd.args(["-i", "pipe:0"]);

    // Output: h264 + yuv420p for broad compatibility.
    cmd.args([
        "-an",
        "-c:v",
        "libx264",
        "-pix_fmt",
        "yuv420p",
        "-movflags",
        "+faststart",
    ]);
    cmd.arg(&opts.out_path);
    cmd
}

fn push_input_fps(cmd: &mut Command, fps: Fps) {
    // For rawvideo input, `-r` before `-i` sets the input framerate so every piped frame
    // becomes exactly one output frame.
    cmd.args(["-r", &format!("{}/{}", fps.num, fps.den)]);
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> FadioResult<()> {
    if let Some(parent) = path.parent() {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    std::process::Command::new("ffmpeg")
        .arg("-version")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
