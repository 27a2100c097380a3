use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "fadio", version, about = "Morph still images into a video")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render an MP4 video (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Render a single output frame as a PNG.
    Frame(FrameArgs),
    /// Print the blend weights of output frames as JSON lines.
    Weights(WeightsArgs),
}

#[derive(Args, Debug)]
struct MorphArgs {
    /// Input image files, in timeline order unless `--sort-input` is given.
    #[arg(short = 'i', long = "input", num_args = 1.., required = true)]
    inputs: Vec<PathBuf>,

    /// Sort input paths lexicographically.
    #[arg(short = 's', long)]
    sort_input: bool,

    /// Length of the output in frames.
    #[arg(short = 'l', long)]
    length: u64,

    /// Width of each input's influence zone (the larger, the blendier the output).
    #[arg(long, default_value_t = 0.07)]
    influence_width: f64,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    morph: MorphArgs,

    /// Output MP4 path.
    #[arg(short = 'o', long)]
    output: PathBuf,

    /// Output frame rate.
    #[arg(short = 'r', long, default_value_t = 24)]
    frame_rate: u32,

    /// Refuse to replace an existing output file.
    #[arg(long, default_value_t = false)]
    no_overwrite: bool,

    /// Frames synthesized ahead of the encoder (0 = strictly sequential).
    #[arg(long, default_value_t = 0)]
    lookahead: usize,

    /// Blend each frame with row-level parallelism.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,

    /// Do not print the progress line.
    #[arg(short = 'q', long, default_value_t = false)]
    quiet: bool,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    morph: MorphArgs,

    /// Output frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(short = 'o', long)]
    output: PathBuf,
}

#[derive(Args, Debug)]
struct WeightsArgs {
    /// Number of input frames.
    #[arg(short = 'n', long)]
    count: usize,

    /// Length of the output in frames.
    #[arg(short = 'l', long)]
    length: u64,

    /// Width of each input's influence zone.
    #[arg(long, default_value_t = 0.07)]
    influence_width: f64,

    /// Only print this output frame.
    #[arg(long)]
    frame: Option<u64>,
}

#[derive(serde::Serialize)]
struct WeightsLine<'a> {
    frame: u64,
    weights: &'a fadio::WeightVector,
    sparkline: String,
}

/// Exit status of a render stopped by SIGINT (128 + 2).
const EXIT_INTERRUPTED: u8 = 130;

fn main() -> anyhow::Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Frame(args) => cmd_frame(args).map(|()| ExitCode::SUCCESS),
        Command::Weights(args) => cmd_weights(args).map(|()| ExitCode::SUCCESS),
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open_session(
    morph: &MorphArgs,
    opts: fadio::MorphSessionOpts,
) -> anyhow::Result<fadio::MorphSession> {
    let frames = fadio::load_input_frames(
        &morph.inputs,
        &fadio::LoadOpts {
            sort_input: morph.sort_input,
        },
    )?;
    let sess = fadio::MorphSession::new(
        frames,
        morph.length,
        fadio::MorphSessionOpts {
            influence_width: morph.influence_width,
            ..opts
        },
    )?;
    Ok(sess)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<ExitCode> {
    if !fadio::is_ffmpeg_on_path() {
        anyhow::bail!("ffmpeg is required for MP4 encoding, but was not found on PATH");
    }

    let cancel = fadio::CancelToken::new();
    {
        let cancel = cancel.clone();
        ctrlc::set_handler(move || cancel.cancel()).context("install Ctrl-C handler")?;
    }

    let opts = fadio::MorphSessionOpts {
        fps: fadio::Fps::new(args.frame_rate, 1)?,
        lookahead: args.lookahead,
        parallel: args.parallel,
        threads: args.threads,
        ..fadio::MorphSessionOpts::default()
    };
    let sess = open_session(&args.morph, opts)?;

    let mut sink_opts = fadio::FfmpegSinkOpts::new(&args.output);
    sink_opts.overwrite = !args.no_overwrite;
    let mut sink = fadio::FfmpegSink::new(sink_opts);

    let stats = if args.quiet {
        sess.render(&mut sink, &mut fadio::NoProgress, &cancel)?
    } else {
        let mut progress = fadio::TerminalProgress::new(std::io::stderr());
        sess.render(&mut sink, &mut progress, &cancel)?
    };

    if stats.cancelled {
        eprintln!(
            "cancelled: wrote {} ({} of {} frames)",
            args.output.display(),
            stats.frames_written,
            stats.frames_total
        );
        return Ok(ExitCode::from(EXIT_INTERRUPTED));
    }

    eprintln!(
        "wrote {} ({} frames)",
        args.output.display(),
        stats.frames_written
    );
    Ok(ExitCode::SUCCESS)
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let sess = open_session(&args.morph, fadio::MorphSessionOpts::default())?;
    let frame = sess.render_frame(fadio::FrameIndex(args.frame))?;

    if let Some(parent) = args.output.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        &args.output,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgb8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.output.display()))?;

    eprintln!("wrote {}", args.output.display());
    Ok(())
}

fn cmd_weights(args: WeightsArgs) -> anyhow::Result<()> {
    let params = fadio::KernelParams::new(args.length, args.count, args.influence_width);
    params.validate()?;

    let frames: Vec<u64> = match args.frame {
        Some(f) => vec![f],
        None => (0..args.length).collect(),
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for f in frames {
        let weights = params.weights_at(fadio::FrameIndex(f))?;
        let line = WeightsLine {
            frame: f,
            sparkline: fadio::progress::sparkline::render_default_sparkline(weights.as_slice()),
            weights: &weights,
        };
        serde_json::to_writer(&mut out, &line).context("write weights json")?;
        use std::io::Write as _;
        writeln!(out).context("write weights json")?;
    }
    Ok(())
}
