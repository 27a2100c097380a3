use super::*;

fn cfg(width: u32, height: u32) -> SinkConfig {
    SinkConfig {
        width,
        height,
        fps: Fps::new(24, 1).unwrap(),
    }
}

fn args_of(cmd: &Command) -> Vec<String> {
    cmd.get_args()
        .map(|a| a.to_string_lossy().into_owned())
        .collect()
}

#[test]
fn config_validation_catches_bad_values() {
    assert!(validate_sink_config(&cfg(0, 10)).is_err());
    assert!(validate_sink_config(&cfg(11, 10)).is_err());
    assert!(validate_sink_config(&cfg(10, 7)).is_err());
    assert!(
        validate_sink_config(&SinkConfig {
            width: 10,
            height: 10,
            fps: Fps { num: 0, den: 1 },
        })
        .is_err()
    );
    assert!(validate_sink_config(&cfg(10, 10)).is_ok());
}

#[test]
fn command_declares_rgb24_input_at_session_rate() {
    let opts = FfmpegSinkOpts::new("target/out.mp4");
    let args = args_of(&build_command(&opts, &cfg(64, 48)));

    let pos = |needle: &str| args.iter().position(|a| a == needle).unwrap();
    assert_eq!(args[0], "-y");
    assert_eq!(args[pos("-pix_fmt") + 1], "rgb24");
    assert_eq!(args[pos("-s") + 1], "64x48");
    assert_eq!(args[pos("-r") + 1], "24/1");
    assert!(pos("-r") < pos("-i"));
    assert_eq!(args[pos("-i") + 1], "pipe:0");
    assert_eq!(args.last().unwrap(), "target/out.mp4");
}

#[test]
fn command_respects_no_overwrite() {
    let mut opts = FfmpegSinkOpts::new("target/out.mp4");
    opts.overwrite = false;
    let args = args_of(&build_command(&opts, &cfg(2, 2)));
    assert_eq!(args[0], "-n");
}

#[test]
fn begin_rejects_odd_dimensions_before_spawning() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("target/ffmpeg_unit/odd.mp4"));
    let err = sink.begin(cfg(3, 2)).unwrap_err();
    assert!(matches!(err, FadioError::Configuration(_)));
}

#[test]
fn missing_program_is_an_encoder_error() {
    let mut opts = FfmpegSinkOpts::new("target/ffmpeg_unit/missing.mp4");
    opts.program = PathBuf::from("fadio-no-such-ffmpeg-binary");
    let mut sink = FfmpegSink::new(opts);
    let err = sink.begin(cfg(2, 2)).unwrap_err();
    assert!(matches!(err, FadioError::EncoderIo(_)));
}

#[test]
fn push_before_begin_fails() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("target/ffmpeg_unit/none.mp4"));
    let frame = FrameRgb8 {
        width: 2,
        height: 2,
        data: vec![0; 12],
    };
    assert!(sink.push_frame(FrameIndex(0), &frame).is_err());
    assert!(sink.end().is_err());
}
