use super::*;

fn cfg(width: u32, height: u32) -> SinkConfig {
    SinkConfig {
        width,
        height,
        fps: Fps::default(),
    }
}

fn frame(width: u32, height: u32, v: u8) -> FrameRgb8 {
    FrameRgb8 {
        width,
        height,
        data: vec![v; (width * height * 3) as usize],
    }
}

struct ClosedPipe;

impl Write for ClosedPipe {
    fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
        Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe))
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn emit_writes_all_bytes() {
    let mut out = Vec::new();
    emit(&[1, 2, 3, 4, 5, 6], &mut out).unwrap();
    assert_eq!(out, vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn emit_reports_broken_pipe_as_encoder_io() {
    let err = emit(&[0; 12], &mut ClosedPipe).unwrap_err();
    assert!(matches!(err, FadioError::EncoderIo(_)));
}

#[test]
fn writer_sink_concatenates_frames_in_order() {
    let mut sink = WriterSink::new(Vec::new());
    sink.begin(cfg(2, 1)).unwrap();
    sink.push_frame(FrameIndex(0), &frame(2, 1, 7)).unwrap();
    sink.push_frame(FrameIndex(1), &frame(2, 1, 9)).unwrap();
    sink.end().unwrap();
    assert_eq!(sink.frames_written(), 2);
    let bytes = sink.into_inner().unwrap();
    assert_eq!(bytes, vec![7, 7, 7, 7, 7, 7, 9, 9, 9, 9, 9, 9]);
}

#[test]
fn writer_sink_rejects_out_of_order_and_wrong_size() {
    let mut sink = WriterSink::new(Vec::new());
    sink.begin(cfg(2, 2)).unwrap();
    sink.push_frame(FrameIndex(3), &frame(2, 2, 0)).unwrap();
    assert!(sink.push_frame(FrameIndex(3), &frame(2, 2, 0)).is_err());
    assert!(sink.push_frame(FrameIndex(1), &frame(2, 2, 0)).is_err());
    assert!(matches!(
        sink.push_frame(FrameIndex(4), &frame(1, 2, 0)),
        Err(FadioError::ShapeMismatch(_))
    ));
}

#[test]
fn writer_sink_requires_begin() {
    let mut sink = WriterSink::new(Vec::new());
    assert!(sink.push_frame(FrameIndex(0), &frame(1, 1, 0)).is_err());
    assert!(sink.begin(cfg(0, 1)).is_err());
}

#[test]
fn writer_sink_propagates_write_failure() {
    let mut sink = WriterSink::new(ClosedPipe);
    sink.begin(cfg(1, 1)).unwrap();
    let err = sink.push_frame(FrameIndex(0), &frame(1, 1, 0)).unwrap_err();
    assert!(matches!(err, FadioError::EncoderIo(_)));
    assert_eq!(sink.frames_written(), 0);
}

#[derive(Default)]
struct CountingFlush {
    bytes: Vec<u8>,
    flushes: usize,
}

impl Write for CountingFlush {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flushes += 1;
        Ok(())
    }
}

#[test]
fn writer_sink_end_flushes_and_stops_accepting_frames() {
    let mut sink = WriterSink::new(CountingFlush::default());
    sink.begin(cfg(1, 1)).unwrap();
    sink.push_frame(FrameIndex(0), &frame(1, 1, 3)).unwrap();
    sink.end().unwrap();
    assert!(sink.push_frame(FrameIndex(1), &frame(1, 1, 3)).is_err());

    let inner = sink.into_inner().unwrap();
    assert_eq!(inner.flushes, 1);
    assert_eq!(inner.bytes, vec![3, 3, 3]);
}

#[test]
fn in_memory_sink_records_config_and_end() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg(1, 1)).unwrap();
    sink.push_frame(FrameIndex(0), &frame(1, 1, 5)).unwrap();
    sink.end().unwrap();
    assert_eq!(sink.config(), Some(cfg(1, 1)));
    assert_eq!(sink.frames().len(), 1);
    assert!(sink.ended());
}
