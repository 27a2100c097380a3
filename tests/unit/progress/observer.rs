use super::*;

#[test]
fn line_format_pads_counters() {
    assert_eq!(format_progress_line(FrameIndex(7), 120, "▁█"), "   7/ 120 [▁█]");
}

#[test]
fn terminal_progress_rewrites_line_in_place() {
    let mut p = TerminalProgress::new(Vec::new()).with_levels(" #");
    let w = WeightVector::new(vec![0.2, 0.8]).unwrap();
    p.on_frame(FrameIndex(0), 2, &w);
    p.on_frame(FrameIndex(1), 2, &w);
    p.finish();
    let text = String::from_utf8(p.into_inner()).unwrap();
    assert_eq!(text, "   0/   2 [ #]\r   1/   2 [ #]\r\n");
}
