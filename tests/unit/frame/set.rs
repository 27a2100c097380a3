use super::*;

#[test]
fn uniform_frames_are_accepted() {
    let set = InputFrameSet::new(vec![
        Raster::solid(4, 2, [255, 0, 0]),
        Raster::solid(4, 2, [0, 0, 255]),
    ])
    .unwrap();
    assert_eq!(set.len(), 2);
    assert_eq!(
        set.canvas(),
        Canvas {
            width: 4,
            height: 2
        }
    );
}

#[test]
fn mixed_dimensions_are_rejected() {
    let err = InputFrameSet::new(vec![
        Raster::solid(4, 2, [0, 0, 0]),
        Raster::solid(2, 4, [0, 0, 0]),
    ])
    .unwrap_err();
    assert!(matches!(err, FadioError::ShapeMismatch(_)));
    assert!(err.to_string().contains("input frame 1"));
}

#[test]
fn empty_and_zero_sized_sets_are_rejected() {
    assert!(matches!(
        InputFrameSet::new(Vec::new()),
        Err(FadioError::Configuration(_))
    ));
    assert!(matches!(
        InputFrameSet::new(vec![Raster::zeroed(0, 3)]),
        Err(FadioError::ShapeMismatch(_))
    ));
}
