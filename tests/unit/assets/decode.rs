use super::*;

fn fixture_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("decode_unit").join(name);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_png(path: &Path, width: u32, height: u32, rgb: [u8; 3]) {
    RgbImage::from_pixel(width, height, image::Rgb(rgb))
        .save(path)
        .unwrap();
}

#[test]
fn target_size_is_smallest_pair_width_first() {
    let images = vec![
        RgbImage::new(8, 2),
        RgbImage::new(4, 6),
        RgbImage::new(4, 9),
    ];
    let set = frames_from_images(images).unwrap();
    assert_eq!((set.canvas().width, set.canvas().height), (4, 6));
    assert_eq!(set.len(), 3);
}

#[test]
fn same_size_images_are_not_resampled() {
    let a = RgbImage::from_pixel(2, 2, image::Rgb([255, 0, 0]));
    let b = RgbImage::from_pixel(2, 2, image::Rgb([0, 0, 255]));
    let set = frames_from_images(vec![a, b]).unwrap();
    assert_eq!(set.frames()[0].pixel(1, 1), Some([255.0, 0.0, 0.0]));
    assert_eq!(set.frames()[1].pixel(0, 0), Some([0.0, 0.0, 255.0]));
}

#[test]
fn solid_images_stay_solid_after_resize() {
    let big = RgbImage::from_pixel(8, 8, image::Rgb([40, 80, 120]));
    let small = RgbImage::from_pixel(4, 4, image::Rgb([0, 0, 0]));
    let set = frames_from_images(vec![big, small]).unwrap();
    let px = set.frames()[0].pixel(2, 3).unwrap();
    for (got, want) in px.iter().zip([40.0, 80.0, 120.0]) {
        assert!((got - want).abs() <= 1.0, "{got} vs {want}");
    }
}

#[test]
fn load_sorts_paths_when_requested() {
    let dir = fixture_dir("sorted");
    let a = dir.join("a.png");
    let b = dir.join("b.png");
    write_png(&a, 2, 2, [10, 10, 10]);
    write_png(&b, 2, 2, [200, 200, 200]);

    let unsorted = vec![b.clone(), a.clone()];
    let set = load_input_frames(&unsorted, &LoadOpts::default()).unwrap();
    assert_eq!(set.frames()[0].pixel(0, 0).unwrap()[0], 200.0);

    let set = load_input_frames(&unsorted, &LoadOpts { sort_input: true }).unwrap();
    assert_eq!(set.frames()[0].pixel(0, 0).unwrap()[0], 10.0);
}

#[test]
fn too_few_inputs_are_rejected() {
    let err = load_input_frames(&[PathBuf::from("one.png")], &LoadOpts::default()).unwrap_err();
    assert!(matches!(err, FadioError::Configuration(_)));
}

#[test]
fn decode_failure_names_the_file() {
    let dir = fixture_dir("broken");
    let good = dir.join("good.png");
    let bad = dir.join("bad.png");
    write_png(&good, 2, 2, [0, 0, 0]);
    std::fs::write(&bad, b"not an image").unwrap();

    let err = load_input_frames(&[good, bad], &LoadOpts::default()).unwrap_err();
    assert!(matches!(err, FadioError::Decode(_)));
    assert!(err.to_string().contains("bad.png"));
}
