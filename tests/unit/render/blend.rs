use super::*;
use crate::kernel::weights::compute_weights;

fn gradient_set(n: usize, width: u32, height: u32) -> InputFrameSet {
    let frames = (0..n)
        .map(|k| {
            let bytes: Vec<u8> = (0..(width * height * 3) as usize)
                .map(|i| ((i * 37 + k * 91) % 256) as u8)
                .collect();
            Raster::from_rgb8(width, height, &bytes).unwrap()
        })
        .collect();
    InputFrameSet::new(frames).unwrap()
}

#[test]
fn output_stays_within_input_hull() {
    let set = gradient_set(5, 7, 3);
    for idx in 0..9 {
        for width in [0.05, 0.3, 2.0] {
            let w = compute_weights(idx, 9, 5, width).unwrap();
            let out = synthesize(&w, &set).unwrap();
            for (i, v) in out.samples().iter().enumerate() {
                let (lo, hi) = set
                    .frames()
                    .iter()
                    .map(|f| f.samples()[i])
                    .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| {
                        (lo.min(s), hi.max(s))
                    });
                assert!(*v >= lo - 1e-9 && *v <= hi + 1e-9, "sample {i}: {v} not in [{lo}, {hi}]");
            }
        }
    }
}

#[test]
fn one_hot_weights_reproduce_the_input() {
    let set = gradient_set(3, 4, 4);
    let w = WeightVector::new(vec![0.0, 1.0, 0.0]).unwrap();
    let out = synthesize(&w, &set).unwrap();
    assert_eq!(out, set.frames()[1]);
}

#[test]
fn parallel_matches_sequential_exactly() {
    let set = gradient_set(4, 16, 9);
    let w = compute_weights(3, 10, 4, 0.2).unwrap();
    let seq = synthesize(&w, &set).unwrap();
    let mut par = Raster::zeroed(16, 9);
    synthesize_into(&mut par, &w, &set, BlendOpts { parallel: true }).unwrap();
    assert_eq!(seq, par);
}

#[test]
fn weight_count_mismatch_is_rejected() {
    let set = gradient_set(3, 2, 2);
    let w = WeightVector::new(vec![0.5, 0.5]).unwrap();
    assert!(matches!(
        synthesize(&w, &set),
        Err(FadioError::ShapeMismatch(_))
    ));
}

#[test]
fn destination_size_mismatch_is_rejected() {
    let set = gradient_set(2, 2, 2);
    let w = WeightVector::new(vec![0.5, 0.5]).unwrap();
    let mut dst = Raster::zeroed(3, 2);
    assert!(matches!(
        synthesize_into(&mut dst, &w, &set, BlendOpts::default()),
        Err(FadioError::ShapeMismatch(_))
    ));
}

#[test]
fn destination_is_overwritten_not_accumulated() {
    let set = gradient_set(2, 2, 2);
    let w = WeightVector::new(vec![0.25, 0.75]).unwrap();
    let mut dst = Raster::solid(2, 2, [200, 200, 200]);
    synthesize_into(&mut dst, &w, &set, BlendOpts::default()).unwrap();
    assert_eq!(dst, synthesize(&w, &set).unwrap());
}
