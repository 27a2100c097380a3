use std::path::{Path, PathBuf};

use image::RgbImage;
use image::imageops::FilterType;
use rayon::prelude::*;

use crate::foundation::error::{FadioError, FadioResult};
use crate::frame::raster::Raster;
use crate::frame::set::InputFrameSet;

/// Options for [`load_input_frames`].
#[derive(Clone, Copy, Debug, Default)]
pub struct LoadOpts {
    /// Sort input paths lexicographically before loading.
    pub sort_input: bool,
}

/// Decode `paths`, convert to RGB and resize everything to a common resolution.
///
/// The target size is the smallest `(width, height)` pair, compared width first. Frame order
/// follows `paths` (after the optional sort).
pub fn load_input_frames(paths: &[PathBuf], opts: &LoadOpts) -> FadioResult<InputFrameSet> {
    if paths.len() < 2 {
        return Err(FadioError::configuration(format!(
            "at least 2 input images are required (got {})",
            paths.len()
        )));
    }

    let mut paths = paths.to_vec();
    if opts.sort_input {
        sort_paths(&mut paths);
    }

    let images = paths
        .par_iter()
        .map(|p| decode_rgb8(p))
        .collect::<FadioResult<Vec<_>>>()?;
    tracing::info!("read {} frames", images.len());

    frames_from_images(images)
}

/// Resize decoded images to their common size and widen them to [`Raster`]s.
pub fn frames_from_images(images: Vec<RgbImage>) -> FadioResult<InputFrameSet> {
    let (width, height) = images
        .iter()
        .map(|img| img.dimensions())
        .min()
        .ok_or_else(|| FadioError::configuration("no input images"))?;
    if width == 0 || height == 0 {
        return Err(FadioError::decode("input image has zero width or height"));
    }
    tracing::info!("resizing to {width}x{height}");

    let frames = images
        .into_par_iter()
        .map(|img| {
            let img = if img.dimensions() == (width, height) {
                img
            } else {
                image::imageops::resize(&img, width, height, FilterType::CatmullRom)
            };
            Raster::from_rgb8(width, height, img.as_raw())
        })
        .collect::<FadioResult<Vec<_>>>()?;

    InputFrameSet::new(frames)
}

/// Open and decode one image file as RGB8.
pub fn decode_rgb8(path: &Path) -> FadioResult<RgbImage> {
    let img = image::open(path)
        .map_err(|e| FadioError::decode(format!("'{}': {e}", path.display())))?;
    Ok(img.to_rgb8())
}

fn sort_paths(paths: &mut [PathBuf]) {
    paths.sort_by(|a, b| a.to_string_lossy().cmp(&b.to_string_lossy()));
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
