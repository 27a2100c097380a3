use crate::foundation::core::Canvas;
use crate::foundation::error::{FadioError, FadioResult};

/// A `width x height` grid of interleaved RGB samples stored as `f64`.
///
/// Samples are kept in floating point so blending does not round early. Values are nominally in
/// `[0, 255]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Raster {
    width: u32,
    height: u32,
    data: Vec<f64>,
}

impl Raster {
    /// An all-zero raster.
    pub fn zeroed(width: u32, height: u32) -> Self {
        let len = Canvas { width, height }.rgb_len();
        Self {
            width,
            height,
            data: vec![0.0; len],
        }
    }

    /// Wrap interleaved RGB samples; `data.len()` must equal `width * height * 3`.
    pub fn from_samples(width: u32, height: u32, data: Vec<f64>) -> FadioResult<Self> {
        let expected = Canvas { width, height }.rgb_len();
        if data.len() != expected {
            return Err(FadioError::shape_mismatch(format!(
                "raster {width}x{height} needs {expected} samples, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Widen tightly packed RGB8 bytes to floating point.
    pub fn from_rgb8(width: u32, height: u32, bytes: &[u8]) -> FadioResult<Self> {
        Self::from_samples(width, height, bytes.iter().map(|&b| f64::from(b)).collect())
    }

    /// A raster filled with one color.
    pub fn solid(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let px = [f64::from(rgb[0]), f64::from(rgb[1]), f64::from(rgb[2])];
        let mut out = Self::zeroed(width, height);
        for d in out.data.chunks_exact_mut(3) {
            d.copy_from_slice(&px);
        }
        out
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Dimensions as a [`Canvas`].
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Interleaved RGB samples, row-major.
    pub fn samples(&self) -> &[f64] {
        &self.data
    }

    pub(crate) fn samples_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// RGB samples of pixel `(x, y)`, or `None` outside the raster.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[f64; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 3;
        Some([self.data[i], self.data[i + 1], self.data[i + 2]])
    }

    /// Convert to 8-bit RGB by clamping to `[0, 255]` and truncating toward zero.
    pub fn to_rgb8(&self) -> FrameRgb8 {
        let mut data = vec![0u8; self.data.len()];
        write_rgb8_truncating(&mut data, &self.data);
        FrameRgb8 {
            width: self.width,
            height: self.height,
            data,
        }
    }

    /// Like [`Raster::to_rgb8`], reusing `dst`'s allocation.
    pub fn to_rgb8_into(&self, dst: &mut FrameRgb8) {
        dst.width = self.width;
        dst.height = self.height;
        dst.data.resize(self.data.len(), 0);
        write_rgb8_truncating(&mut dst.data, &self.data);
    }
}

/// A synthesized frame as RGB8 bytes, tightly packed, row-major.
///
/// This is exactly what sinks write: `width * height * 3` bytes, no header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRgb8 {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGB8 bytes.
    pub data: Vec<u8>,
}

impl FrameRgb8 {
    /// Check that `data` holds exactly `width * height * 3` bytes.
    pub fn validate(&self) -> FadioResult<()> {
        let expected = Canvas {
            width: self.width,
            height: self.height,
        }
        .rgb_len();
        if self.data.len() != expected {
            return Err(FadioError::shape_mismatch(format!(
                "frame data size mismatch: got {} bytes, expected width*height*3 = {expected}",
                self.data.len()
            )));
        }
        Ok(())
    }
}

fn write_rgb8_truncating(dst: &mut [u8], src: &[f64]) {
    for (d, s) in dst.iter_mut().zip(src) {
        // clamp passes NaN through; `as` maps it to 0.
        *d = s.clamp(0.0, 255.0) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/frame/raster.rs"]
mod tests;
