use crate::foundation::core::FrameIndex;
use crate::foundation::error::{FadioError, FadioResult};

/// Absolute tolerance on `sum(weights) == 1`.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Run-level kernel parameters shared by every output frame.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct KernelParams {
    /// Number of output frames (`L`).
    pub frame_count: u64,
    /// Number of input frames (`N`).
    pub weight_count: usize,
    /// Gaussian spread on the normalized `[0, 1]` timeline.
    pub influence_width: f64,
}

impl KernelParams {
    /// Bundle parameters without validating them.
    pub fn new(frame_count: u64, weight_count: usize, influence_width: f64) -> Self {
        Self {
            frame_count,
            weight_count,
            influence_width,
        }
    }

    /// Reject parameter combinations the kernel formula is undefined for.
    pub fn validate(&self) -> FadioResult<()> {
        if self.frame_count < 2 {
            return Err(FadioError::configuration(format!(
                "output length must be at least 2 frames (got {})",
                self.frame_count
            )));
        }
        if self.weight_count < 2 {
            return Err(FadioError::configuration(format!(
                "at least 2 input frames are required (got {})",
                self.weight_count
            )));
        }
        if !(self.influence_width.is_finite() && self.influence_width > 0.0) {
            return Err(FadioError::configuration(format!(
                "influence width must be a finite value > 0 (got {})",
                self.influence_width
            )));
        }
        Ok(())
    }

    /// Compute the weight vector for one output frame.
    pub fn weights_at(&self, frame: FrameIndex) -> FadioResult<WeightVector> {
        compute_weights(
            frame.0,
            self.frame_count,
            self.weight_count,
            self.influence_width,
        )
    }
}

/// Normalized blend coefficients over the input frames.
///
/// Entries are non-negative and sum to 1 within [`WEIGHT_SUM_TOLERANCE`].
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(transparent)]
pub struct WeightVector(Vec<f64>);

impl WeightVector {
    /// Wrap externally computed weights, checking the vector invariants.
    pub fn new(weights: Vec<f64>) -> FadioResult<Self> {
        if weights.is_empty() {
            return Err(FadioError::shape_mismatch("weight vector must not be empty"));
        }
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(FadioError::numeric_degeneracy(
                "weights must be finite and non-negative",
            ));
        }
        let out = Self(weights);
        out.check_normalized()?;
        Ok(out)
    }

    /// Borrow the weights in input order.
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Number of weights (one per input frame).
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false` for a validated vector.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all weights.
    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Index of the largest weight (first one on ties).
    pub fn argmax(&self) -> usize {
        let mut best = 0;
        for (i, w) in self.0.iter().enumerate() {
            if *w > self.0[best] {
                best = i;
            }
        }
        best
    }

    fn check_normalized(&self) -> FadioResult<()> {
        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(FadioError::numeric_degeneracy(format!(
                "weights sum to {sum}, expected 1"
            )));
        }
        Ok(())
    }
}

/// Compute the normalized Gaussian blend weights for output frame `frame_index`.
///
/// The output frame sits at `pos = frame_index / (frame_count - 1)` and input `k` at
/// `k / (weight_count - 1)`, both on `[0, 1]`. Input `k` gets
/// `exp(-((input_pos_k - pos) / influence_width)^2)` before normalization.
pub fn compute_weights(
    frame_index: u64,
    frame_count: u64,
    weight_count: usize,
    influence_width: f64,
) -> FadioResult<WeightVector> {
    KernelParams::new(frame_count, weight_count, influence_width).validate()?;
    if frame_index >= frame_count {
        return Err(FadioError::configuration(format!(
            "frame index {frame_index} is outside the output length {frame_count}"
        )));
    }

    let pos = frame_index as f64 / (frame_count - 1) as f64;
    let in_span = (weight_count - 1) as f64;

    let mut weights: Vec<f64> = (0..weight_count)
        .map(|k| {
            let d = (k as f64 / in_span - pos) / influence_width;
            (-(d * d)).exp()
        })
        .collect();

    let sum: f64 = weights.iter().sum();
    if !sum.is_finite() || sum < f64::MIN_POSITIVE {
        return Err(FadioError::numeric_degeneracy(format!(
            "weight sum {sum:e} is too small to normalize (influence width {influence_width} is too narrow)"
        )));
    }
    for w in &mut weights {
        *w /= sum;
    }

    let out = WeightVector(weights);
    out.check_normalized()?;
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/weights.rs"]
mod tests;
