//! Gaussian temporal weighting of input frames.

/// Weight computation and the normalized [`weights::WeightVector`].
pub mod weights;
