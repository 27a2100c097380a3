//! Per-frame weighted synthesis over the input set.

/// Weighted-sum blending.
pub mod blend;
