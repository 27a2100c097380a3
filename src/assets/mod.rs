//! Input image decoding and normalization to a common resolution.

/// File decoding into an [`crate::InputFrameSet`].
pub mod decode;
