/// Convenience result type used across fadio.
pub type FadioResult<T> = Result<T, FadioError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum FadioError {
    /// Invalid run parameters, detected before any blending starts.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Rasters or weight vectors whose dimensions do not line up.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Weight normalization hit a degenerate (near-zero or non-finite) sum.
    #[error("numeric degeneracy: {0}")]
    NumericDegeneracy(String),

    /// Writing to, spawning or finalizing the encoder failed.
    #[error("encoder io error: {0}")]
    EncoderIo(String),

    /// An input image could not be opened or decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FadioError {
    /// Build a [`FadioError::Configuration`] value.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Build a [`FadioError::ShapeMismatch`] value.
    pub fn shape_mismatch(msg: impl Into<String>) -> Self {
        Self::ShapeMismatch(msg.into())
    }

    /// Build a [`FadioError::NumericDegeneracy`] value.
    pub fn numeric_degeneracy(msg: impl Into<String>) -> Self {
        Self::NumericDegeneracy(msg.into())
    }

    /// Build a [`FadioError::EncoderIo`] value.
    pub fn encoder_io(msg: impl Into<String>) -> Self {
        Self::EncoderIo(msg.into())
    }

    /// Build a [`FadioError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
