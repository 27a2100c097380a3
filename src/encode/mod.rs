//! Encoding sinks.
//!
//! Sinks consume synthesized frames in timeline order and are driven by
//! [`crate::MorphSession::render`].

/// `ffmpeg`-based sink (MP4 output via system `ffmpeg`).
pub mod ffmpeg;
/// Generic frame sink trait, raw byte emission and built-in sinks.
pub mod sink;
