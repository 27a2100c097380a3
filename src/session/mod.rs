//! Session-oriented morph rendering.

/// Validated run state and the render loop.
pub mod morph_session;
