//! Operator feedback. Nothing in here affects synthesis.

/// Per-frame progress observers.
pub mod observer;
/// Weight-vector sparklines.
pub mod sparkline;
