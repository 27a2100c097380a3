//! Floating-point RGB rasters and the 8-bit frames handed to sinks.

/// Single-raster types.
pub mod raster;
/// The validated, shared set of input rasters.
pub mod set;
