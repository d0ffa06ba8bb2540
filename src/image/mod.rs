//! Image introspection.
//!
//! # Modules
//!
//! - [`probe`]: Intrinsic pixel dimensions from file headers (raster + SVG)

pub mod probe;

pub use probe::{Dimensions, ProbeError, probe_dimensions};
