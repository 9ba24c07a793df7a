//! Mathematical utilities for stereogram synthesis

/// Stereo separation and horopter projection geometry
pub mod projection;
/// Stepped downsampling back to the target resolution
pub mod resample;
