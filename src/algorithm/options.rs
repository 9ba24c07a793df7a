//! Generation options shared between callers, the generator, and results

use crate::algorithm::variants::Algorithm;
use crate::io::configuration::{
    DEFAULT_FIELD_DEPTH, DEFAULT_RESOLUTION_X, DEFAULT_RESOLUTION_Y, DEFAULT_SEPARATION,
};
use crate::io::error::{Result, invalid_parameter};
use std::time::Instant;

/// Supported horizontal oversampling factors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Oversample {
    /// No oversampling
    X1,
    /// 2x horizontal oversampling
    X2,
    /// 3x horizontal oversampling
    X3,
    /// 4x horizontal oversampling
    X4,
    /// 6x horizontal oversampling
    X6,
    /// 8x horizontal oversampling
    X8,
}

impl Oversample {
    /// The integer scaling factor for this setting
    pub const fn factor(self) -> u32 {
        match self {
            Self::X1 => 1,
            Self::X2 => 2,
            Self::X3 => 3,
            Self::X4 => 4,
            Self::X6 => 6,
            Self::X8 => 8,
        }
    }

    /// Map an integer factor to an oversample setting
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for any factor outside {1, 2, 3, 4, 6, 8}.
    pub fn from_factor(factor: u32) -> Result<Self> {
        match factor {
            1 => Ok(Self::X1),
            2 => Ok(Self::X2),
            3 => Ok(Self::X3),
            4 => Ok(Self::X4),
            6 => Ok(Self::X6),
            8 => Ok(Self::X8),
            other => Err(invalid_parameter(
                "oversample",
                &other,
                &"supported factors are 1, 2, 3, 4, 6, 8",
            )),
        }
    }
}

/// Value object holding every knob of one synthesis request
///
/// Copied on use: a generator validates and caches its own copy, and the
/// finished stereogram echoes the exact options it was produced from so the
/// result is fully regenerable.
#[derive(Debug, Clone, Copy)]
pub struct Options {
    /// Requested output width in pixels
    pub resolution_x: u32,
    /// Requested output height in pixels
    pub resolution_y: u32,
    /// Eye separation in pixels, before oversampling
    pub separation: f64,
    /// Depth of field; clamped to [0, 1] at generator construction
    pub field_depth: f64,
    /// Horizontal oversampling factor
    pub oversample: Oversample,
    /// Test each point against occluding surfaces along the sight line
    pub remove_hidden_surfaces: bool,
    /// Overlay two convergence guide dots on the finished image
    pub add_convergence_dots: bool,
    /// Shrink the working resolution to the depth map's aspect ratio
    pub preserve_aspect_ratio: bool,
    /// Resample the depth buffer to the oversampled working width
    pub interpolate_depthmap: bool,
    /// Which row algorithm to dispatch to
    pub algorithm: Algorithm,
    /// When this request was composed; used for debounce ordering
    pub requested_at: Instant,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            resolution_x: DEFAULT_RESOLUTION_X,
            resolution_y: DEFAULT_RESOLUTION_Y,
            separation: DEFAULT_SEPARATION,
            field_depth: DEFAULT_FIELD_DEPTH,
            oversample: Oversample::X2,
            remove_hidden_surfaces: false,
            add_convergence_dots: false,
            preserve_aspect_ratio: true,
            interpolate_depthmap: true,
            algorithm: Algorithm::Horoptic,
            requested_at: Instant::now(),
        }
    }
}
