//! Grayscale depth buffers
//!
//! One byte per pixel, 0 at the far plane and 255 nearest the viewer. Any
//! inversion policy is applied by the caller before synthesis starts; the
//! engine never mutates a depth map.

use crate::io::error::{Result, invalid_source, invariant_violation};
use image::GrayImage;
use image::imageops::{self, FilterType};
use ndarray::Array2;

/// Immutable grayscale depth buffer
#[derive(Debug, Clone)]
pub struct DepthMap {
    data: Array2<u8>,
}

/// Level adjustment parameters for remapping depth values
///
/// Input values between the black and white points are renormalized, gamma
/// corrected, and scaled to the output range. With `hard_black` set, values
/// at or below the input black point stay at zero instead of being lifted
/// to the output black point.
#[derive(Debug, Clone, Copy)]
pub struct LevelAdjustments {
    /// Input black point in [0, 1]
    pub black_in: f64,
    /// Input white point in [0, 1]
    pub white_in: f64,
    /// Output black point in [0, 1]
    pub black_out: f64,
    /// Output white point in [0, 1]
    pub white_out: f64,
    /// Gamma exponent applied to the renormalized value
    pub gamma: f64,
    /// Keep fully black input pixels at zero
    pub hard_black: bool,
}

impl Default for LevelAdjustments {
    fn default() -> Self {
        Self {
            black_in: 0.0,
            white_in: 1.0,
            black_out: 0.0,
            white_out: 1.0,
            gamma: 1.0,
            hard_black: true,
        }
    }
}

impl DepthMap {
    /// Create a depth map from raw grayscale bytes in row-major order
    ///
    /// # Errors
    ///
    /// Returns `InvalidSourceData` if either dimension is zero or the byte
    /// count does not match `width * height`.
    pub fn from_bytes(width: u32, height: u32, bytes: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(invalid_source(&format!(
                "depth map has zero pixels ({width}x{height})"
            )));
        }
        let data = Array2::from_shape_vec((height as usize, width as usize), bytes)
            .map_err(|e| invalid_source(&format!("depth byte count mismatch: {e}")))?;
        Ok(Self { data })
    }

    /// Create a depth map from a decoded grayscale image
    ///
    /// # Errors
    ///
    /// Returns `InvalidSourceData` if the image has zero pixels in either
    /// dimension.
    pub fn from_luma(image: &GrayImage) -> Result<Self> {
        Self::from_bytes(image.width(), image.height(), image.as_raw().clone())
    }

    /// Create a flat depth map with every pixel at the given depth
    ///
    /// # Errors
    ///
    /// Returns `InvalidSourceData` if either dimension is zero.
    pub fn flat(width: u32, height: u32, depth: u8) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(invalid_source(&format!(
                "depth map has zero pixels ({width}x{height})"
            )));
        }
        Ok(Self {
            data: Array2::from_elem((height as usize, width as usize), depth),
        })
    }

    /// Width of the buffer in pixels
    pub fn width(&self) -> u32 {
        self.data.ncols() as u32
    }

    /// Height of the buffer in pixels
    pub fn height(&self) -> u32 {
        self.data.nrows() as u32
    }

    /// Access the underlying byte grid, indexed `[row, column]`
    pub const fn data(&self) -> &Array2<u8> {
        &self.data
    }

    /// Resample to exactly the given dimensions
    ///
    /// Uses a triangle filter, deterministic for identical inputs. No
    /// normalization is applied beyond the source's native 0-255 range.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSourceData` if either target dimension is zero, or
    /// `InvariantViolation` if the resampled buffer does not round-trip.
    pub fn to_scale(&self, width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(invalid_source(&format!(
                "requested depth buffer has zero pixels ({width}x{height})"
            )));
        }
        if width == self.width() && height == self.height() {
            return Ok(self.clone());
        }
        let source = self.to_luma()?;
        let scaled = imageops::resize(&source, width, height, FilterType::Triangle);
        Self::from_luma(&scaled)
    }

    /// Convert to an owned grayscale image
    ///
    /// # Errors
    ///
    /// Returns `InvariantViolation` if the buffer cannot be reassembled into
    /// an image, which indicates a dimension bookkeeping defect.
    pub fn to_luma(&self) -> Result<GrayImage> {
        let (height, width) = self.data.dim();
        let bytes = self.data.iter().copied().collect();
        GrayImage::from_raw(width as u32, height as u32, bytes)
            .ok_or_else(|| invariant_violation("depth buffer", &"byte count mismatch"))
    }

    /// Return a copy with every depth value inverted
    pub fn inverted(&self) -> Self {
        Self {
            data: self.data.mapv(|v| 255 - v),
        }
    }

    /// Return a copy with black/white points, gamma, and output range applied
    pub fn level_adjusted(&self, levels: LevelAdjustments) -> Self {
        let delta_in = levels.white_in - levels.black_in;
        let delta_out = levels.white_out - levels.black_out;

        let data = self.data.mapv(|v| {
            let src = f64::from(v) / 255.0;
            let mut dst = (src - levels.black_in).max(0.0).min(delta_in);
            if dst > 0.0 || !levels.hard_black {
                dst /= delta_in;
                dst = dst.powf(levels.gamma);
                dst = levels.black_out + dst * delta_out;
            }
            (dst * 255.0) as u8
        });

        Self { data }
    }

    /// Merge with another depth map, keeping the nearer value per pixel
    ///
    /// The other map is resampled to this map's dimensions first.
    ///
    /// # Errors
    ///
    /// Returns an error if the other map cannot be resampled.
    pub fn merge_with(&self, other: &Self) -> Result<Self> {
        let scaled = other.to_scale(self.width(), self.height())?;
        let mut data = self.data.clone();
        data.zip_mut_with(scaled.data(), |mine, &theirs| {
            if theirs > *mine {
                *mine = theirs;
            }
        });
        Ok(Self { data })
    }
}
