//! Stepped downsampling of an oversampled working image
//!
//! Oversampled images are scaled back down in bounded steps of at most 2x
//! per pass rather than in a single filter, to bound single-pass filtering
//! error. The final step always targets the exact requested width.

use crate::io::error::{Result, invariant_violation};
use image::RgbaImage;
use image::imageops::{self, FilterType};

/// Scale a working-width image back down to the target width
///
/// Halves the width repeatedly (or applies the largest remaining step at
/// most 2) until the oversample factor is consumed; the height is never
/// touched. A factor of 1 returns the image unchanged.
///
/// # Errors
///
/// Returns `InvariantViolation` if the stepped scaling does not land on
/// exactly `target_width` — that indicates a defect, not bad input.
pub fn downsample_width(image: RgbaImage, oversample: u32, target_width: u32) -> Result<RgbaImage> {
    let mut remaining = f64::from(oversample.max(1));
    let mut current = image;

    while remaining > 1.0 {
        let div = remaining.min(2.0);
        remaining /= div;

        // Intermediate widths may round; the last step pins the exact target
        let next_width = if remaining <= 1.0 {
            target_width
        } else {
            (f64::from(current.width()) / div).round() as u32
        };

        current = imageops::resize(&current, next_width, current.height(), FilterType::Triangle);
    }

    if current.width() == target_width {
        Ok(current)
    } else {
        Err(invariant_violation(
            "downsample",
            &format!(
                "stepped downsample produced width {} instead of {target_width}",
                current.width()
            ),
        ))
    }
}
