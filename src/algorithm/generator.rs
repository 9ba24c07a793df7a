//! Stereogram generator: validation, working geometry, and row fan-out
//!
//! A generator validates its options and derives every working dimension up
//! front, before the large pixel buffers exist. Rows are then synthesized in
//! parallel into disjoint slices of one output buffer, the oversampled
//! result is stepped back down to the target width, and the optional
//! convergence dots are overlaid last.

use crate::algorithm::horoptic::{HoropticParams, HoropticRows};
use crate::algorithm::options::Options;
use crate::algorithm::overlay;
use crate::algorithm::variants::{Algorithm, RowAlgorithm};
use crate::buffers::{DepthMap, Texture, TextureType};
use crate::io::error::{
    GenerationError, Result, invalid_parameter, invalid_source, invariant_violation,
};
use crate::io::progress::GenerationProgress;
use crate::math::resample;
use image::RgbaImage;
use ndarray::Array2;
use rayon::iter::{IndexedParallelIterator, ParallelIterator};
use rayon::slice::ParallelSliceMut;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Shared immutable buffers read by every row task
pub struct FrameBuffers<'a> {
    /// Depth buffer scaled for this synthesis, indexed `[row, column]`
    pub depth: &'a Array2<u8>,
    /// Texture tile scaled for this synthesis
    pub texture: &'a RgbaImage,
    /// Consecutive working pixels served by one depth sample
    pub depth_scale: usize,
}

impl FrameBuffers<'_> {
    /// Sample one row of normalized depths at working resolution
    ///
    /// Each depth sample serves `depth_scale` consecutive working pixels;
    /// with an interpolated depth buffer the scale is 1 and samples map one
    /// to one.
    pub fn sample_depth_row(&self, y: usize, line_width: usize) -> Vec<f32> {
        let scale = self.depth_scale.max(1);
        if y >= self.depth.nrows() {
            return vec![0.0; line_width];
        }
        let row = self.depth.row(y);
        (0..line_width)
            .map(|i| f32::from(row.get(i / scale).copied().unwrap_or(0)) / 255.0)
            .collect()
    }
}

/// How a synthesis call finished
#[derive(Debug)]
pub enum Outcome {
    /// Synthesis ran to completion
    Complete(Stereogram),
    /// A cooperative abort was observed; no partial image is returned
    Aborted,
}

/// A finished stereogram with its provenance
///
/// Immutable once created; the echoed options make the result fully
/// regenerable.
#[derive(Debug)]
pub struct Stereogram {
    image: RgbaImage,
    options: Options,
    elapsed: Duration,
    hidden_surfaces: usize,
}

impl Stereogram {
    /// The finished RGBA pixel buffer
    pub const fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Consume the stereogram, keeping only the pixel buffer
    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Output width in pixels
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Output height in pixels
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// The exact options this stereogram was generated from
    pub const fn options(&self) -> &Options {
        &self.options
    }

    /// Wall-clock time the synthesis took
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Total pixels discarded by the hidden-surface test
    pub const fn hidden_surfaces(&self) -> usize {
        self.hidden_surfaces
    }
}

/// Stereogram synthesis engine for one validated set of options
pub struct StereogramGenerator {
    options: Options,
    depthmap: Arc<DepthMap>,
    texture: Texture,
    separation: f64,
    field_depth: f64,
    oversample: u32,
    resolution_x: u32,
    rows: usize,
    line_width: usize,
    midpoint: usize,
    depth_width: usize,
    depth_scale: usize,
    texture_width: u32,
    texture_height: u32,
    row_algorithm: Box<dyn RowAlgorithm>,
}

impl StereogramGenerator {
    /// Validate options and derive the working geometry
    ///
    /// Dot textures are regenerated here at the separation-sized tile the
    /// original pixels would occupy; bitmap textures (including snapshots)
    /// pass through untouched. No large working buffer is allocated yet.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for a non-positive resolution or a
    /// separation below one pixel, `InvalidSourceData` for a degenerate
    /// texture tile, and `UnsupportedAlgorithm` for any variant without an
    /// implementation.
    pub fn new(options: Options, depthmap: Arc<DepthMap>, texture: &Texture) -> Result<Self> {
        if options.resolution_x == 0 || options.resolution_y == 0 {
            return Err(invalid_parameter(
                "resolution",
                &format!("{}x{}", options.resolution_x, options.resolution_y),
                &"both dimensions must be positive",
            ));
        }
        if options.separation < 1.0 || !options.separation.is_finite() {
            return Err(invalid_parameter(
                "separation",
                &options.separation,
                &"separation must be at least one pixel",
            ));
        }

        let field_depth = options.field_depth.clamp(0.0, 1.0);
        let oversample = options.oversample.factor();

        // Random dot textures are regenerated per request, at the tile size
        // the unscaled separation implies
        let texture = match texture.texture_type() {
            TextureType::GreyDots => Texture::grey_dots(
                options.separation.round() as u32,
                options.resolution_y,
            )?,
            TextureType::ColourDots => Texture::colour_dots(
                options.separation.round() as u32,
                options.resolution_y,
            )?,
            TextureType::Bitmap => texture.clone(),
        };

        // Fit the working resolution to the depth map's aspect ratio; the
        // caller's nominal resolution is echoed in the result untouched
        let (resolution_x, resolution_y) = if options.preserve_aspect_ratio {
            fit_to_aspect(
                options.resolution_x,
                options.resolution_y,
                depthmap.width(),
                depthmap.height(),
            )
        } else {
            (options.resolution_x, options.resolution_y)
        };

        let texture_width = options.separation.round() as u32;
        let texture_height =
            (options.separation * f64::from(texture.height()) / f64::from(texture.width())) as u32;
        if texture_height == 0 {
            return Err(invalid_source(
                &"texture is too wide to tile at this separation",
            ));
        }

        if !options.algorithm.is_implemented() {
            return Err(GenerationError::UnsupportedAlgorithm {
                algorithm: options.algorithm.to_string(),
            });
        }

        let rows = resolution_y as usize;
        let mut separation = options.separation;
        let mut line_width = resolution_x as usize;
        let mut depth_width = line_width;
        let mut depth_scale = oversample as usize;
        let mut texture_width = texture_width;

        if oversample > 1 {
            separation *= f64::from(oversample);
            line_width *= oversample as usize;
            texture_width *= oversample;

            if options.interpolate_depthmap {
                depth_width *= oversample as usize;
                depth_scale = 1;
            }
        }

        let midpoint = line_width / 2;

        let row_algorithm: Box<dyn RowAlgorithm> = match options.algorithm {
            Algorithm::Horoptic => Box::new(HoropticRows::new(HoropticParams {
                line_width,
                midpoint,
                separation,
                field_depth,
                remove_hidden_surfaces: options.remove_hidden_surfaces,
            })),
            other => {
                return Err(GenerationError::UnsupportedAlgorithm {
                    algorithm: other.to_string(),
                });
            }
        };

        Ok(Self {
            options,
            depthmap,
            texture,
            separation,
            field_depth,
            oversample,
            resolution_x,
            rows,
            line_width,
            midpoint,
            depth_width,
            depth_scale,
            texture_width,
            texture_height,
            row_algorithm,
        })
    }

    /// Output rows this synthesis will produce
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Working row width in pixels, after oversampling
    pub const fn line_width(&self) -> usize {
        self.line_width
    }

    /// Consecutive working pixels served by one depth sample
    pub const fn depth_scale(&self) -> usize {
        self.depth_scale
    }

    /// Depth of field actually used, after clamping
    pub const fn field_depth(&self) -> f64 {
        self.field_depth
    }

    /// Index of the working row midpoint
    pub const fn midpoint(&self) -> usize {
        self.midpoint
    }

    /// Working separation in pixels, after oversampling
    pub const fn separation(&self) -> f64 {
        self.separation
    }

    /// Synthesize the stereogram
    ///
    /// Rows fan out over the thread pool and write disjoint slices of one
    /// output buffer; the shared progress counter advances per completed
    /// row and the abort flag is observed at row granularity.
    ///
    /// # Errors
    ///
    /// Returns `InvariantViolation` if a row solve or the downsample step
    /// detects a defect; stub algorithm variants cannot reach this point.
    pub fn generate(&self, progress: &GenerationProgress) -> Result<Outcome> {
        let timer = Instant::now();
        progress.set_total_lines(self.rows);

        // Scale the inputs into the working buffers
        let texture_pixels = self
            .texture
            .to_scale(self.texture_width, self.texture_height)?;
        let depth = self.depthmap.to_scale(self.depth_width as u32, self.rows as u32)?;

        let frame = FrameBuffers {
            depth: depth.data(),
            texture: &texture_pixels,
            depth_scale: self.depth_scale,
        };

        let stride = self.line_width * 4;
        let mut pixels = vec![0u8; stride * self.rows];
        let hidden = AtomicUsize::new(0);

        pixels
            .par_chunks_mut(stride)
            .enumerate()
            .try_for_each(|(y, row)| -> Result<()> {
                if progress.is_abort_requested() {
                    return Ok(());
                }
                let row_hidden = self.row_algorithm.process_row(y, &frame, row)?;
                hidden.fetch_add(row_hidden, Ordering::Relaxed);
                progress.complete_line();
                Ok(())
            })?;

        if progress.is_abort_requested() {
            return Ok(Outcome::Aborted);
        }

        let working = RgbaImage::from_raw(self.line_width as u32, self.rows as u32, pixels)
            .ok_or_else(|| invariant_violation("assemble", &"pixel buffer size mismatch"))?;

        let mut image = resample::downsample_width(working, self.oversample, self.resolution_x)?;

        if self.options.add_convergence_dots {
            // Drawn at final resolution, with the non-oversampled separation
            overlay::draw_convergence_dots(&mut image, self.options.separation);
        }

        Ok(Outcome::Complete(Stereogram {
            image,
            options: self.options,
            elapsed: timer.elapsed(),
            hidden_surfaces: hidden.load(Ordering::Relaxed),
        }))
    }
}

// Shrink the requested resolution to the depth map's aspect ratio, keeping
// the larger request dimension fixed
fn fit_to_aspect(width: u32, height: u32, depth_width: u32, depth_height: u32) -> (u32, u32) {
    let requested = f64::from(width) / f64::from(height);
    let source = f64::from(depth_width) / f64::from(depth_height);

    if source < requested {
        (((f64::from(height) * source) as u32).max(1), height)
    } else {
        (width, ((f64::from(width) / source) as u32).max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_to_aspect_keeps_the_binding_dimension() {
        // Wider depth map than request: width wins, height shrinks
        assert_eq!(fit_to_aspect(1024, 768, 200, 100), (1024, 512));
        // Taller depth map than request: height wins, width shrinks
        assert_eq!(fit_to_aspect(1024, 768, 100, 200), (384, 768));
        // Matching ratios change nothing
        assert_eq!(fit_to_aspect(1024, 768, 512, 384), (1024, 768));
    }
}
