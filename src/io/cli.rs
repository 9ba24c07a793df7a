//! Command-line interface for generating stereograms from depth map images

use crate::algorithm::generator::{Outcome, StereogramGenerator};
use crate::algorithm::options::{Options, Oversample};
use crate::algorithm::variants::Algorithm;
use crate::buffers::depthmap::LevelAdjustments;
use crate::buffers::{DepthMap, Texture};
use crate::io::configuration::{
    DEFAULT_FIELD_DEPTH, DEFAULT_OVERSAMPLE, DEFAULT_RESOLUTION_X, DEFAULT_RESOLUTION_Y,
    DEFAULT_SEPARATION, OUTPUT_SUFFIX, PROGRESS_POLL_INTERVAL_MS,
};
use crate::io::error::{Result, invariant_violation};
use crate::io::image::{export_stereogram, load_depthmap, load_texture};
use crate::io::progress::{GenerationProgress, ProgressRenderer};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Procedural dot texture styles
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DotStyle {
    /// Random grayscale dots
    Grey,
    /// Random coloured dots
    Colour,
}

#[derive(Parser)]
#[command(name = "stereogrammer")]
#[command(
    author,
    version,
    about = "Generate single-image stereograms from depth maps"
)]
/// Command-line arguments for stereogram generation
// CLI tools commonly need multiple boolean flags for various features and user preferences
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Depth map image; white reads as near, black as far
    #[arg(value_name = "DEPTHMAP")]
    pub depthmap: PathBuf,

    /// Texture image to tile across the stereogram
    #[arg(short, long)]
    pub texture: Option<PathBuf>,

    /// Procedural dot style used when no texture image is given
    #[arg(long, value_enum, default_value_t = DotStyle::Grey)]
    pub dots: DotStyle,

    /// Output file (defaults to the depth map name plus a suffix)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output width in pixels
    #[arg(short = 'W', long, default_value_t = DEFAULT_RESOLUTION_X)]
    pub width: u32,

    /// Output height in pixels
    #[arg(short = 'H', long, default_value_t = DEFAULT_RESOLUTION_Y)]
    pub height: u32,

    /// Eye separation in pixels
    #[arg(short, long, default_value_t = DEFAULT_SEPARATION)]
    pub separation: f64,

    /// Depth of field between 0 and 1
    #[arg(short = 'd', long, default_value_t = DEFAULT_FIELD_DEPTH)]
    pub field_depth: f64,

    /// Horizontal oversampling factor (1, 2, 3, 4, 6 or 8)
    #[arg(short = 'x', long, default_value_t = DEFAULT_OVERSAMPLE)]
    pub oversample: u32,

    /// Row algorithm variant
    #[arg(short, long, value_enum, default_value_t = Algorithm::Horoptic)]
    pub algorithm: Algorithm,

    /// Discard points occluded along the line of sight
    #[arg(short, long)]
    pub remove_hidden: bool,

    /// Overlay two convergence guide dots
    #[arg(short, long)]
    pub convergence_dots: bool,

    /// Stretch to the requested resolution instead of matching the depth
    /// map's aspect ratio
    #[arg(long)]
    pub stretch: bool,

    /// Sample one depth value per output pixel instead of interpolating to
    /// the oversampled width
    #[arg(long)]
    pub no_interpolation: bool,

    /// Invert the depth map so near becomes far
    #[arg(short, long)]
    pub invert: bool,

    /// Gamma correction applied to the depth map before synthesis
    #[arg(short, long)]
    pub gamma: Option<f64>,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }
}

/// Orchestrates one load-synthesize-save run from CLI arguments
pub struct GenerateCommand {
    cli: Cli,
}

impl GenerateCommand {
    /// Create a command from parsed CLI arguments
    pub const fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Load the inputs, synthesize, and save the stereogram
    ///
    /// # Errors
    ///
    /// Returns an error if input loading, validation, synthesis, or export
    /// fails. An aborted synthesis is not an error but produces no output.
    // Allow print for user feedback on completion and abort
    #[allow(clippy::print_stderr)]
    pub fn run(&mut self) -> Result<()> {
        let depthmap = Arc::new(self.load_depthmap()?);
        let texture = self.load_texture()?;

        let options = Options {
            resolution_x: self.cli.width,
            resolution_y: self.cli.height,
            separation: self.cli.separation,
            field_depth: self.cli.field_depth,
            oversample: Oversample::from_factor(self.cli.oversample)?,
            remove_hidden_surfaces: self.cli.remove_hidden,
            add_convergence_dots: self.cli.convergence_dots,
            preserve_aspect_ratio: !self.cli.stretch,
            interpolate_depthmap: !self.cli.no_interpolation,
            algorithm: self.cli.algorithm,
            ..Options::default()
        };

        let generator = StereogramGenerator::new(options, depthmap, &texture)?;
        let progress = GenerationProgress::new();

        let outcome = self.generate_with_progress(&generator, &progress)?;

        match outcome {
            Outcome::Complete(stereogram) => {
                let output_path = self.output_path();
                export_stereogram(&stereogram, &output_path)?;
                if !self.cli.quiet {
                    eprintln!(
                        "Wrote {}x{} stereogram to {} in {} ms",
                        stereogram.width(),
                        stereogram.height(),
                        output_path.display(),
                        stereogram.elapsed().as_millis()
                    );
                }
            }
            Outcome::Aborted => {
                if !self.cli.quiet {
                    eprintln!("Generation aborted; no output written");
                }
            }
        }

        Ok(())
    }

    // Run the synthesis on a worker thread while feeding the progress bar
    fn generate_with_progress(
        &self,
        generator: &StereogramGenerator,
        progress: &GenerationProgress,
    ) -> Result<Outcome> {
        let renderer = self.cli.should_show_progress().then(|| {
            ProgressRenderer::new(generator.rows(), self.display_name())
        });
        let poll = Duration::from_millis(PROGRESS_POLL_INTERVAL_MS);

        let outcome = std::thread::scope(|scope| {
            let handle = scope.spawn(|| generator.generate(progress));

            if let Some(ref renderer) = renderer {
                while !handle.is_finished() {
                    renderer.update(progress);
                    std::thread::sleep(poll);
                }
            }

            match handle.join() {
                Ok(result) => result,
                Err(_) => Err(invariant_violation(
                    "generation worker",
                    &"worker thread panicked",
                )),
            }
        })?;

        if let Some(ref renderer) = renderer {
            match &outcome {
                Outcome::Complete(_) => renderer.finish(),
                Outcome::Aborted => renderer.abandon(),
            }
        }

        Ok(outcome)
    }

    fn load_depthmap(&self) -> Result<DepthMap> {
        let mut depthmap = load_depthmap(&self.cli.depthmap)?;

        if self.cli.invert {
            depthmap = depthmap.inverted();
        }
        if let Some(gamma) = self.cli.gamma {
            depthmap = depthmap.level_adjusted(LevelAdjustments {
                gamma,
                ..LevelAdjustments::default()
            });
        }

        Ok(depthmap)
    }

    fn load_texture(&self) -> Result<Texture> {
        match self.cli.texture {
            Some(ref path) => load_texture(path),
            None => {
                let width = self.cli.separation.round().max(1.0) as u32;
                match self.cli.dots {
                    DotStyle::Grey => Texture::grey_dots(width, self.cli.height.max(1)),
                    DotStyle::Colour => Texture::colour_dots(width, self.cli.height.max(1)),
                }
            }
        }
    }

    fn display_name(&self) -> String {
        self.cli
            .depthmap
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }

    fn output_path(&self) -> PathBuf {
        if let Some(ref output) = self.cli.output {
            return output.clone();
        }

        let stem = self.cli.depthmap.file_stem().unwrap_or_default();
        let output_name = format!("{}{}.png", stem.to_string_lossy(), OUTPUT_SUFFIX);

        match self.cli.depthmap.parent() {
            Some(parent) if parent != Path::new("") => parent.join(output_name),
            _ => PathBuf::from(output_name),
        }
    }
}
