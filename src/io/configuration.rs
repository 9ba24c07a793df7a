//! Synthesis constants and runtime configuration defaults

/// Default output width in pixels
pub const DEFAULT_RESOLUTION_X: u32 = 1024;
/// Default output height in pixels
pub const DEFAULT_RESOLUTION_Y: u32 = 768;

/// Default eye separation in pixels, before oversampling
pub const DEFAULT_SEPARATION: f64 = 128.0;

/// Default depth of field, as a fraction of the far plane
pub const DEFAULT_FIELD_DEPTH: f64 = 0.3333;

/// Default horizontal oversampling factor
pub const DEFAULT_OVERSAMPLE: u32 = 2;

// The horopter approximates a sphere centred on the viewer; this factor
// times the separation approximates the distance to the viewer's eyes.
/// Horopter sphere radius as a multiple of the separation
pub const HOROPTER_RADIUS_FACTOR: f64 = 20.0;

/// Convergence dot radius as a fraction of the separation
pub const CONVERGENCE_DOT_RADIUS_DIVISOR: f64 = 16.0;
/// Minimum convergence dot radius in pixels
pub const CONVERGENCE_DOT_MIN_RADIUS: f64 = 2.0;
/// Convergence dot vertical position as a fraction of the image height
pub const CONVERGENCE_DOT_HEIGHT_DIVISOR: f64 = 16.0;

/// Interval between progress bar refreshes while a synthesis runs
pub const PROGRESS_POLL_INTERVAL_MS: u64 = 50;

/// Minimum preview delay worth sleeping for; shorter delays start at once
pub const PREVIEW_MIN_DELAY_MS: u64 = 50;

/// Suffix added to output filenames when no output path is given
pub const OUTPUT_SUFFIX: &str = "_stereogram";
