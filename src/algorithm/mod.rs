//! Stereogram synthesis: row algorithms, the generator, and overlays

/// Horoptic constraint-propagation row algorithm
pub mod horoptic;
/// Generation options and the oversampling selector
pub mod options;
/// Convergence guide overlay
pub mod overlay;
/// Generator orchestration and row fan-out
pub mod generator;
/// Algorithm variants and per-row dispatch
pub mod variants;

pub use generator::{Outcome, Stereogram, StereogramGenerator};
pub use options::{Options, Oversample};
pub use variants::Algorithm;
