//! Algorithm variants and per-row dispatch
//!
//! Every variant is a valid dispatch target; only the horoptic algorithm is
//! implemented. The others fail deterministically when invoked instead of
//! silently falling back, and the generator rejects them before any working
//! buffer is allocated.

use crate::algorithm::generator::FrameBuffers;
use crate::io::error::{GenerationError, Result};
use std::fmt;

/// Stereogram row algorithm selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Algorithm {
    /// Center-out constraint propagation against a spherical horopter
    Horoptic,
    /// Techmind algorithm (implementation withheld upstream)
    Techmind,
    /// Constraint satisfaction algorithm (implementation withheld upstream)
    ConstraintSatisfaction,
    /// Look-back algorithm (implementation withheld upstream)
    LookBack,
    /// Tyler-Chang algorithm (implementation withheld upstream)
    TylerChang,
}

impl Algorithm {
    /// Whether this variant has a working row implementation
    pub const fn is_implemented(self) -> bool {
        matches!(self, Self::Horoptic)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Horoptic => "horoptic",
            Self::Techmind => "techmind",
            Self::ConstraintSatisfaction => "constraint-satisfaction",
            Self::LookBack => "look-back",
            Self::TylerChang => "tyler-chang",
        };
        f.write_str(name)
    }
}

/// One row algorithm operating on a shared frame
///
/// Implementations read the shared immutable depth and texture buffers and
/// write one output row of RGBA bytes; rows are processed in any order and
/// in parallel. Returns the number of pixels discarded by the hidden
/// surface test.
pub trait RowAlgorithm: Send + Sync {
    /// Synthesize output row `y` into `row` (RGBA, 4 bytes per pixel)
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedAlgorithm` for stub variants, or
    /// `InvariantViolation` if the row solve detects a defect.
    fn process_row(&self, y: usize, frame: &FrameBuffers<'_>, row: &mut [u8]) -> Result<usize>;
}

/// Dispatch target for variants whose implementation was withheld upstream
#[derive(Debug, Clone, Copy)]
pub struct UnimplementedAlgorithm {
    algorithm: Algorithm,
}

impl UnimplementedAlgorithm {
    /// Wrap a variant that has no row implementation
    pub const fn new(algorithm: Algorithm) -> Self {
        Self { algorithm }
    }
}

impl RowAlgorithm for UnimplementedAlgorithm {
    fn process_row(&self, _y: usize, _frame: &FrameBuffers<'_>, _row: &mut [u8]) -> Result<usize> {
        Err(GenerationError::UnsupportedAlgorithm {
            algorithm: self.algorithm.to_string(),
        })
    }
}
