//! Error types for stereogram synthesis and the surrounding I/O

use std::fmt;
use std::path::PathBuf;

/// Main error type for synthesis and I/O operations
#[derive(Debug)]
pub enum GenerationError {
    /// Failed to load a source image from the filesystem
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Source buffer doesn't meet synthesis requirements
    ///
    /// Raised before any working buffer is allocated, e.g. for a depth map
    /// or texture with zero pixels in either dimension.
    InvalidSourceData {
        /// Description of what's wrong with the source data
        reason: String,
    },

    /// Generation parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Selected algorithm variant has no implementation
    ///
    /// The variant is a valid dispatch target but deterministically fails
    /// rather than silently falling back to another algorithm.
    UnsupportedAlgorithm {
        /// Name of the unimplemented variant
        algorithm: String,
    },

    /// An internal invariant was violated mid-synthesis
    ///
    /// Indicates a defect (constraint-chain non-termination, buffer size
    /// mismatch after downsampling), never bad input. The in-flight call is
    /// abandoned; no partial result is returned.
    InvariantViolation {
        /// Name of the operation that detected the violation
        operation: &'static str,
        /// Description of the violated invariant
        reason: String,
    },

    /// Failed to save a generated image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::InvalidSourceData { reason } => {
                write!(f, "Invalid source data: {reason}")
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::UnsupportedAlgorithm { algorithm } => {
                write!(f, "Algorithm '{algorithm}' is not implemented")
            }
            Self::InvariantViolation { operation, reason } => {
                write!(f, "Internal invariant violated in {operation}: {reason}")
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for GenerationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for synthesis results
pub type Result<T> = std::result::Result<T, GenerationError>;

impl From<image::ImageError> for GenerationError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageLoad {
            path: PathBuf::from("<unknown>"),
            source: err,
        }
    }
}

impl From<std::io::Error> for GenerationError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> GenerationError {
    GenerationError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create an invalid source data error
pub fn invalid_source(reason: &impl ToString) -> GenerationError {
    GenerationError::InvalidSourceData {
        reason: reason.to_string(),
    }
}

/// Create an internal invariant violation error
pub fn invariant_violation(operation: &'static str, reason: &impl ToString) -> GenerationError {
    GenerationError::InvariantViolation {
        operation,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_parameter() {
        let err = invalid_parameter("oversample", &5, &"supported factors are 1, 2, 3, 4, 6, 8");
        let message = err.to_string();
        assert!(message.contains("oversample"));
        assert!(message.contains('5'));
    }

    #[test]
    fn test_invariant_violation_is_not_recoverable_input_error() {
        let err = invariant_violation("constraint chain", &"exceeded hop bound");
        match err {
            GenerationError::InvariantViolation { operation, .. } => {
                assert_eq!(operation, "constraint chain");
            }
            _ => unreachable!("Expected InvariantViolation error type"),
        }
    }
}
