//! Error types for surrogate fitting and sampling.

use localopt_core::error::OptimizerError;
use thiserror::Error;

/// Errors raised while building surrogate models or sample designs.
#[derive(Debug, Clone, Error)]
pub enum SurrogateError {
    /// The interpolation or least-squares system has no usable solution.
    ///
    /// Typically caused by duplicate samples or a kernel whose design
    /// matrix is singular for the given points.
    #[error("Surrogate system is singular: {reason}")]
    SingularSystem {
        /// Description of the failure
        reason: String,
    },

    /// No samples were provided.
    #[error("At least one sample is required")]
    EmptySampleSet,

    /// Inconsistent dimensions between samples, values, centers or bounds.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimensions
        expected: String,
        /// Actual dimensions
        actual: String,
    },

    /// Error from the core library.
    #[error(transparent)]
    Optimizer(#[from] OptimizerError),
}

impl SurrogateError {
    /// Create a SingularSystem error.
    pub fn singular<S: Into<String>>(reason: S) -> Self {
        Self::SingularSystem { reason: reason.into() }
    }

    /// Create a DimensionMismatch error.
    pub fn dimension_mismatch<S1, S2>(expected: S1, actual: S2) -> Self
    where
        S1: std::fmt::Display,
        S2: std::fmt::Display,
    {
        Self::DimensionMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}

/// Result type alias for surrogate operations.
pub type Result<T> = std::result::Result<T, SurrogateError>;
