//! Error types for local optimization.
//!
//! Solvers report two kinds of trouble. Problems the caller can fix
//! (invalid configuration, mismatched dimensions, a failing cost function)
//! are returned as [`OptimizerError`]. Numerical degeneracy inside an
//! iteration is not an error: the solver stops and reports its last valid
//! state through [`TerminationReason`](crate::optimization::optimizer::TerminationReason).

use thiserror::Error;

/// Errors that can occur during optimization.
#[derive(Debug, Clone, Error)]
pub enum OptimizerError {
    /// Invalid optimizer configuration.
    ///
    /// This error occurs when a solver is configured with invalid
    /// parameters (e.g., a negative step factor or an empty elite set).
    #[error("Invalid optimizer configuration: {reason}")]
    InvalidConfiguration {
        /// Description of the configuration error
        reason: String,
        /// Name of the invalid parameter
        parameter: String,
        /// Value that was invalid
        value: String,
    },

    /// Dimension mismatch between vectors.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimensions
        expected: String,
        /// Actual dimensions
        actual: String,
    },

    /// Bracketing gave up after its expansion cap.
    ///
    /// Raised when the objective has no local minimum (or no sign change)
    /// reachable by geometric step growth, e.g. an unbounded-below function.
    #[error("Bracketing failed after {iterations} expansions: {reason}")]
    BracketNotFound {
        /// Description of the failure
        reason: String,
        /// Number of expansions attempted
        iterations: usize,
    },

    /// Numerical instability detected.
    #[error("Numerical instability detected: {reason}")]
    NumericalError {
        /// Description of the numerical issue
        reason: String,
    },

    /// The cost function reported a failure.
    #[error("Cost function evaluation failed: {reason}")]
    EvaluationFailed {
        /// Description reported by the cost function
        reason: String,
    },
}

impl OptimizerError {
    /// Create an InvalidConfiguration error.
    pub fn invalid_configuration<S1, S2, S3>(reason: S1, parameter: S2, value: S3) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
    {
        Self::InvalidConfiguration {
            reason: reason.into(),
            parameter: parameter.into(),
            value: value.into(),
        }
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

    /// Create a BracketNotFound error.
    pub fn bracket_not_found<S: Into<String>>(reason: S, iterations: usize) -> Self {
        Self::BracketNotFound {
            reason: reason.into(),
            iterations,
        }
    }

    /// Create a NumericalError with a custom reason.
    pub fn numerical_error<S: Into<String>>(reason: S) -> Self {
        Self::NumericalError {
            reason: reason.into(),
        }
    }

    /// Create an EvaluationFailed error with a custom reason.
    pub fn evaluation_failed<S: Into<String>>(reason: S) -> Self {
        Self::EvaluationFailed {
            reason: reason.into(),
        }
    }
}

/// Result type alias for optimizer operations.
pub type Result<T> = std::result::Result<T, OptimizerError>;
