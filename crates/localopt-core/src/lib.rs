//! Core traits and types for local optimization.
//!
//! This crate provides everything the solvers in `localopt-optim` share: the
//! scalar abstraction, the cost-function contract, numeric primitives, and
//! the one-dimensional machinery (bracketing, golden-section search, line
//! search) used to pick step factors.
//!
//! # Modules
//!
//! - [`cost_function`]: Cost function interface and closure adapters
//! - [`error`]: Error types
//! - [`numerical`]: Vector helpers, sample statistics and Gaussian sampling
//! - [`optimization`]: Bracketing, univariate minimization, line search,
//!   step-factor strategies, termination tests and the [`Optimizer`] trait
//! - [`types`]: Type aliases and numerical constants
//!
//! [`Optimizer`]: optimization::optimizer::Optimizer

pub mod cost_function;
pub mod error;
pub mod numerical;
pub mod optimization;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use error::{OptimizerError, Result};

/// Prelude module for convenient imports.
///
/// # Example
/// ```
/// use localopt_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::cost_function::{CostFunction, CountingCostFunction, FnCost, QuadraticCost};
    pub use crate::error::{OptimizerError, Result};
    pub use crate::numerical::MultivariateNormal;
    pub use crate::optimization::bracket::{bracket_minimum, bracket_sign_change, Bracket, BracketParams};
    pub use crate::optimization::line_search::{line_search, LineSearchParams};
    pub use crate::optimization::optimizer::{
        ObjectivePoint, OptimizationResult, Optimizer, StoppingCriterion, TerminationReason, Trajectory,
    };
    pub use crate::optimization::step_size::{StepController, StepFactor};
    pub use crate::optimization::termination::{should_terminate, simplex_spread, TerminationMode};
    pub use crate::optimization::univariate::{
        golden_section_search, minimize_univariate, UnivariateMethod, UnivariateMinimum, UnivariateOptions,
    };
    pub use crate::types::{constants, DMatrix, DVector, Point, Scalar};
}
