//! Convergence tests shared by the iterative solvers.
//!
//! Gradient-based solvers stop when consecutive objective values agree to
//! within a tolerance, measured either absolutely or relative to the current
//! value. Nelder-Mead uses the spread of the simplex values instead
//! ([`simplex_spread`]).

use crate::{numerical::population_std_dev, types::Scalar};
use num_traits::Float;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How the change in objective value is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TerminationMode {
    /// `|f_curr - f_next| < tol`
    #[default]
    Absolute,
    /// `|f_curr - f_next| / |f_curr| < tol`
    Relative,
}

/// Returns true when the step from `f_curr` to `f_next` is small enough to stop.
///
/// In relative mode a zero `f_curr` has no scale, so the absolute test is used.
///
/// # Examples
///
/// ```
/// use localopt_core::optimization::termination::{should_terminate, TerminationMode};
///
/// assert!(should_terminate(100.0, 99.0, 0.5, TerminationMode::Relative));
/// assert!(!should_terminate(100.0, 99.0, 0.5, TerminationMode::Absolute));
/// ```
pub fn should_terminate<T: Scalar>(f_curr: T, f_next: T, tolerance: T, mode: TerminationMode) -> bool {
    let change = <T as Float>::abs(f_curr - f_next);
    match mode {
        TerminationMode::Relative if f_curr != T::zero() => change / <T as Float>::abs(f_curr) < tolerance,
        _ => change < tolerance,
    }
}

/// Spread of a simplex: the population standard deviation of its values.
pub fn simplex_spread<T: Scalar>(values: &[T]) -> T {
    population_std_dev(values)
}
