//! Exact line search along a descent direction.
//!
//! Given a point `x` and a direction `d`, the line search minimizes the
//! restriction `φ(α) = f(x + α d)` with the composite univariate minimizer:
//! bracket from `α = 0`, then refine by golden-section search. The returned
//! step factor is the midpoint of the final bracket.
//!
//! Cost functions may fail. A failed evaluation is treated as `+∞` inside the
//! one-dimensional search, so probing outside the domain of `f` simply looks
//! bad. If the search cannot settle on an evaluable step, the recorded
//! failure is returned.

use crate::{
    cost_function::CostFunction,
    error::{OptimizerError, Result},
    optimization::univariate::{minimize_univariate, UnivariateOptions},
    types::{DVector, Scalar},
};
use num_traits::Float;

/// Parameters of the line search; they are those of the univariate minimizer
/// applied to `φ(α)`.
pub type LineSearchParams<T> = UnivariateOptions<T>;

/// Finds the step factor minimizing `f(x + α d)`.
///
/// # Errors
///
/// - [`OptimizerError::DimensionMismatch`] if `x` and `d` differ in length
/// - [`OptimizerError::BracketNotFound`] if `f` decreases without bound along `d`
/// - the cost function's own error if the selected step cannot be evaluated
pub fn line_search<T, C>(
    cost_fn: &C,
    x: &DVector<T>,
    direction: &DVector<T>,
    params: &LineSearchParams<T>,
) -> Result<T>
where
    T: Scalar,
    C: CostFunction<T> + ?Sized,
{
    if x.len() != direction.len() {
        return Err(OptimizerError::dimension_mismatch(x.len(), direction.len()));
    }

    let mut failure: Option<OptimizerError> = None;
    let mut trial = x.clone();
    let phi = |alpha: T| {
        trial.copy_from(x);
        trial.axpy(alpha, direction, T::one());
        match cost_fn.cost(&trial) {
            Ok(value) => value,
            Err(err) => {
                failure = Some(err);
                T::infinity()
            }
        }
    };

    let minimum = match minimize_univariate(phi, T::zero(), params) {
        Ok(minimum) => minimum,
        Err(err) => return Err(failure.unwrap_or(err)),
    };

    if !<T as Float>::is_finite(minimum.value) {
        if let Some(err) = failure {
            return Err(err);
        }
    }

    Ok(minimum.point)
}
