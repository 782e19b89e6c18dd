//! Univariate minimization.
//!
//! # Golden-Section Search
//!
//! Given a bracket `[a, b]` around a local minimum of a unimodal function,
//! golden-section search places two interior points at the golden ratio
//! and drops the part of the interval beyond the worse one. Because the
//! surviving interior point lands exactly on a golden-ratio position of the
//! reduced interval, every iteration costs a single new evaluation and
//! shrinks the bracket by `ρ = φ - 1 ≈ 0.618`.
//!
//! After `n` evaluations the bracket width is `ρ^(n-1) (b - a)`.
//!
//! # Composite Minimizer
//!
//! [`minimize_univariate`] brackets the minimum from a starting point with
//! [`bracket_minimum_with`] and then refines the bracket with the selected
//! [`UnivariateMethod`]. It is the building block of
//! [`line_search`](crate::optimization::line_search::line_search).

use crate::{
    error::{OptimizerError, Result},
    optimization::bracket::{assume_worse, bracket_minimum_with, Bracket, BracketParams},
    types::{constants, Scalar},
};
use num_traits::Float;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Refinement strategy applied after bracketing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UnivariateMethod {
    /// Golden-section interval reduction
    #[default]
    GoldenSection,
}

/// Options of the composite univariate minimizer.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UnivariateOptions<T> {
    /// Refinement method
    pub method: UnivariateMethod,
    /// Initial bracketing step
    pub initial_step: T,
    /// Bracketing growth factor
    pub expansion: T,
    /// Exact number of refinement evaluations; derived from `tolerance` when absent
    pub evaluations: Option<usize>,
    /// Target bracket width when `evaluations` is absent
    pub tolerance: T,
    /// Expansion cap of the bracketing phase
    pub max_expansions: usize,
}

impl<T: Scalar> Default for UnivariateOptions<T> {
    fn default() -> Self {
        let bracket = BracketParams::<T>::default();
        Self {
            method: UnivariateMethod::GoldenSection,
            initial_step: bracket.initial_step,
            expansion: bracket.expansion,
            evaluations: None,
            tolerance: <T as Scalar>::from_f64(1e-8),
            max_expansions: bracket.max_expansions,
        }
    }
}

impl<T: Scalar> UnivariateOptions<T> {
    /// Creates options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the refinement method.
    pub fn with_method(mut self, method: UnivariateMethod) -> Self {
        self.method = method;
        self
    }

    /// Sets the initial bracketing step.
    pub fn with_initial_step(mut self, step: T) -> Self {
        self.initial_step = step;
        self
    }

    /// Sets the bracketing growth factor.
    pub fn with_expansion(mut self, expansion: T) -> Self {
        self.expansion = expansion;
        self
    }

    /// Fixes the number of refinement evaluations.
    pub fn with_evaluations(mut self, evaluations: usize) -> Self {
        self.evaluations = Some(evaluations);
        self
    }

    /// Sets the target bracket width.
    pub fn with_tolerance(mut self, tolerance: T) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the bracketing expansion cap.
    pub fn with_max_expansions(mut self, max_expansions: usize) -> Self {
        self.max_expansions = max_expansions;
        self
    }

    /// Bracketing parameters derived from these options.
    pub fn bracket_params(&self) -> BracketParams<T> {
        BracketParams::new(self.initial_step, self.expansion)
            .with_max_expansions(self.max_expansions)
    }

    /// Validates the options.
    pub fn validate(&self) -> Result<()> {
        self.bracket_params().validate()?;
        if self.evaluations == Some(0) {
            return Err(OptimizerError::invalid_configuration(
                "at least one evaluation is required",
                "evaluations",
                "0",
            ));
        }
        if self.evaluations.is_none()
            && (self.tolerance <= T::zero() || !<T as Float>::is_finite(self.tolerance))
        {
            return Err(OptimizerError::invalid_configuration(
                "tolerance must be positive and finite",
                "tolerance",
                self.tolerance.to_string(),
            ));
        }
        Ok(())
    }
}

/// Result of a univariate minimization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnivariateMinimum<T> {
    /// Midpoint of the final bracket
    pub point: T,
    /// Objective value at `point`
    pub value: T,
    /// Final bracket
    pub bracket: Bracket<T>,
}

/// Number of golden-section evaluations needed to shrink a bracket of
/// `width` below `tolerance`.
///
/// Solves `ρ^(n-1) · width < tolerance`, i.e.
/// `n = ceil(ln(width / tolerance) / ln φ) + 1`, with a minimum of one.
pub fn evaluations_for_tolerance<T: Scalar>(width: T, tolerance: T) -> usize {
    let width = <T as Float>::abs(width);
    if width <= tolerance || !<T as Float>::is_finite(width) {
        return 1;
    }
    let ratio = width.to_f64() / tolerance.to_f64();
    let phi = constants::golden_ratio::<f64>();
    let reductions = (ratio.ln() / phi.ln()).ceil();
    // Saturating float-to-int cast
    reductions as usize + 1
}

/// Golden-section search on `[bracket.lower, bracket.upper]`.
///
/// Performs exactly `evaluations` calls of `f` and returns the reduced
/// bracket. NaN values compare as worse than any number.
///
/// # Errors
///
/// Returns an error if `evaluations` is zero.
pub fn golden_section_search<T, F>(
    mut f: F,
    bracket: Bracket<T>,
    evaluations: usize,
) -> Result<Bracket<T>>
where
    T: Scalar,
    F: FnMut(T) -> T,
{
    if evaluations == 0 {
        return Err(OptimizerError::invalid_configuration(
            "at least one evaluation is required",
            "evaluations",
            "0",
        ));
    }

    let rho = constants::inverse_golden_ratio::<T>();
    let (mut a, mut b) = (bracket.lower, bracket.upper);

    // Interior point closer to b; the first loop pass places its mirror.
    let mut d = rho * b + (T::one() - rho) * a;
    let mut yd = assume_worse(f(d));

    for _ in 1..evaluations {
        let c = rho * a + (T::one() - rho) * b;
        let yc = assume_worse(f(c));
        if yc < yd {
            b = d;
            d = c;
            yd = yc;
        } else {
            a = b;
            b = c;
        }
    }

    Ok(Bracket::new(a, b))
}

/// Brackets and refines a local minimum of `f` near `x0`.
///
/// Returns the midpoint of the final bracket together with its objective
/// value (one extra evaluation).
pub fn minimize_univariate<T, F>(
    mut f: F,
    x0: T,
    options: &UnivariateOptions<T>,
) -> Result<UnivariateMinimum<T>>
where
    T: Scalar,
    F: FnMut(T) -> T,
{
    options.validate()?;

    let bracket = bracket_minimum_with(&mut f, x0, &options.bracket_params())?;
    let evaluations = options
        .evaluations
        .unwrap_or_else(|| evaluations_for_tolerance(bracket.width(), options.tolerance));

    let bracket = match options.method {
        UnivariateMethod::GoldenSection => golden_section_search(&mut f, bracket, evaluations)?,
    };

    let point = bracket.midpoint();
    let value = f(point);
    tracing::trace!(
        x = point.to_f64(),
        value = value.to_f64(),
        width = bracket.width().to_f64(),
        evaluations,
        "univariate minimization finished"
    );

    Ok(UnivariateMinimum {
        point,
        value,
        bracket,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_golden_section_quadratic() {
        let bracket = golden_section_search(|x: f64| (x - 2.0).powi(2), Bracket::new(0.0, 10.0), 100).unwrap();
        assert!((bracket.midpoint() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_golden_section_evaluation_count_is_exact() {
        for n in [1, 2, 5, 40] {
            let mut calls = 0;
            let _ = golden_section_search(
                |x: f64| {
                    calls += 1;
                    x * x
                },
                Bracket::new(-1.0, 3.0),
                n,
            )
            .unwrap();
            assert_eq!(calls, n);
        }
    }

    #[test]
    fn test_golden_section_width_shrinks_by_rho() {
        let n = 10;
        let bracket = golden_section_search(|x: f64| (x - 0.3).abs(), Bracket::new(0.0, 1.0), n).unwrap();
        let rho = constants::inverse_golden_ratio::<f64>();
        assert_relative_eq!(bracket.width(), rho.powi(n as i32 - 1), epsilon = 1e-12);
        assert!(bracket.contains(0.3));
    }

    #[test]
    fn test_golden_section_zero_evaluations_rejected() {
        assert!(golden_section_search(|x: f64| x, Bracket::new(0.0, 1.0), 0).is_err());
    }

    #[test]
    fn test_evaluations_for_tolerance() {
        assert_eq!(evaluations_for_tolerance(1.0, 2.0), 1);
        assert_eq!(evaluations_for_tolerance(1.0, 1.0), 1);

        let n = evaluations_for_tolerance(10.0, 1e-6);
        let rho = constants::inverse_golden_ratio::<f64>();
        assert!(10.0 * rho.powi(n as i32 - 1) < 1e-6);
        assert!(10.0 * rho.powi(n as i32 - 2) >= 1e-6);
    }

    #[test]
    fn test_minimize_univariate() {
        let result = minimize_univariate(|x: f64| (x - 3.0).powi(2) + 1.0, 0.0, &UnivariateOptions::new()).unwrap();
        assert_relative_eq!(result.point, 3.0, epsilon = 1e-6);
        assert_relative_eq!(result.value, 1.0, epsilon = 1e-10);
        assert!(result.bracket.width() < 1e-8);
    }

    #[test]
    fn test_minimize_univariate_fixed_evaluations() {
        let options = UnivariateOptions::new().with_evaluations(60);
        let result = minimize_univariate(|x: f64| (x + 1.5).powi(4), 2.0, &options).unwrap();
        assert!((result.point + 1.5).abs() < 1e-3);
    }

    #[test]
    fn test_invalid_options() {
        let f = |x: f64| x * x;
        assert!(minimize_univariate(f, 0.0, &UnivariateOptions::new().with_evaluations(0)).is_err());
        assert!(minimize_univariate(f, 0.0, &UnivariateOptions::new().with_tolerance(-1.0)).is_err());
        assert!(minimize_univariate(f, 0.0, &UnivariateOptions::new().with_expansion(0.5)).is_err());
    }

    proptest! {
        #[test]
        fn prop_golden_section_keeps_minimum(
            center in -5.0f64..5.0,
            n in 1usize..60,
        ) {
            let bracket = golden_section_search(|x: f64| (x - center).powi(2), Bracket::new(-10.0, 10.0), n).unwrap();
            prop_assert!(bracket.lower <= bracket.upper);
            prop_assert!(bracket.lower <= center + 1e-9 && center - 1e-9 <= bracket.upper);
        }
    }
}
