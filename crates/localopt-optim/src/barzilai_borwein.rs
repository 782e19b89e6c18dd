//! Barzilai-Borwein gradient descent.
//!
//! Moves along the normalized negative gradient like plain gradient descent,
//! but after the first iteration the step factor comes from the last two
//! iterates instead of a line search:
//!
//! ```text
//! Δx = x_k - x_{k-1},  Δg = g_k - g_{k-1}
//! α_k = λ ||g_k|| |<Δx, Δg>| / ||Δg||²
//! ```
//!
//! The factor `||g_k||` compensates for the normalized direction, so the
//! displacement matches the classic BB step `|<Δx, Δg>| / ||Δg||² · g_k`.
//! The first step uses the configured [`StepFactor`]. A vanishing gradient
//! difference stops the run with [`TerminationReason::NumericalDegeneracy`].

use crate::{gradient_descent::DEFAULT_MAX_ITERATIONS, utils::RunMonitor};
use localopt_core::{
    cost_function::{CostFunction, CountingCostFunction},
    error::{OptimizerError, Result},
    numerical::normalize,
    optimization::{
        optimizer::{check_initial_point, OptimizationResult, Optimizer, StoppingCriterion, TerminationReason},
        step_size::{StepController, StepFactor},
        termination::should_terminate,
    },
    types::{DVector, Scalar},
};
use num_traits::Float;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const NAME: &str = "Barzilai-Borwein";

/// Configuration for Barzilai-Borwein gradient descent.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BarzilaiBorweinConfig<T> {
    /// Strategy for the first step, before any difference is available
    pub step_factor: StepFactor<T>,
    /// Scale applied to every BB step
    pub lambda: T,
}

impl<T: Scalar> Default for BarzilaiBorweinConfig<T> {
    fn default() -> Self {
        Self {
            step_factor: StepFactor::default(),
            lambda: T::one(),
        }
    }
}

impl<T: Scalar> BarzilaiBorweinConfig<T> {
    /// Creates a configuration with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the strategy of the first step.
    pub fn with_step_factor(mut self, step_factor: StepFactor<T>) -> Self {
        self.step_factor = step_factor;
        self
    }

    /// Sets the step scale λ.
    pub fn with_lambda(mut self, lambda: T) -> Self {
        self.lambda = lambda;
        self
    }

    /// Checks the configuration.
    pub fn validate(&self) -> Result<()> {
        self.step_factor.validate()?;
        if self.lambda <= T::zero() || !<T as Float>::is_finite(self.lambda) {
            return Err(OptimizerError::invalid_configuration(
                "step scale must be positive and finite",
                "lambda",
                self.lambda.to_string(),
            ));
        }
        Ok(())
    }
}

/// Gradient descent with Barzilai-Borwein step factors.
#[derive(Debug, Clone)]
pub struct BarzilaiBorwein<T: Scalar> {
    config: BarzilaiBorweinConfig<T>,
}

impl<T: Scalar> BarzilaiBorwein<T> {
    /// Creates a new optimizer.
    pub fn new(config: BarzilaiBorweinConfig<T>) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &BarzilaiBorweinConfig<T> {
        &self.config
    }
}

impl<T: Scalar> Default for BarzilaiBorwein<T> {
    fn default() -> Self {
        Self::new(BarzilaiBorweinConfig::new())
    }
}

/// `λ ||g|| |<Δx, Δg>| / ||Δg||²`, or `None` when `Δg` vanishes.
fn bb_step<T: Scalar>(lambda: T, gradient_norm: T, dx: &DVector<T>, dg: &DVector<T>) -> Option<T> {
    let denominator = dg.norm_squared();
    if denominator <= T::zero() || !<T as Float>::is_finite(denominator) {
        return None;
    }
    let step = lambda * gradient_norm * <T as Float>::abs(dx.dot(dg)) / denominator;
    <T as Float>::is_finite(step).then_some(step)
}

impl<T: Scalar> Optimizer<T> for BarzilaiBorwein<T> {
    fn name(&self) -> &str {
        NAME
    }

    fn optimize<C>(
        &mut self,
        cost_fn: &C,
        initial_point: &DVector<T>,
        stopping_criterion: &StoppingCriterion<T>,
    ) -> Result<OptimizationResult<T>>
    where
        C: CostFunction<T> + ?Sized,
    {
        check_initial_point(initial_point)?;
        self.config.validate()?;
        let criterion = stopping_criterion.resolve(DEFAULT_MAX_ITERATIONS, T::DEFAULT_TOLERANCE)?;
        let mut first_step = StepController::new(self.config.step_factor)?;
        let cost_fn = CountingCostFunction::new(cost_fn);

        let mut x = initial_point.clone();
        let mut fx = cost_fn.cost(&x)?;
        let mut monitor = RunMonitor::start(NAME, &criterion, &x, fx);
        let mut iterations = 0;
        // Point and gradient of the previous iteration
        let mut previous: Option<(DVector<T>, DVector<T>)> = None;

        let reason = loop {
            if iterations >= criterion.max_iterations {
                break TerminationReason::MaxIterations;
            }

            let gradient = cost_fn.gradient(&x)?;
            if gradient.iter().all(|g| *g == T::zero()) {
                break TerminationReason::Converged;
            }
            let Some((unit, gradient_norm)) = normalize(&gradient) else {
                tracing::warn!(iteration = iterations, "gradient is not finite, stopping");
                break TerminationReason::NumericalDegeneracy;
            };
            let direction = -unit;

            let alpha = match &previous {
                None => first_step.next_step(&cost_fn, &x, &direction)?,
                Some((previous_point, previous_gradient)) => {
                    let dx = &x - previous_point;
                    let dg = &gradient - previous_gradient;
                    match bb_step(self.config.lambda, gradient_norm, &dx, &dg) {
                        Some(alpha) => alpha,
                        None => {
                            tracing::warn!(iteration = iterations, "gradient difference vanished, stopping");
                            break TerminationReason::NumericalDegeneracy;
                        }
                    }
                }
            };

            let x_next = &x + &direction * alpha;
            let f_next = cost_fn.cost(&x_next)?;
            if !<T as Float>::is_finite(f_next) {
                tracing::warn!(iteration = iterations, "objective is not finite at the next iterate, stopping");
                break TerminationReason::NumericalDegeneracy;
            }

            iterations += 1;
            monitor.record(&x_next, f_next);
            tracing::debug!(
                iteration = iterations,
                value = f_next.to_f64(),
                step = alpha.to_f64(),
                "barzilai-borwein step"
            );

            let done = should_terminate(fx, f_next, criterion.tolerance, criterion.mode);
            let x_prev = std::mem::replace(&mut x, x_next);
            fx = f_next;
            if done {
                break TerminationReason::Converged;
            }
            previous = Some((x_prev, gradient));
        };

        Ok(monitor.finish(&cost_fn, x, fx, iterations, reason))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use localopt_core::{
        cost_function::{FnCost, QuadraticCost},
        types::DMatrix,
    };

    #[test]
    fn test_bb_converges_on_quadratic() {
        let a = DMatrix::from_row_slice(2, 2, &[3.0, 1.0, 1.0, 2.0]);
        let minimizer = DVector::from_vec(vec![1.0, -2.0]);
        let cost_fn = QuadraticCost::centered(a, &minimizer);
        let x0 = DVector::from_vec(vec![5.0, 5.0]);

        let result = BarzilaiBorwein::<f64>::default()
            .optimize(&cost_fn, &x0, &StoppingCriterion::new())
            .unwrap();

        assert!(result.converged);
        assert!((&result.point - &minimizer).norm() < 1e-3);
    }

    #[test]
    fn test_bb_step_matches_classic_formula() {
        let dx = DVector::from_vec(vec![1.0, 0.0]);
        let dg = DVector::from_vec(vec![2.0, 0.0]);
        // |<dx, dg>| / ||dg||² = 0.5, scaled by ||g|| = 3 and λ = 2
        assert_relative_eq!(bb_step(2.0, 3.0, &dx, &dg).unwrap(), 3.0);
        assert!(bb_step(1.0, 3.0, &dx, &DVector::zeros(2)).is_none());
    }

    #[test]
    fn test_bb_stops_on_vanishing_gradient_difference() {
        // A linear function has a constant gradient, so Δg = 0 on the second step.
        let cost_fn = FnCost::new(|x: &DVector<f64>| x[0] + 2.0 * x[1])
            .with_gradient(|_: &DVector<f64>| DVector::from_vec(vec![1.0, 2.0]));
        let x0 = DVector::from_vec(vec![0.0, 0.0]);
        let config = BarzilaiBorweinConfig::new().with_step_factor(StepFactor::Constant(1.0));

        let result = BarzilaiBorwein::new(config)
            .optimize(&cost_fn, &x0, &StoppingCriterion::new())
            .unwrap();

        assert_eq!(result.termination_reason, TerminationReason::NumericalDegeneracy);
        assert_eq!(result.iterations, 1);
        assert!(!result.converged);
        assert_relative_eq!(result.value, -(5.0f64).sqrt());
    }

    #[test]
    fn test_bb_rejects_non_positive_lambda() {
        let config = BarzilaiBorweinConfig::<f64>::new().with_lambda(0.0);
        let mut optimizer = BarzilaiBorwein::new(config);
        let x0 = DVector::from_vec(vec![1.0]);

        assert!(optimizer
            .optimize(&QuadraticCost::simple(1), &x0, &StoppingCriterion::new())
            .is_err());
    }
}
