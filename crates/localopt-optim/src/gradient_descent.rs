//! Gradient descent.
//!
//! Each iteration moves along the normalized negative gradient,
//!
//! ```text
//! d_k = -∇f(x_k) / ||∇f(x_k)||
//! x_{k+1} = x_k + α_k d_k
//! ```
//!
//! with the step factor `α_k` chosen by a [`StepFactor`] strategy (exact line
//! search by default). The run stops when consecutive objective values agree
//! to within the tolerance, when the gradient vanishes, or after the
//! iteration budget.
//!
//! # Defaults
//!
//! - max iterations: 200
//! - tolerance: `Scalar::DEFAULT_TOLERANCE` (1e-10 for f64), absolute mode
//! - step factor: line search

use crate::utils::RunMonitor;
use localopt_core::{
    cost_function::{CostFunction, CountingCostFunction},
    error::Result,
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

/// Default iteration budget of the gradient-based solvers.
pub const DEFAULT_MAX_ITERATIONS: usize = 200;

const NAME: &str = "Gradient Descent";

/// Configuration for gradient descent.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GradientDescentConfig<T> {
    /// Step-factor strategy
    pub step_factor: StepFactor<T>,
}

impl<T: Scalar> Default for GradientDescentConfig<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar> GradientDescentConfig<T> {
    /// Creates a configuration with default parameters.
    pub fn new() -> Self {
        Self {
            step_factor: StepFactor::default(),
        }
    }

    /// Sets the step-factor strategy.
    pub fn with_step_factor(mut self, step_factor: StepFactor<T>) -> Self {
        self.step_factor = step_factor;
        self
    }

    /// Uses a fixed step factor.
    pub fn with_constant_step(mut self, alpha: T) -> Self {
        self.step_factor = StepFactor::Constant(alpha);
        self
    }

    /// Uses an exponentially decaying step factor.
    pub fn with_decay(mut self, initial: T, rate: T) -> Self {
        self.step_factor = StepFactor::Decay { initial, rate };
        self
    }
}

/// Steepest descent with a pluggable step-factor strategy.
#[derive(Debug, Clone)]
pub struct GradientDescent<T: Scalar> {
    config: GradientDescentConfig<T>,
}

impl<T: Scalar> GradientDescent<T> {
    /// Creates a new optimizer.
    pub fn new(config: GradientDescentConfig<T>) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &GradientDescentConfig<T> {
        &self.config
    }
}

impl<T: Scalar> Default for GradientDescent<T> {
    fn default() -> Self {
        Self::new(GradientDescentConfig::new())
    }
}

impl<T: Scalar> Optimizer<T> for GradientDescent<T> {
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
        let criterion = stopping_criterion.resolve(DEFAULT_MAX_ITERATIONS, T::DEFAULT_TOLERANCE)?;
        let mut steps = StepController::new(self.config.step_factor)?;
        let cost_fn = CountingCostFunction::new(cost_fn);

        let mut x = initial_point.clone();
        let mut fx = cost_fn.cost(&x)?;
        let mut monitor = RunMonitor::start(NAME, &criterion, &x, fx);
        let mut iterations = 0;

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

            let alpha = steps.next_step(&cost_fn, &x, &direction)?;
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
                gradient_norm = gradient_norm.to_f64(),
                "gradient descent step"
            );

            let done = should_terminate(fx, f_next, criterion.tolerance, criterion.mode);
            x = x_next;
            fx = f_next;
            if done {
                break TerminationReason::Converged;
            }
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
        error::OptimizerError,
        types::DMatrix,
    };

    fn skewed_quadratic() -> (QuadraticCost<f64>, DVector<f64>) {
        let a = DMatrix::from_row_slice(2, 2, &[3.0, 1.0, 1.0, 2.0]);
        let minimizer = DVector::from_vec(vec![1.0, -2.0]);
        (QuadraticCost::centered(a, &minimizer), minimizer)
    }

    #[test]
    fn test_gd_line_search_converges_on_quadratic() {
        let (cost_fn, minimizer) = skewed_quadratic();
        let x0 = DVector::from_vec(vec![5.0, 5.0]);
        let mut optimizer = GradientDescent::<f64>::default();

        let result = optimizer.optimize(&cost_fn, &x0, &StoppingCriterion::new()).unwrap();

        assert!(result.converged);
        assert!(result.iterations < DEFAULT_MAX_ITERATIONS);
        assert!((&result.point - &minimizer).norm() < 1e-3);
        assert!(result.function_evaluations > result.iterations);
        assert_eq!(result.gradient_evaluations, result.iterations);
    }

    #[test]
    fn test_gd_decay_strategy() {
        let cost_fn = FnCost::new(|x: &DVector<f64>| x[0] * x[0]);
        let x0 = DVector::from_vec(vec![3.0]);
        let mut optimizer = GradientDescent::new(GradientDescentConfig::new().with_decay(1.0, 0.9));

        let result = optimizer.optimize(&cost_fn, &x0, &StoppingCriterion::new()).unwrap();

        assert!(result.point[0].abs() < 1e-3);
    }

    #[test]
    fn test_gd_constant_step_moves_by_exactly_alpha() {
        let cost_fn = QuadraticCost::<f64>::simple(2);
        let x0 = DVector::from_vec(vec![10.0, 0.0]);
        let mut optimizer = GradientDescent::new(GradientDescentConfig::new().with_constant_step(0.5));
        let criterion = StoppingCriterion::new().with_max_iterations(3).with_trajectory();

        let result = optimizer.optimize(&cost_fn, &x0, &criterion).unwrap();

        assert_eq!(result.termination_reason, TerminationReason::MaxIterations);
        assert_eq!(result.iterations, 3);
        assert_relative_eq!(result.point[0], 8.5);
        let trajectory = result.trajectory.unwrap();
        assert_eq!(trajectory.len(), 4);
        assert_relative_eq!(trajectory.as_slice()[1].point[0], 9.5);
    }

    #[test]
    fn test_gd_stationary_start_converges_immediately() {
        let cost_fn = QuadraticCost::<f64>::simple(3);
        let x0 = DVector::zeros(3);
        let mut optimizer = GradientDescent::<f64>::default();

        let result = optimizer.optimize(&cost_fn, &x0, &StoppingCriterion::new()).unwrap();

        assert!(result.converged);
        assert_eq!(result.iterations, 0);
        assert_eq!(result.point, x0);
    }

    #[test]
    fn test_gd_invalid_step_factor_is_rejected() {
        let cost_fn = QuadraticCost::<f64>::simple(1);
        let x0 = DVector::from_vec(vec![1.0]);
        let mut optimizer = GradientDescent::new(GradientDescentConfig::new().with_constant_step(-1.0));

        assert!(matches!(
            optimizer.optimize(&cost_fn, &x0, &StoppingCriterion::new()),
            Err(OptimizerError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_gd_finite_difference_gradient() {
        let cost_fn = FnCost::new(|x: &DVector<f64>| (x[0] - 1.0).powi(2) + 4.0 * (x[1] + 1.0).powi(2));
        let x0 = DVector::from_vec(vec![0.0, 0.0]);
        let mut optimizer = GradientDescent::<f64>::default();

        let result = optimizer
            .optimize(&cost_fn, &x0, &StoppingCriterion::new().with_max_iterations(1000))
            .unwrap();

        assert!(result.converged);
        assert_relative_eq!(result.point[0], 1.0, epsilon = 1e-3);
        assert_relative_eq!(result.point[1], -1.0, epsilon = 1e-3);
    }
}
