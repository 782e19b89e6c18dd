//! Hooke-Jeeves pattern search.
//!
//! Each sweep probes `x ± α e_i` for every coordinate `i` in turn and moves
//! to an improving probe as soon as one is found, so later probes start from
//! the updated point. When `x - α e_i` improves, `x + α e_i` is skipped since
//! it would land back on the point just left. A sweep without improvement shrinks the step,
//! `α ← γ α`. The search converges when `α` drops below the tolerance.
//!
//! The iteration count of the result is the number of sweeps.

use crate::utils::RunMonitor;
use localopt_core::{
    cost_function::{CostFunction, CountingCostFunction},
    error::{OptimizerError, Result},
    numerical::basis,
    optimization::optimizer::{
        check_initial_point, OptimizationResult, Optimizer, StoppingCriterion, TerminationReason,
    },
    types::{DVector, Scalar},
};
use num_traits::Float;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default cap on the number of sweeps.
pub const DEFAULT_MAX_ITERATIONS: usize = 100_000;

const NAME: &str = "Hooke-Jeeves";

/// Configuration for Hooke-Jeeves pattern search.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HookeJeevesConfig<T> {
    /// Initial probe step α
    pub initial_step: T,
    /// Step reduction factor γ applied after an unsuccessful sweep
    pub step_reduction: T,
}

impl<T: Scalar> Default for HookeJeevesConfig<T> {
    fn default() -> Self {
        Self {
            initial_step: T::one(),
            step_reduction: <T as Scalar>::from_f64(0.5),
        }
    }
}

impl<T: Scalar> HookeJeevesConfig<T> {
    /// Creates a configuration with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial step.
    pub fn with_initial_step(mut self, step: T) -> Self {
        self.initial_step = step;
        self
    }

    /// Sets the step reduction factor.
    pub fn with_step_reduction(mut self, reduction: T) -> Self {
        self.step_reduction = reduction;
        self
    }

    /// Checks the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.initial_step <= T::zero() || !<T as Float>::is_finite(self.initial_step) {
            return Err(OptimizerError::invalid_configuration(
                "initial step must be positive and finite",
                "initial_step",
                self.initial_step.to_string(),
            ));
        }
        if self.step_reduction <= T::zero() || self.step_reduction >= T::one() {
            return Err(OptimizerError::invalid_configuration(
                "step reduction must lie in (0, 1)",
                "step_reduction",
                self.step_reduction.to_string(),
            ));
        }
        Ok(())
    }
}

/// Hooke-Jeeves pattern search.
#[derive(Debug, Clone)]
pub struct HookeJeeves<T: Scalar> {
    config: HookeJeevesConfig<T>,
}

impl<T: Scalar> HookeJeeves<T> {
    /// Creates a new optimizer.
    pub fn new(config: HookeJeevesConfig<T>) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &HookeJeevesConfig<T> {
        &self.config
    }
}

impl<T: Scalar> Default for HookeJeeves<T> {
    fn default() -> Self {
        Self::new(HookeJeevesConfig::new())
    }
}

impl<T: Scalar> Optimizer<T> for HookeJeeves<T> {
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
        let cost_fn = CountingCostFunction::new(cost_fn);

        let mut x = initial_point.clone();
        let mut fx = cost_fn.cost(&x)?;
        let mut monitor = RunMonitor::start(NAME, &criterion, &x, fx);
        let mut alpha = self.config.initial_step;
        let directions: Vec<DVector<T>> = (0..x.len()).map(|i| basis(i, x.len())).collect();
        let mut probe = x.clone();
        let mut iterations = 0;

        let reason = loop {
            if alpha <= criterion.tolerance {
                break TerminationReason::Converged;
            }
            if iterations >= criterion.max_iterations {
                break TerminationReason::MaxIterations;
            }

            let mut improved = false;
            for direction in &directions {
                for sign in [-T::one(), T::one()] {
                    probe.copy_from(&x);
                    probe.axpy(sign * alpha, direction, T::one());
                    let value = cost_fn.cost(&probe)?;
                    if value < fx {
                        x.copy_from(&probe);
                        fx = value;
                        improved = true;
                        break;
                    }
                }
            }

            if !improved {
                alpha *= self.config.step_reduction;
            }
            iterations += 1;
            monitor.record(&x, fx);
            tracing::debug!(
                iteration = iterations,
                value = fx.to_f64(),
                step = alpha.to_f64(),
                improved,
                "hooke-jeeves sweep"
            );
        };

        Ok(monitor.finish(&cost_fn, x, fx, iterations, reason))
    }
}
