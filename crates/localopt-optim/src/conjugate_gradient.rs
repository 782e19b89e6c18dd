//! Nonlinear conjugate gradient.
//!
//! The first iteration is plain steepest descent. Later iterations mix the
//! previous direction into the new one,
//!
//! ```text
//! d_k = -g_k + β_k d_{k-1}
//! ```
//!
//! and take a step along `d_k` chosen by the configured [`StepFactor`].
//!
//! # Supported Methods
//!
//! - **Fletcher-Reeves (FR)**: β = ||g_k||² / ||g_{k-1}||²
//! - **Polak-Ribière (PR)**: β = <g_k, g_k - g_{k-1}> / ||g_{k-1}||²
//!
//! With `pr_plus` the Polak-Ribière β is clamped at zero. Whenever the mixed
//! direction fails to descend (`<d_k, g_k> >= 0`) the solver restarts from
//! the negative gradient.
//!
//! # References
//!
//! - Kochenderfer & Wheeler, "Algorithms for Optimization" (2019), §5.2
//! - Hager & Zhang, "A survey of nonlinear conjugate gradient methods" (2006)

use crate::{gradient_descent::DEFAULT_MAX_ITERATIONS, utils::RunMonitor};
use localopt_core::{
    cost_function::{CostFunction, CountingCostFunction},
    error::{OptimizerError, Result},
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

/// Formula for the conjugacy parameter β.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ConjugateGradientMethod {
    /// Fletcher-Reeves
    FletcherReeves,
    /// Polak-Ribière
    #[default]
    PolakRibiere,
}

impl ConjugateGradientMethod {
    fn solver_name(self) -> &'static str {
        match self {
            Self::FletcherReeves => "Conjugate Gradient (Fletcher-Reeves)",
            Self::PolakRibiere => "Conjugate Gradient (Polak-Ribiere)",
        }
    }
}

/// Configuration for the conjugate gradient solver.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConjugateGradientConfig<T> {
    /// The β formula
    pub method: ConjugateGradientMethod,
    /// Step-factor strategy
    pub step_factor: StepFactor<T>,
    /// Clamp the Polak-Ribière β at zero
    pub pr_plus: bool,
    /// Displacement applied when the first step leaves the initial point unchanged
    pub first_step_offset: T,
}

impl<T: Scalar> Default for ConjugateGradientConfig<T> {
    fn default() -> Self {
        Self {
            method: ConjugateGradientMethod::default(),
            step_factor: StepFactor::default(),
            pr_plus: false,
            first_step_offset: <T as Scalar>::from_f64(1e-6),
        }
    }
}

impl<T: Scalar> ConjugateGradientConfig<T> {
    /// Creates a configuration with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses the Fletcher-Reeves formula.
    pub fn with_fletcher_reeves(mut self) -> Self {
        self.method = ConjugateGradientMethod::FletcherReeves;
        self
    }

    /// Uses the Polak-Ribière formula.
    pub fn with_polak_ribiere(mut self) -> Self {
        self.method = ConjugateGradientMethod::PolakRibiere;
        self
    }

    /// Sets the β formula.
    pub fn with_method(mut self, method: ConjugateGradientMethod) -> Self {
        self.method = method;
        self
    }

    /// Sets the step-factor strategy.
    pub fn with_step_factor(mut self, step_factor: StepFactor<T>) -> Self {
        self.step_factor = step_factor;
        self
    }

    /// Enables or disables the PR+ clamp.
    pub fn with_pr_plus(mut self, pr_plus: bool) -> Self {
        self.pr_plus = pr_plus;
        self
    }

    /// Sets the first-step offset.
    pub fn with_first_step_offset(mut self, offset: T) -> Self {
        self.first_step_offset = offset;
        self
    }

    /// Checks the configuration.
    pub fn validate(&self) -> Result<()> {
        self.step_factor.validate()?;
        if self.first_step_offset <= T::zero() || !<T as Float>::is_finite(self.first_step_offset) {
            return Err(OptimizerError::invalid_configuration(
                "first-step offset must be positive and finite",
                "first_step_offset",
                self.first_step_offset.to_string(),
            ));
        }
        Ok(())
    }
}

/// Nonlinear conjugate gradient solver.
#[derive(Debug, Clone)]
pub struct ConjugateGradient<T: Scalar> {
    config: ConjugateGradientConfig<T>,
}

impl<T: Scalar> ConjugateGradient<T> {
    /// Creates a new optimizer.
    pub fn new(config: ConjugateGradientConfig<T>) -> Self {
        Self { config }
    }

    /// Creates a Fletcher-Reeves solver with default parameters.
    pub fn fletcher_reeves() -> Self {
        Self::new(ConjugateGradientConfig::new().with_fletcher_reeves())
    }

    /// Creates a Polak-Ribière solver with default parameters.
    pub fn polak_ribiere() -> Self {
        Self::new(ConjugateGradientConfig::new().with_polak_ribiere())
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ConjugateGradientConfig<T> {
        &self.config
    }

    fn beta(&self, gradient: &DVector<T>, previous_gradient: &DVector<T>) -> T {
        let denominator = previous_gradient.norm_squared();
        match self.config.method {
            ConjugateGradientMethod::FletcherReeves => gradient.norm_squared() / denominator,
            ConjugateGradientMethod::PolakRibiere => {
                let beta = gradient.dot(&(gradient - previous_gradient)) / denominator;
                if self.config.pr_plus {
                    <T as Float>::max(beta, T::zero())
                } else {
                    beta
                }
            }
        }
    }
}

impl<T: Scalar> Default for ConjugateGradient<T> {
    fn default() -> Self {
        Self::new(ConjugateGradientConfig::new())
    }
}

impl<T: Scalar> Optimizer<T> for ConjugateGradient<T> {
    fn name(&self) -> &str {
        self.config.method.solver_name()
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
        let mut steps = StepController::new(self.config.step_factor)?;
        let cost_fn = CountingCostFunction::new(cost_fn);
        let name = self.config.method.solver_name();

        let mut x = initial_point.clone();
        let mut fx = cost_fn.cost(&x)?;
        let mut monitor = RunMonitor::start(name, &criterion, &x, fx);
        let mut iterations = 0;
        // Gradient and direction of the previous iteration
        let mut previous: Option<(DVector<T>, DVector<T>)> = None;

        let reason = loop {
            if iterations >= criterion.max_iterations {
                break TerminationReason::MaxIterations;
            }

            let gradient = cost_fn.gradient(&x)?;
            if gradient.iter().all(|g| *g == T::zero()) {
                break TerminationReason::Converged;
            }
            if !gradient.iter().all(|g| <T as Float>::is_finite(*g)) {
                tracing::warn!(iteration = iterations, "gradient is not finite, stopping");
                break TerminationReason::NumericalDegeneracy;
            }

            let direction = match previous.take() {
                None => -&gradient,
                Some((previous_gradient, previous_direction)) => {
                    let beta = self.beta(&gradient, &previous_gradient);
                    let conjugate = previous_direction * beta - &gradient;
                    let slope = conjugate.dot(&gradient);
                    if slope < T::zero() && <T as Float>::is_finite(slope) {
                        conjugate
                    } else {
                        tracing::debug!(iteration = iterations, "not a descent direction, restarting");
                        -&gradient
                    }
                }
            };

            let alpha = steps.next_step(&cost_fn, &x, &direction)?;
            let mut x_next = &x + &direction * alpha;
            if iterations == 0 && x_next == x {
                tracing::warn!(
                    offset = self.config.first_step_offset.to_f64(),
                    "first step left the initial point unchanged, perturbing"
                );
                x_next = &x + &direction * (self.config.first_step_offset / direction.norm());
            }

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
                "conjugate gradient step"
            );

            let done = should_terminate(fx, f_next, criterion.tolerance, criterion.mode);
            x = x_next;
            fx = f_next;
            if done {
                break TerminationReason::Converged;
            }
            previous = Some((gradient, direction));
        };

        Ok(monitor.finish(&cost_fn, x, fx, iterations, reason))
    }
}
