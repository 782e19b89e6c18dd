//! Step-factor strategies for gradient-based solvers.
//!
//! A gradient-based solver moves from `x` to `x + α d` along a descent
//! direction `d`. The scalar `α` is chosen by one of three strategies:
//!
//! - **Line search**: `α = argmin f(x + α d)` computed by
//!   [`line_search`](crate::optimization::line_search::line_search)
//! - **Exponential decay**: `αₖ = α₀ γᵏ`; the current factor is used, then
//!   multiplied by `γ`
//! - **Constant**: a fixed `α`
//!
//! The strategy is chosen once per run with [`StepFactor`] and turned into a
//! stateful [`StepController`] at solver entry.

use crate::{
    cost_function::CostFunction,
    error::{OptimizerError, Result},
    optimization::line_search::{line_search, LineSearchParams},
    types::{DVector, Scalar},
};
use num_traits::Float;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Step-factor strategy of a gradient-based solver.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StepFactor<T> {
    /// Exact line search along the descent direction
    LineSearch(LineSearchParams<T>),
    /// Exponentially decaying factor `αₖ = initial · rateᵏ`
    Decay {
        /// Factor used on the first iteration
        initial: T,
        /// Multiplier applied after every iteration, in `(0, 1]`
        rate: T,
    },
    /// Fixed step factor
    Constant(T),
}

impl<T: Scalar> Default for StepFactor<T> {
    fn default() -> Self {
        Self::LineSearch(LineSearchParams::default())
    }
}

impl<T: Scalar> StepFactor<T> {
    /// Line search with default parameters.
    pub fn line_search() -> Self {
        Self::default()
    }

    /// Exponential decay starting from `initial`.
    pub fn decay(initial: T, rate: T) -> Self {
        Self::Decay { initial, rate }
    }

    /// Fixed step factor.
    pub fn constant(alpha: T) -> Self {
        Self::Constant(alpha)
    }

    /// Validates the strategy parameters.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::LineSearch(params) => params.validate(),
            Self::Decay { initial, rate } => {
                check_positive(*initial, "initial")?;
                if *rate <= T::zero() || *rate > T::one() || !<T as Float>::is_finite(*rate) {
                    return Err(OptimizerError::invalid_configuration(
                        "decay rate must lie in (0, 1]",
                        "rate",
                        rate.to_string(),
                    ));
                }
                Ok(())
            }
            Self::Constant(alpha) => check_positive(*alpha, "step_factor"),
        }
    }
}

fn check_positive<T: Scalar>(value: T, parameter: &str) -> Result<()> {
    if value > T::zero() && <T as Float>::is_finite(value) {
        Ok(())
    } else {
        Err(OptimizerError::invalid_configuration(
            "step factor must be positive and finite",
            parameter,
            value.to_string(),
        ))
    }
}

/// Per-run state of a [`StepFactor`] strategy.
#[derive(Debug, Clone)]
pub struct StepController<T> {
    strategy: StepFactor<T>,
}

impl<T: Scalar> StepController<T> {
    /// Validates `strategy` and prepares it for a run.
    pub fn new(strategy: StepFactor<T>) -> Result<Self> {
        strategy.validate()?;
        Ok(Self { strategy })
    }

    /// Returns the step factor for moving from `x` along `direction`.
    ///
    /// Only the line-search strategy evaluates `cost_fn`.
    pub fn next_step<C>(&mut self, cost_fn: &C, x: &DVector<T>, direction: &DVector<T>) -> Result<T>
    where
        C: CostFunction<T> + ?Sized,
    {
        match &mut self.strategy {
            StepFactor::LineSearch(params) => line_search(cost_fn, x, direction, params),
            StepFactor::Decay { initial, rate } => {
                let alpha = *initial;
                *initial *= *rate;
                Ok(alpha)
            }
            StepFactor::Constant(alpha) => Ok(*alpha),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost_function::QuadraticCost;
    use approx::assert_relative_eq;

    #[test]
    fn test_decay_uses_current_then_shrinks() {
        let cost = QuadraticCost::<f64>::simple(1);
        let x = DVector::from_vec(vec![1.0]);
        let d = DVector::from_vec(vec![-1.0]);
        let mut controller = StepController::new(StepFactor::decay(1.0, 0.5)).unwrap();

        let steps: Vec<f64> = (0..4).map(|_| controller.next_step(&cost, &x, &d).unwrap()).collect();
        assert_eq!(steps, vec![1.0, 0.5, 0.25, 0.125]);
    }

    #[test]
    fn test_constant_step() {
        let cost = QuadraticCost::<f64>::simple(1);
        let x = DVector::from_vec(vec![1.0]);
        let d = DVector::from_vec(vec![-1.0]);
        let mut controller = StepController::new(StepFactor::constant(0.3)).unwrap();

        assert_eq!(controller.next_step(&cost, &x, &d).unwrap(), 0.3);
        assert_eq!(controller.next_step(&cost, &x, &d).unwrap(), 0.3);
    }

    #[test]
    fn test_line_search_step() {
        let cost = QuadraticCost::<f64>::simple(2);
        let x = DVector::from_vec(vec![3.0, 0.0]);
        let d = DVector::from_vec(vec![-1.0, 0.0]);
        let mut controller = StepController::new(StepFactor::line_search()).unwrap();

        assert_relative_eq!(controller.next_step(&cost, &x, &d).unwrap(), 3.0, epsilon = 1e-6);
    }

    #[test]
    fn test_invalid_strategies_rejected() {
        assert!(StepController::new(StepFactor::<f64>::constant(0.0)).is_err());
        assert!(StepController::new(StepFactor::<f64>::constant(f64::INFINITY)).is_err());
        assert!(StepController::new(StepFactor::<f64>::decay(1.0, 0.0)).is_err());
        assert!(StepController::new(StepFactor::<f64>::decay(1.0, 1.5)).is_err());
        assert!(StepController::new(StepFactor::<f64>::decay(-1.0, 0.5)).is_err());
        assert!(StepController::new(StepFactor::LineSearch(
            LineSearchParams::<f64>::default().with_expansion(1.0)
        ))
        .is_err());
    }

    #[test]
    fn test_default_is_line_search() {
        assert!(matches!(StepFactor::<f64>::default(), StepFactor::LineSearch(_)));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_step_factor_serde() {
        let factor = StepFactor::<f64>::decay(0.5, 0.9);
        let json = serde_json::to_string(&factor).unwrap();
        let restored: StepFactor<f64> = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, factor);
    }
}
