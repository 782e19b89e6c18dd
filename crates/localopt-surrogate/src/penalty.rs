//! Penalty composition for constrained problems.
//!
//! Constraints are plain functions of the design point: inequalities are
//! satisfied when `g(x) <= 0`, equalities when `h(x) = 0`. A
//! [`PenalizedCost`] turns a constrained problem into the unconstrained
//! objective `f(x) + ρ p(x)` that any solver can minimize, and
//! [`PenaltyMethod`] repeats that minimization with a growing `ρ` until the
//! point is feasible.
//!
//! A constraint value that is NaN counts as violated.

use crate::error::Result;
use localopt_core::{
    cost_function::CostFunction,
    error::{OptimizerError, Result as CoreResult},
    optimization::optimizer::{OptimizationResult, Optimizer, StoppingCriterion},
    types::{DVector, Scalar},
};
use num_traits::Float;
use std::fmt::{self, Debug};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A boxed constraint function.
pub type ConstraintFn<T> = Box<dyn Fn(&DVector<T>) -> T + Send + Sync>;

/// How constraint violations are measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PenaltyKind {
    /// Number of violated constraints
    Count,
    /// `Σ max(g, 0)² + Σ h²`
    #[default]
    Quadratic,
}

/// A set of inequality and equality constraints.
pub struct Constraints<T: Scalar> {
    inequalities: Vec<ConstraintFn<T>>,
    equalities: Vec<ConstraintFn<T>>,
}

impl<T: Scalar> Default for Constraints<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar> Constraints<T> {
    /// Creates an empty constraint set.
    pub fn new() -> Self {
        Self {
            inequalities: Vec::new(),
            equalities: Vec::new(),
        }
    }

    /// Adds an inequality constraint `g(x) <= 0`.
    pub fn with_inequality<F>(mut self, g: F) -> Self
    where
        F: Fn(&DVector<T>) -> T + Send + Sync + 'static,
    {
        self.inequalities.push(Box::new(g));
        self
    }

    /// Adds an equality constraint `h(x) = 0`.
    pub fn with_equality<F>(mut self, h: F) -> Self
    where
        F: Fn(&DVector<T>) -> T + Send + Sync + 'static,
    {
        self.equalities.push(Box::new(h));
        self
    }

    /// Number of inequality constraints.
    pub fn num_inequalities(&self) -> usize {
        self.inequalities.len()
    }

    /// Number of equality constraints.
    pub fn num_equalities(&self) -> usize {
        self.equalities.len()
    }

    /// Returns `true` if there are no constraints.
    pub fn is_empty(&self) -> bool {
        self.inequalities.is_empty() && self.equalities.is_empty()
    }

    /// Number of violated constraints at `x`.
    ///
    /// Equalities are violated unless `h(x)` is exactly zero.
    pub fn count_penalty(&self, x: &DVector<T>) -> T {
        let violated = self.inequalities.iter().filter(|g| !(g(x) <= T::zero())).count()
            + self.equalities.iter().filter(|h| h(x) != T::zero()).count();
        <T as Scalar>::from_usize(violated)
    }

    /// Sum of squared violations at `x`.
    pub fn quadratic_penalty(&self, x: &DVector<T>) -> T {
        let inequality = self.inequalities.iter().fold(T::zero(), |acc, g| {
            let value = g(x);
            if value <= T::zero() {
                acc
            } else {
                acc + value * value
            }
        });
        self.equalities.iter().fold(inequality, |acc, h| {
            let value = h(x);
            acc + value * value
        })
    }

    /// Penalty of the given kind at `x`.
    pub fn penalty(&self, kind: PenaltyKind, x: &DVector<T>) -> T {
        match kind {
            PenaltyKind::Count => self.count_penalty(x),
            PenaltyKind::Quadratic => self.quadratic_penalty(x),
        }
    }
}

impl<T: Scalar> Debug for Constraints<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constraints")
            .field("inequalities", &self.inequalities.len())
            .field("equalities", &self.equalities.len())
            .finish()
    }
}

/// The unconstrained objective `f(x) + ρ p(x)`.
#[derive(Debug)]
pub struct PenalizedCost<'a, T: Scalar, C: ?Sized> {
    objective: &'a C,
    constraints: &'a Constraints<T>,
    rho: T,
    kind: PenaltyKind,
}

impl<'a, T, C> PenalizedCost<'a, T, C>
where
    T: Scalar,
    C: CostFunction<T> + ?Sized,
{
    /// Combines an objective with constraints, using `ρ = 1`.
    pub fn new(objective: &'a C, constraints: &'a Constraints<T>, kind: PenaltyKind) -> Self {
        Self {
            objective,
            constraints,
            rho: T::one(),
            kind,
        }
    }

    /// Sets the penalty weight ρ.
    pub fn with_rho(mut self, rho: T) -> Self {
        self.rho = rho;
        self
    }

    /// The penalty weight.
    pub fn rho(&self) -> T {
        self.rho
    }

    /// The penalty kind.
    pub fn kind(&self) -> PenaltyKind {
        self.kind
    }
}

impl<T, C> CostFunction<T> for PenalizedCost<'_, T, C>
where
    T: Scalar,
    C: CostFunction<T> + ?Sized,
{
    fn cost(&self, point: &DVector<T>) -> CoreResult<T> {
        let value = self.objective.cost(point)?;
        let penalty = self.constraints.penalty(self.kind, point);
        if penalty == T::zero() {
            return Ok(value);
        }
        Ok(value + self.rho * penalty)
    }
}

/// Outcome of a [`PenaltyMethod`] run.
#[derive(Debug, Clone)]
pub struct PenaltyResult<T: Scalar> {
    /// Result of the last inner minimization
    pub inner: OptimizationResult<T>,
    /// Unpenalized objective value at the final point
    pub objective_value: T,
    /// Penalty at the final point
    pub penalty: T,
    /// Penalty weight of the last round
    pub rho: T,
    /// Number of inner minimizations performed
    pub rounds: usize,
    /// Whether the final penalty is within the feasibility tolerance
    pub feasible: bool,
}

impl<T: Scalar> PenaltyResult<T> {
    /// The final design point.
    pub fn point(&self) -> &DVector<T> {
        &self.inner.point
    }
}

/// Sequential penalty method.
///
/// Each round minimizes `f(x) + ρ p(x)` from the previous round's point,
/// then multiplies ρ by the growth factor. The run stops once the penalty
/// drops to the feasibility tolerance or the round budget is spent.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PenaltyMethod<T> {
    /// Penalty measure
    pub kind: PenaltyKind,
    /// Penalty weight of the first round
    pub initial_rho: T,
    /// Factor applied to ρ after each round
    pub growth: T,
    /// Maximum number of rounds
    pub max_rounds: usize,
    /// Largest penalty accepted as feasible
    pub feasibility_tolerance: T,
}

impl<T: Scalar> Default for PenaltyMethod<T> {
    fn default() -> Self {
        Self {
            kind: PenaltyKind::Quadratic,
            initial_rho: T::one(),
            growth: <T as Scalar>::from_f64(2.0),
            max_rounds: 20,
            feasibility_tolerance: T::DEFAULT_TOLERANCE,
        }
    }
}

impl<T: Scalar> PenaltyMethod<T> {
    /// Creates a penalty method with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the penalty measure.
    pub fn with_kind(mut self, kind: PenaltyKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the initial penalty weight.
    pub fn with_initial_rho(mut self, rho: T) -> Self {
        self.initial_rho = rho;
        self
    }

    /// Sets the growth factor of ρ.
    pub fn with_growth(mut self, growth: T) -> Self {
        self.growth = growth;
        self
    }

    /// Sets the maximum number of rounds.
    pub fn with_max_rounds(mut self, rounds: usize) -> Self {
        self.max_rounds = rounds;
        self
    }

    /// Sets the feasibility tolerance.
    pub fn with_feasibility_tolerance(mut self, tolerance: T) -> Self {
        self.feasibility_tolerance = tolerance;
        self
    }

    /// Checks the parameters.
    pub fn validate(&self) -> CoreResult<()> {
        if self.initial_rho <= T::zero() || !<T as Float>::is_finite(self.initial_rho) {
            return Err(OptimizerError::invalid_configuration(
                "initial penalty weight must be positive and finite",
                "initial_rho",
                self.initial_rho.to_string(),
            ));
        }
        if !(self.growth >= T::one()) || !<T as Float>::is_finite(self.growth) {
            return Err(OptimizerError::invalid_configuration(
                "growth factor must be at least 1 and finite",
                "growth",
                self.growth.to_string(),
            ));
        }
        if self.max_rounds == 0 {
            return Err(OptimizerError::invalid_configuration(
                "at least one round is required",
                "max_rounds",
                "0",
            ));
        }
        if !(self.feasibility_tolerance >= T::zero()) {
            return Err(OptimizerError::invalid_configuration(
                "feasibility tolerance must be non-negative",
                "feasibility_tolerance",
                self.feasibility_tolerance.to_string(),
            ));
        }
        Ok(())
    }

    /// Minimizes `objective` subject to `constraints` with `optimizer`.
    ///
    /// `stopping_criterion` applies to every inner minimization.
    pub fn minimize<O, C>(
        &self,
        optimizer: &mut O,
        objective: &C,
        constraints: &Constraints<T>,
        initial_point: &DVector<T>,
        stopping_criterion: &StoppingCriterion<T>,
    ) -> Result<PenaltyResult<T>>
    where
        O: Optimizer<T>,
        C: CostFunction<T> + ?Sized,
    {
        self.validate()?;

        let mut x = initial_point.clone();
        let mut rho = self.initial_rho;
        let mut round = 0;
        loop {
            round += 1;
            let cost_fn = PenalizedCost::new(objective, constraints, self.kind).with_rho(rho);
            let inner = optimizer.optimize(&cost_fn, &x, stopping_criterion)?;
            x.copy_from(&inner.point);
            let penalty = constraints.penalty(self.kind, &x);
            let feasible = penalty <= self.feasibility_tolerance;

            tracing::debug!(
                round,
                rho = rho.to_f64(),
                penalty = penalty.to_f64(),
                inner_iterations = inner.iterations,
                "penalty round"
            );

            if feasible || round >= self.max_rounds {
                let objective_value = objective.cost(&x)?;
                tracing::info!(
                    solver = optimizer.name(),
                    rounds = round,
                    feasible,
                    value = objective_value.to_f64(),
                    "penalty method finished"
                );
                return Ok(PenaltyResult {
                    inner,
                    objective_value,
                    penalty,
                    rho,
                    rounds: round,
                    feasible,
                });
            }
            rho *= self.growth;
        }
    }
}
