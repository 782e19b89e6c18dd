//! Core optimizer traits and result types.
//!
//! Every solver in the workspace follows the same contract: given a cost
//! function, an initial design point and a [`StoppingCriterion`], it iterates
//! until its convergence test fires or its iteration budget runs out, and
//! returns an [`OptimizationResult`].
//!
//! # Stopping Criteria
//!
//! [`StoppingCriterion`] only records what the caller set explicitly. Each
//! solver documents its own defaults and merges them in once at entry with
//! [`StoppingCriterion::resolve`]. The tolerance has a solver-specific
//! meaning:
//!
//! - **Gradient-based solvers**: change in objective value between iterations
//! - **Nelder-Mead**: standard deviation of the simplex values
//! - **Hooke-Jeeves**: pattern step size
//!
//! # Trajectories
//!
//! With `record_trajectory` set, solvers keep every accepted iterate as an
//! [`ObjectivePoint`]. Otherwise only the current and previous iterates are
//! held in memory.
//!
//! # Failure Reporting
//!
//! Numerical degeneracy (zero gradient difference, collapsed simplex) is not
//! an error. The solver returns its last valid state with
//! [`TerminationReason::NumericalDegeneracy`].
//!
//! # Example
//!
//! ```rust,no_run
//! # use localopt_core::prelude::*;
//! # fn run<O: Optimizer<f64>>(mut optimizer: O) -> Result<()> {
//! let cost_fn = QuadraticCost::<f64>::simple(3);
//! let x0 = DVector::from_element(3, 1.0);
//! let criterion = StoppingCriterion::new()
//!     .with_max_iterations(500)
//!     .with_tolerance(1e-12)
//!     .with_trajectory();
//!
//! let result = optimizer.optimize(&cost_fn, &x0, &criterion)?;
//! if result.converged {
//!     println!("f({}) = {}", result.point, result.value);
//! }
//! # Ok(())
//! # }
//! ```

use crate::{
    cost_function::CostFunction,
    error::{OptimizerError, Result},
    optimization::termination::TerminationMode,
    types::{DVector, Scalar},
};
use num_traits::Float;
use std::fmt::Debug;
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A design point together with its objective value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ObjectivePoint<T: Scalar> {
    /// The design point
    pub point: DVector<T>,
    /// Objective value at `point`
    pub value: T,
}

impl<T: Scalar> ObjectivePoint<T> {
    /// Creates a new objective point.
    pub fn new(point: DVector<T>, value: T) -> Self {
        Self { point, value }
    }

    /// Evaluates `cost_fn` at `point`.
    pub fn evaluate<C>(cost_fn: &C, point: DVector<T>) -> Result<Self>
    where
        C: CostFunction<T> + ?Sized,
    {
        let value = cost_fn.cost(&point)?;
        Ok(Self { point, value })
    }
}

/// Ordered sequence of accepted iterates, from the initial guess to the
/// final point.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Trajectory<T: Scalar> {
    entries: Vec<ObjectivePoint<T>>,
}

impl<T: Scalar> Trajectory<T> {
    /// Creates an empty trajectory.
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Appends an iterate.
    pub fn push(&mut self, entry: ObjectivePoint<T>) {
        self.entries.push(entry);
    }

    /// Appends a copy of `point` with its value.
    pub fn push_point(&mut self, point: &DVector<T>, value: T) {
        self.entries.push(ObjectivePoint::new(point.clone(), value));
    }

    /// Number of recorded iterates.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The most recent iterate.
    pub fn last(&self) -> Option<&ObjectivePoint<T>> {
        self.entries.last()
    }

    /// Iterates over the recorded design points.
    pub fn points(&self) -> impl Iterator<Item = &DVector<T>> + '_ {
        self.entries.iter().map(|entry| &entry.point)
    }

    /// The recorded objective values in order.
    pub fn values(&self) -> Vec<T> {
        self.entries.iter().map(|entry| entry.value).collect()
    }

    /// All recorded iterates.
    pub fn as_slice(&self) -> &[ObjectivePoint<T>] {
        &self.entries
    }

    /// Iterates over the recorded iterates.
    pub fn iter(&self) -> std::slice::Iter<'_, ObjectivePoint<T>> {
        self.entries.iter()
    }
}

impl<'a, T: Scalar> IntoIterator for &'a Trajectory<T> {
    type Item = &'a ObjectivePoint<T>;
    type IntoIter = std::slice::Iter<'a, ObjectivePoint<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Why a solver stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TerminationReason {
    /// The convergence test fired (or a stationary point was reached)
    Converged,
    /// The iteration budget was exhausted
    MaxIterations,
    /// A numerical guard tripped; the last valid state is returned
    NumericalDegeneracy,
}

/// Outcome of an optimization run.
#[derive(Debug, Clone)]
pub struct OptimizationResult<T: Scalar> {
    /// Final design point
    pub point: DVector<T>,

    /// Objective value at `point`
    pub value: T,

    /// Number of completed iterations
    pub iterations: usize,

    /// Number of objective evaluations, including those made by line searches
    pub function_evaluations: usize,

    /// Number of gradient evaluations
    pub gradient_evaluations: usize,

    /// Wall-clock time spent in the solver
    pub duration: Duration,

    /// Why the solver stopped
    pub termination_reason: TerminationReason,

    /// True if the solver's convergence test fired
    pub converged: bool,

    /// Accepted iterates, when requested
    pub trajectory: Option<Trajectory<T>>,
}

impl<T: Scalar> OptimizationResult<T> {
    /// Creates a new optimization result.
    pub fn new(
        point: DVector<T>,
        value: T,
        iterations: usize,
        duration: Duration,
        termination_reason: TerminationReason,
    ) -> Self {
        Self {
            point,
            value,
            iterations,
            function_evaluations: 0,
            gradient_evaluations: 0,
            duration,
            converged: termination_reason == TerminationReason::Converged,
            termination_reason,
            trajectory: None,
        }
    }

    /// Sets the function evaluation count.
    pub fn with_function_evaluations(mut self, count: usize) -> Self {
        self.function_evaluations = count;
        self
    }

    /// Sets the gradient evaluation count.
    pub fn with_gradient_evaluations(mut self, count: usize) -> Self {
        self.gradient_evaluations = count;
        self
    }

    /// Attaches a recorded trajectory.
    pub fn with_trajectory(mut self, trajectory: Option<Trajectory<T>>) -> Self {
        self.trajectory = trajectory;
        self
    }

    /// The final point and value as an [`ObjectivePoint`].
    pub fn objective_point(&self) -> ObjectivePoint<T> {
        ObjectivePoint::new(self.point.clone(), self.value)
    }
}

/// Run-level options of a solver.
///
/// Absent fields are filled in by the solver's own defaults.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StoppingCriterion<T> {
    /// Maximum number of iterations
    pub max_iterations: Option<usize>,

    /// Convergence tolerance (meaning depends on the solver)
    pub tolerance: Option<T>,

    /// Absolute or relative change test for gradient-based solvers
    pub mode: Option<TerminationMode>,

    /// Keep every accepted iterate
    pub record_trajectory: bool,
}

impl<T> Default for StoppingCriterion<T> {
    fn default() -> Self {
        Self {
            max_iterations: None,
            tolerance: None,
            mode: None,
            record_trajectory: false,
        }
    }
}

impl<T: Scalar> StoppingCriterion<T> {
    /// Creates a criterion that defers to the solver's defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of iterations.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }

    /// Sets the convergence tolerance.
    pub fn with_tolerance(mut self, tolerance: T) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    /// Sets the termination mode.
    pub fn with_mode(mut self, mode: TerminationMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Requests the full trajectory.
    pub fn with_trajectory(mut self) -> Self {
        self.record_trajectory = true;
        self
    }

    /// Merges the solver defaults into the explicitly set fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting tolerance is negative or not finite.
    pub fn resolve(
        &self,
        default_max_iterations: usize,
        default_tolerance: T,
    ) -> Result<ResolvedCriterion<T>> {
        let tolerance = self.tolerance.unwrap_or(default_tolerance);
        if tolerance < T::zero() || !<T as Float>::is_finite(tolerance) {
            return Err(OptimizerError::invalid_configuration(
                "tolerance must be non-negative and finite",
                "tolerance",
                tolerance.to_string(),
            ));
        }

        Ok(ResolvedCriterion {
            max_iterations: self.max_iterations.unwrap_or(default_max_iterations),
            tolerance,
            mode: self.mode.unwrap_or_default(),
            record_trajectory: self.record_trajectory,
        })
    }
}

/// A [`StoppingCriterion`] with every field decided.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedCriterion<T> {
    /// Maximum number of iterations
    pub max_iterations: usize,
    /// Convergence tolerance
    pub tolerance: T,
    /// Termination mode
    pub mode: TerminationMode,
    /// Keep every accepted iterate
    pub record_trajectory: bool,
}

impl<T: Scalar> ResolvedCriterion<T> {
    /// An empty trajectory if recording was requested.
    pub fn new_trajectory(&self) -> Option<Trajectory<T>> {
        self.record_trajectory.then(Trajectory::new)
    }
}

/// Common interface of the local solvers.
///
/// Implementations are sequential and stateless across runs: all working
/// state is created inside [`optimize`](Optimizer::optimize).
pub trait Optimizer<T>: Debug
where
    T: Scalar,
{
    /// Human-readable name of the algorithm, used in logs.
    fn name(&self) -> &str;

    /// Minimizes `cost_fn` starting from `initial_point`.
    ///
    /// # Errors
    ///
    /// Returns errors for invalid configuration, an empty initial point or a
    /// failing cost function. Numerical degeneracy is reported through
    /// [`OptimizationResult::termination_reason`] instead.
    fn optimize<C>(
        &mut self,
        cost_fn: &C,
        initial_point: &DVector<T>,
        stopping_criterion: &StoppingCriterion<T>,
    ) -> Result<OptimizationResult<T>>
    where
        C: CostFunction<T> + ?Sized;
}

/// Rejects zero-dimensional initial points.
pub fn check_initial_point<T: Scalar>(initial_point: &DVector<T>) -> Result<()> {
    if initial_point.is_empty() {
        return Err(OptimizerError::dimension_mismatch("at least 1", 0));
    }
    if initial_point.iter().any(|v| !<T as Float>::is_finite(*v)) {
        return Err(OptimizerError::numerical_error("initial point contains non-finite entries"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost_function::QuadraticCost;

    #[test]
    fn test_criterion_resolves_defaults() {
        let resolved = StoppingCriterion::<f64>::new().resolve(200, 1e-10).unwrap();
        assert_eq!(resolved.max_iterations, 200);
        assert_eq!(resolved.tolerance, 1e-10);
        assert_eq!(resolved.mode, TerminationMode::Absolute);
        assert!(!resolved.record_trajectory);
        assert!(resolved.new_trajectory().is_none());
    }

    #[test]
    fn test_criterion_explicit_fields_win() {
        let criterion = StoppingCriterion::new()
            .with_max_iterations(7)
            .with_tolerance(1e-3)
            .with_mode(TerminationMode::Relative)
            .with_trajectory();
        let resolved = criterion.resolve(200, 1e-10).unwrap();

        assert_eq!(resolved.max_iterations, 7);
        assert_eq!(resolved.tolerance, 1e-3);
        assert_eq!(resolved.mode, TerminationMode::Relative);
        assert!(resolved.new_trajectory().is_some());
    }

    #[test]
    fn test_criterion_rejects_bad_tolerance() {
        assert!(StoppingCriterion::new().with_tolerance(-1.0).resolve(10, 1e-10).is_err());
        assert!(StoppingCriterion::new().with_tolerance(f64::NAN).resolve(10, 1e-10).is_err());
    }

    #[test]
    fn test_trajectory_accessors() {
        let mut trajectory = Trajectory::new();
        assert!(trajectory.is_empty());

        trajectory.push_point(&DVector::from_vec(vec![1.0, 2.0]), 5.0);
        trajectory.push(ObjectivePoint::new(DVector::from_vec(vec![0.0, 0.0]), 0.0));

        assert_eq!(trajectory.len(), 2);
        assert_eq!(trajectory.values(), vec![5.0, 0.0]);
        assert_eq!(trajectory.points().count(), 2);
        assert_eq!(trajectory.last().map(|p| p.value), Some(0.0));
        assert_eq!((&trajectory).into_iter().count(), 2);
    }

    #[test]
    fn test_result_converged_flag_follows_reason() {
        let point = DVector::from_vec(vec![0.0]);
        let converged = OptimizationResult::new(point.clone(), 0.0, 3, Duration::ZERO, TerminationReason::Converged);
        let capped = OptimizationResult::new(point.clone(), 0.0, 3, Duration::ZERO, TerminationReason::MaxIterations);
        let degenerate = OptimizationResult::new(point, 0.0, 3, Duration::ZERO, TerminationReason::NumericalDegeneracy);

        assert!(converged.converged);
        assert!(!capped.converged);
        assert!(!degenerate.converged);
    }

    #[test]
    fn test_objective_point_evaluate() {
        let cost = QuadraticCost::<f64>::simple(2);
        let point = ObjectivePoint::evaluate(&cost, DVector::from_vec(vec![1.0, 1.0])).unwrap();
        assert_eq!(point.value, 1.0);
    }

    #[test]
    fn test_check_initial_point() {
        assert!(check_initial_point(&DVector::<f64>::zeros(0)).is_err());
        assert!(check_initial_point(&DVector::from_vec(vec![f64::NAN])).is_err());
        assert!(check_initial_point(&DVector::from_vec(vec![1.0])).is_ok());
    }
}
