//! Bookkeeping shared by the solvers.
//!
//! Every solver records the same things: elapsed time, evaluation counts,
//! the optional trajectory, and a log line when it stops.

use localopt_core::{
    cost_function::{CostFunction, CountingCostFunction},
    optimization::optimizer::{OptimizationResult, ResolvedCriterion, TerminationReason, Trajectory},
    types::{DVector, Scalar},
};
use std::time::Instant;

/// Timer, trajectory and final report of a single run.
#[derive(Debug)]
pub(crate) struct RunMonitor<T: Scalar> {
    name: &'static str,
    start: Instant,
    trajectory: Option<Trajectory<T>>,
}

impl<T: Scalar> RunMonitor<T> {
    /// Starts the clock and records the initial iterate.
    pub(crate) fn start(
        name: &'static str,
        criterion: &ResolvedCriterion<T>,
        initial_point: &DVector<T>,
        initial_value: T,
    ) -> Self {
        tracing::debug!(
            solver = name,
            dimension = initial_point.len(),
            max_iterations = criterion.max_iterations,
            tolerance = criterion.tolerance.to_f64(),
            initial_value = initial_value.to_f64(),
            "starting optimization"
        );
        let mut monitor = Self {
            name,
            start: Instant::now(),
            trajectory: criterion.new_trajectory(),
        };
        monitor.record(initial_point, initial_value);
        monitor
    }

    /// Records an accepted iterate when a trajectory was requested.
    pub(crate) fn record(&mut self, point: &DVector<T>, value: T) {
        if let Some(trajectory) = self.trajectory.as_mut() {
            trajectory.push_point(point, value);
        }
    }

    /// Logs the outcome and assembles the result.
    pub(crate) fn finish<C>(
        self,
        cost_fn: &CountingCostFunction<C>,
        point: DVector<T>,
        value: T,
        iterations: usize,
        reason: TerminationReason,
    ) -> OptimizationResult<T>
    where
        C: CostFunction<T>,
    {
        let (function_evaluations, gradient_evaluations) = cost_fn.counts();
        let duration = self.start.elapsed();

        tracing::info!(
            solver = self.name,
            ?reason,
            iterations,
            value = value.to_f64(),
            function_evaluations,
            gradient_evaluations,
            elapsed_ms = duration.as_secs_f64() * 1e3,
            "optimization finished"
        );

        OptimizationResult::new(point, value, iterations, duration, reason)
            .with_function_evaluations(function_evaluations)
            .with_gradient_evaluations(gradient_evaluations)
            .with_trajectory(self.trajectory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use localopt_core::{cost_function::QuadraticCost, optimization::optimizer::StoppingCriterion};

    #[test]
    fn test_monitor_records_only_when_requested() {
        let cost = CountingCostFunction::new(QuadraticCost::<f64>::simple(1));
        let x = DVector::from_vec(vec![1.0]);

        let silent = StoppingCriterion::new().resolve(10, 1e-10).unwrap();
        let monitor = RunMonitor::start("test", &silent, &x, 0.5);
        let result = monitor.finish(&cost, x.clone(), 0.5, 0, TerminationReason::Converged);
        assert!(result.trajectory.is_none());

        let recording = StoppingCriterion::new().with_trajectory().resolve(10, 1e-10).unwrap();
        let mut monitor = RunMonitor::start("test", &recording, &x, 0.5);
        monitor.record(&x, 0.25);
        let result = monitor.finish(&cost, x, 0.25, 1, TerminationReason::MaxIterations);
        assert_eq!(result.trajectory.map(|t| t.values()), Some(vec![0.5, 0.25]));
        assert!(!result.converged);
    }
}
