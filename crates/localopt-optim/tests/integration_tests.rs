//! Integration tests for localopt-optim
//!
//! Every solver is run on the same convex quadratic and, for the
//! derivative-free methods, on the Rosenbrock valley.

use localopt_core::{
    cost_function::{CostFunction, CountingCostFunction, FnCost},
    error::Result,
    test_utils::{Booth, Rosenbrock},
    types::{DMatrix, DVector},
};
use localopt_optim::{
    BarzilaiBorwein, ConjugateGradient, ConjugateGradientConfig, CrossEntropy, CrossEntropyConfig, GradientDescent,
    GradientDescentConfig, HookeJeeves, NelderMead, NelderMeadConfig, OptimizationResult, Optimizer, StepFactor,
    StoppingCriterion, TerminationReason,
};
use pretty_assertions::assert_eq;

/// f(x) = (x - x*)ᵀ A (x - x*)
#[derive(Debug)]
struct ShiftedQuadratic {
    a: DMatrix<f64>,
    minimizer: DVector<f64>,
}

impl ShiftedQuadratic {
    fn new() -> Self {
        Self {
            a: DMatrix::from_row_slice(2, 2, &[3.0, 1.0, 1.0, 2.0]),
            minimizer: DVector::from_vec(vec![1.0, -2.0]),
        }
    }
}

impl CostFunction<f64> for ShiftedQuadratic {
    fn cost(&self, x: &DVector<f64>) -> Result<f64> {
        let e = x - &self.minimizer;
        Ok(e.dot(&(&self.a * &e)))
    }

    fn gradient(&self, x: &DVector<f64>) -> Result<DVector<f64>> {
        Ok(&self.a * (x - &self.minimizer) * 2.0)
    }
}

fn run<O: Optimizer<f64>>(optimizer: &mut O, criterion: &StoppingCriterion<f64>) -> OptimizationResult<f64> {
    let cost_fn = ShiftedQuadratic::new();
    let x0 = DVector::from_vec(vec![5.0, 5.0]);
    let result = optimizer.optimize(&cost_fn, &x0, criterion).unwrap();
    let error = (&result.point - &cost_fn.minimizer).norm();
    assert!(error < 1e-3, "{} stopped {} away from the minimizer", optimizer.name(), error);
    result
}

#[test]
fn test_all_solvers_converge_on_convex_quadratic() {
    let criterion = StoppingCriterion::new();

    for result in [
        run(&mut GradientDescent::<f64>::default(), &criterion),
        run(&mut ConjugateGradient::<f64>::fletcher_reeves(), &criterion),
        run(&mut ConjugateGradient::<f64>::polak_ribiere(), &criterion),
        run(&mut BarzilaiBorwein::<f64>::default(), &criterion),
        run(&mut NelderMead::new(NelderMeadConfig::new().with_seed(2024)), &criterion),
        run(&mut HookeJeeves::<f64>::default(), &criterion),
    ] {
        assert_eq!(result.termination_reason, TerminationReason::Converged);
    }

    let result = run(
        &mut CrossEntropy::new(CrossEntropyConfig::new().with_seed(2024)),
        &criterion,
    );
    assert_eq!(result.termination_reason, TerminationReason::MaxIterations);
    assert_eq!(result.iterations, 200);
}

#[test]
fn test_trajectory_starts_at_initial_point_and_ends_at_result() {
    let criterion = StoppingCriterion::new().with_trajectory();
    let result = run(&mut ConjugateGradient::<f64>::polak_ribiere(), &criterion);

    let trajectory = result.trajectory.as_ref().unwrap();
    assert_eq!(trajectory.len(), result.iterations + 1);
    assert_eq!(trajectory.as_slice()[0].point, DVector::from_vec(vec![5.0, 5.0]));
    assert_eq!(trajectory.last().unwrap().point, result.point);
}

#[test]
fn test_derivative_free_solvers_on_rosenbrock() {
    let cost_fn = Rosenbrock::<f64>::default();
    let x0 = DVector::from_vec(vec![-5.0, 10.0]);
    let target = cost_fn.minimizer(2);

    let nm = NelderMead::new(NelderMeadConfig::new().with_seed(7))
        .optimize(&cost_fn, &x0, &StoppingCriterion::new().with_max_iterations(1000))
        .unwrap();
    assert!((&nm.point - &target).norm() < 0.1, "Nelder-Mead ended at {}", nm.point);

    let hj = HookeJeeves::<f64>::default()
        .optimize(&cost_fn, &x0, &StoppingCriterion::new())
        .unwrap();
    assert!((&hj.point - &target).norm() < 0.1, "Hooke-Jeeves ended at {}", hj.point);
}

#[test]
fn test_nelder_mead_default_budget_on_rosenbrock() {
    let cost_fn = Rosenbrock::<f64>::default();
    let x0 = DVector::from_vec(vec![-5.0, 10.0]);

    let result = NelderMead::new(NelderMeadConfig::new().with_seed(7))
        .optimize(&cost_fn, &x0, &StoppingCriterion::new())
        .unwrap();

    assert_eq!(result.termination_reason, TerminationReason::Converged);
    assert!(result.iterations < 200);
    let error = (&result.point - &cost_fn.minimizer(2)).norm();
    assert!(error < 1e-3, "Nelder-Mead stopped {error} away from (1, 1)");
}

#[test]
fn test_solvers_accept_trait_objects() {
    let booth = Booth;
    let cost_fn: &dyn CostFunction<f64> = &booth;
    let x0 = DVector::from_vec(vec![0.0, 0.0]);

    let result = ConjugateGradient::new(ConjugateGradientConfig::new().with_pr_plus(true))
        .optimize(cost_fn, &x0, &StoppingCriterion::new())
        .unwrap();

    assert!((result.point[0] - 1.0).abs() < 1e-3);
    assert!((result.point[1] - 3.0).abs() < 1e-3);
}

#[test]
fn test_evaluation_counts_match_a_counting_wrapper() {
    let cost_fn = FnCost::new(|x: &DVector<f64>| (x[0] - 2.0).powi(2))
        .with_gradient(|x: &DVector<f64>| DVector::from_vec(vec![2.0 * (x[0] - 2.0)]));
    let counter = CountingCostFunction::new(cost_fn);
    let x0 = DVector::from_vec(vec![0.0]);
    let mut optimizer = GradientDescent::new(GradientDescentConfig::new().with_step_factor(StepFactor::Constant(0.5)));

    let result = optimizer
        .optimize(&counter, &x0, &StoppingCriterion::new().with_max_iterations(10))
        .unwrap();

    // 0 -> 0.5 -> 1 -> 1.5 -> 2, then a zero gradient
    assert_eq!(result.termination_reason, TerminationReason::Converged);
    assert_eq!(result.iterations, 4);
    assert_eq!(result.point[0], 2.0);
    assert_eq!((result.function_evaluations, result.gradient_evaluations), counter.counts());
    assert_eq!(counter.counts(), (5, 5));
}

#[test]
fn test_invalid_initial_point_is_rejected() {
    let cost_fn = ShiftedQuadratic::new();
    let x0 = DVector::from_vec(vec![f64::NAN, 0.0]);

    assert!(GradientDescent::<f64>::default()
        .optimize(&cost_fn, &x0, &StoppingCriterion::new())
        .is_err());
    assert!(NelderMead::<f64>::default()
        .optimize(&cost_fn, &DVector::zeros(0), &StoppingCriterion::new())
        .is_err());
}
