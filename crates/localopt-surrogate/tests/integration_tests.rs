//! Integration tests combining surrogates and penalties with the solvers.

use approx::assert_relative_eq;
use localopt_core::{cost_function::FnCost, types::DVector};
use localopt_optim::{HookeJeeves, NelderMead, NelderMeadConfig, Optimizer, StoppingCriterion};
use localopt_surrogate::{full_factorial, Constraints, Kernel, PenaltyKind, PenaltyMethod, RbfSurrogate};
use pretty_assertions::assert_eq;

fn shifted_bowl(x: &DVector<f64>) -> f64 {
    (x[0] - 0.5).powi(2) + (x[1] + 0.3).powi(2)
}

fn half_plane() -> Constraints<f64> {
    Constraints::new().with_inequality(|x: &DVector<f64>| x[0] + x[1] - 2.0)
}

#[test]
fn test_minimize_fitted_surrogate() {
    let lower = DVector::from_vec(vec![-2.0, -2.0]);
    let upper = DVector::from_vec(vec![2.0, 2.0]);
    let samples = full_factorial(&lower, &upper, &[5, 5]).unwrap();
    let values: Vec<f64> = samples.iter().map(shifted_bowl).collect();
    let surrogate = RbfSurrogate::fit(&samples, &values, Kernel::Multiquadric { shape: 1.0 }).unwrap();

    let result = HookeJeeves::<f64>::default()
        .optimize(&surrogate, &DVector::zeros(2), &StoppingCriterion::new())
        .unwrap();

    assert!(result.converged);
    let target = DVector::from_vec(vec![0.5, -0.3]);
    assert!((&result.point - &target).norm() < 0.05);
    assert!(shifted_bowl(&result.point) < 0.01);
}

#[test]
fn test_surrogate_with_nelder_mead() {
    let lower = DVector::from_vec(vec![-2.0, -2.0]);
    let upper = DVector::from_vec(vec![2.0, 2.0]);
    let samples = full_factorial(&lower, &upper, &[5, 5]).unwrap();
    let values: Vec<f64> = samples.iter().map(shifted_bowl).collect();
    let surrogate = RbfSurrogate::fit(&samples, &values, Kernel::Multiquadric { shape: 1.0 }).unwrap();

    let mut optimizer = NelderMead::new(NelderMeadConfig::new().with_initial_std_dev(0.5).with_seed(11));
    let criterion = StoppingCriterion::new().with_max_iterations(1000);
    let result = optimizer.optimize(&surrogate, &DVector::zeros(2), &criterion).unwrap();

    assert!(shifted_bowl(&result.point) < 0.01);
}

#[test]
fn test_count_penalty_lands_on_boundary() {
    let objective = FnCost::new(|x: &DVector<f64>| (x[0] - 2.0).powi(2) + (x[1] - 2.0).powi(2));
    let method = PenaltyMethod::new().with_kind(PenaltyKind::Count);

    let result = method
        .minimize(
            &mut HookeJeeves::<f64>::default(),
            &objective,
            &half_plane(),
            &DVector::zeros(2),
            &StoppingCriterion::new(),
        )
        .unwrap();

    assert!(result.feasible);
    assert_eq!(result.rounds, 1);
    assert_eq!(result.point(), &DVector::from_vec(vec![1.0, 1.0]));
    assert_relative_eq!(result.objective_value, 2.0);
}

#[test]
fn test_quadratic_penalty_grows_until_feasible() {
    let objective = FnCost::new(|x: &DVector<f64>| (x[0] - 2.0).powi(2) + (x[1] - 2.0).powi(2));
    let method = PenaltyMethod::new()
        .with_growth(10.0)
        .with_max_rounds(10)
        .with_feasibility_tolerance(5e-7);

    let result = method
        .minimize(
            &mut HookeJeeves::<f64>::default(),
            &objective,
            &half_plane(),
            &DVector::zeros(2),
            &StoppingCriterion::new(),
        )
        .unwrap();

    // The penalized minimizer sits at 1 + 1/(1 + 2ρ) on the diagonal.
    assert!(result.feasible);
    assert_eq!(result.rounds, 5);
    assert_relative_eq!(result.rho, 1e4);
    assert!((result.point() - DVector::from_vec(vec![1.0, 1.0])).norm() < 1e-3);
    assert!(result.penalty <= 5e-7);
}

#[test]
fn test_penalty_round_budget() {
    let objective = FnCost::new(|x: &DVector<f64>| (x[0] - 2.0).powi(2) + (x[1] - 2.0).powi(2));
    let method = PenaltyMethod::new().with_max_rounds(2);

    let result = method
        .minimize(
            &mut HookeJeeves::<f64>::default(),
            &objective,
            &half_plane(),
            &DVector::zeros(2),
            &StoppingCriterion::new(),
        )
        .unwrap();

    assert!(!result.feasible);
    assert_eq!(result.rounds, 2);
    assert_relative_eq!(result.rho, 2.0);
}
