//! Example: every solver on the Rosenbrock function
//!
//! Runs the gradient-based and direct-search solvers from the classic
//! starting point (-1.2, 1) and prints a comparison table.
//!
//! Run with: cargo run --example rosenbrock

use localopt::prelude::*;

/// f(x, y) = (1 - x)² + 100 (y - x²)²
#[derive(Debug)]
struct Rosenbrock;

impl CostFunction<f64> for Rosenbrock {
    fn cost(&self, x: &DVector<f64>) -> Result<f64> {
        Ok((1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0] * x[0]).powi(2))
    }

    fn gradient(&self, x: &DVector<f64>) -> Result<DVector<f64>> {
        let t = x[1] - x[0] * x[0];
        Ok(DVector::from_vec(vec![-2.0 * (1.0 - x[0]) - 400.0 * x[0] * t, 200.0 * t]))
    }
}

fn report<O: Optimizer<f64>>(optimizer: &mut O, x0: &DVector<f64>, criterion: &StoppingCriterion<f64>) -> Result<()> {
    let result = optimizer.optimize(&Rosenbrock, x0, criterion)?;
    println!(
        "{:<38} {:>8} {:>8} {:>8} {:>12.3e}  ({:.4}, {:.4})  {:?}",
        optimizer.name(),
        result.iterations,
        result.function_evaluations,
        result.gradient_evaluations,
        result.value,
        result.point[0],
        result.point[1],
        result.termination_reason,
    );
    Ok(())
}

fn main() -> Result<()> {
    println!("Rosenbrock from (-1.2, 1), minimum at (1, 1)\n");
    println!(
        "{:<38} {:>8} {:>8} {:>8} {:>12}  point",
        "solver", "iters", "f evals", "g evals", "value"
    );

    let x0 = DVector::from_vec(vec![-1.2, 1.0]);
    let criterion = StoppingCriterion::new().with_max_iterations(2000);

    report(&mut GradientDescent::default(), &x0, &criterion)?;
    report(&mut ConjugateGradient::fletcher_reeves(), &x0, &criterion)?;
    report(&mut ConjugateGradient::polak_ribiere(), &x0, &criterion)?;
    report(&mut BarzilaiBorwein::default(), &x0, &criterion)?;
    report(&mut NelderMead::new(NelderMeadConfig::new().with_initial_std_dev(1.0).with_seed(1)), &x0, &criterion)?;
    report(&mut HookeJeeves::default(), &x0, &StoppingCriterion::new())?;
    report(
        &mut CrossEntropy::new(CrossEntropyConfig::new().with_samples(100, 20).with_initial_std_dev(2.0).with_seed(1)),
        &x0,
        &StoppingCriterion::new().with_max_iterations(100),
    )?;

    Ok(())
}
