//! Benchmarks comparing the solvers on standard test problems
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use localopt_core::{
    cost_function::CostFunction,
    test_utils::{random_spd_matrix, Rosenbrock},
    types::{DMatrix, DVector},
};
use localopt_optim::{
    BarzilaiBorwein, ConjugateGradient, CrossEntropy, CrossEntropyConfig, GradientDescent, HookeJeeves, NelderMead,
    NelderMeadConfig, Optimizer, StoppingCriterion,
};
use rand::{rngs::StdRng, SeedableRng};

/// Random convex quadratic `0.5 xᵀ A x` for benchmarking
#[derive(Debug)]
struct RandomQuadratic {
    a: DMatrix<f64>,
}

impl CostFunction<f64> for RandomQuadratic {
    fn cost(&self, x: &DVector<f64>) -> localopt_core::Result<f64> {
        Ok(0.5 * x.dot(&(&self.a * x)))
    }

    fn gradient(&self, x: &DVector<f64>) -> localopt_core::Result<DVector<f64>> {
        Ok(&self.a * x)
    }
}

fn bench_solver<O, C>(optimizer: &mut O, cost_fn: &C, x0: &DVector<f64>, criterion: &StoppingCriterion<f64>)
where
    O: Optimizer<f64>,
    C: CostFunction<f64>,
{
    let _ = optimizer.optimize(black_box(cost_fn), black_box(x0), criterion);
}

fn benchmark_gradient_solvers(c: &mut Criterion) {
    let mut group = c.benchmark_group("gradient_solvers");
    let mut rng = StdRng::seed_from_u64(42);

    for &dim in &[5, 20, 50] {
        let cost_fn = RandomQuadratic {
            a: random_spd_matrix(dim, &mut rng),
        };
        let x0 = DVector::from_element(dim, 1.0);
        let criterion = StoppingCriterion::new().with_max_iterations(100);

        group.bench_with_input(BenchmarkId::new("gradient_descent", dim), &dim, |b, _| {
            b.iter(|| bench_solver(&mut GradientDescent::default(), &cost_fn, &x0, &criterion));
        });
        group.bench_with_input(BenchmarkId::new("conjugate_gradient", dim), &dim, |b, _| {
            b.iter(|| bench_solver(&mut ConjugateGradient::polak_ribiere(), &cost_fn, &x0, &criterion));
        });
        group.bench_with_input(BenchmarkId::new("barzilai_borwein", dim), &dim, |b, _| {
            b.iter(|| bench_solver(&mut BarzilaiBorwein::default(), &cost_fn, &x0, &criterion));
        });
    }

    group.finish();
}

fn benchmark_direct_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("direct_search_rosenbrock");
    let cost_fn = Rosenbrock::<f64>::default();
    let x0 = DVector::from_vec(vec![-1.2, 1.0]);
    let criterion = StoppingCriterion::new().with_max_iterations(500);

    group.bench_function("nelder_mead", |b| {
        b.iter(|| bench_solver(&mut NelderMead::new(NelderMeadConfig::new().with_seed(1)), &cost_fn, &x0, &criterion));
    });
    group.bench_function("hooke_jeeves", |b| {
        b.iter(|| bench_solver(&mut HookeJeeves::default(), &cost_fn, &x0, &criterion));
    });
    group.bench_function("cross_entropy", |b| {
        let short = StoppingCriterion::new().with_max_iterations(50);
        b.iter(|| {
            bench_solver(
                &mut CrossEntropy::new(CrossEntropyConfig::new().with_seed(1)),
                &cost_fn,
                &x0,
                &short,
            )
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_gradient_solvers, benchmark_direct_search);
criterion_main!(benches);
