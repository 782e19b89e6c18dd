//! Nelder-Mead simplex search.
//!
//! A derivative-free method that reshapes a simplex of `n + 1` vertices.
//! Every iteration sorts the vertices by value and replaces the worst one
//! through reflection, expansion or contraction about the centroid of the
//! others, or shrinks the whole simplex toward the best vertex when none of
//! those improve.
//!
//! The initial simplex is random: all `n + 1` vertices are drawn from an
//! isotropic Gaussian centred at the initial point. Seed the solver (or pass
//! an RNG to [`NelderMead::optimize_with_rng`]) for reproducible runs.
//!
//! The run converges once the population standard deviation of the vertex
//! values drops below the tolerance.
//!
//! # References
//!
//! - Nelder & Mead, "A simplex method for function minimization" (1965)
//! - Kochenderfer & Wheeler, "Algorithms for Optimization" (2019), §7.5

use crate::utils::RunMonitor;
use localopt_core::{
    cost_function::{CostFunction, CountingCostFunction},
    error::{OptimizerError, Result},
    numerical::MultivariateNormal,
    optimization::{
        optimizer::{
            check_initial_point, ObjectivePoint, OptimizationResult, Optimizer, StoppingCriterion, TerminationReason,
        },
        termination::simplex_spread,
    },
    types::{DVector, Scalar},
};
use num_traits::Float;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::cmp::Ordering;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default iteration budget.
pub const DEFAULT_MAX_ITERATIONS: usize = 200;

const NAME: &str = "Nelder-Mead";

/// Configuration for the Nelder-Mead solver.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NelderMeadConfig<T> {
    /// Standard deviation of the Gaussian the initial vertices are drawn from
    pub initial_std_dev: T,
    /// Reflection coefficient α
    pub reflection: T,
    /// Expansion coefficient β
    pub expansion: T,
    /// Contraction coefficient γ
    pub contraction: T,
    /// Seed for the initial simplex; drawn from entropy when absent
    pub seed: Option<u64>,
}

impl<T: Scalar> Default for NelderMeadConfig<T> {
    fn default() -> Self {
        Self {
            initial_std_dev: <T as Scalar>::from_f64(10.0),
            reflection: T::one(),
            expansion: <T as Scalar>::from_f64(2.0),
            contraction: <T as Scalar>::from_f64(0.5),
            seed: None,
        }
    }
}

impl<T: Scalar> NelderMeadConfig<T> {
    /// Creates a configuration with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the spread of the initial simplex.
    pub fn with_initial_std_dev(mut self, std_dev: T) -> Self {
        self.initial_std_dev = std_dev;
        self
    }

    /// Sets the reflection coefficient.
    pub fn with_reflection(mut self, reflection: T) -> Self {
        self.reflection = reflection;
        self
    }

    /// Sets the expansion coefficient.
    pub fn with_expansion(mut self, expansion: T) -> Self {
        self.expansion = expansion;
        self
    }

    /// Sets the contraction coefficient.
    pub fn with_contraction(mut self, contraction: T) -> Self {
        self.contraction = contraction;
        self
    }

    /// Fixes the seed of the initial simplex.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks the configuration.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            (self.initial_std_dev, "initial_std_dev"),
            (self.reflection, "reflection"),
            (self.expansion, "expansion"),
        ];
        for (value, name) in positive {
            if value <= T::zero() || !<T as Float>::is_finite(value) {
                return Err(OptimizerError::invalid_configuration(
                    "coefficient must be positive and finite",
                    name,
                    value.to_string(),
                ));
            }
        }
        if self.contraction <= T::zero() || self.contraction >= T::one() {
            return Err(OptimizerError::invalid_configuration(
                "contraction must lie in (0, 1)",
                "contraction",
                self.contraction.to_string(),
            ));
        }
        Ok(())
    }
}

/// Nelder-Mead simplex solver.
#[derive(Debug, Clone)]
pub struct NelderMead<T: Scalar> {
    config: NelderMeadConfig<T>,
}

impl<T: Scalar> NelderMead<T> {
    /// Creates a new optimizer.
    pub fn new(config: NelderMeadConfig<T>) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &NelderMeadConfig<T> {
        &self.config
    }

    /// Runs the solver drawing the initial simplex from `rng`.
    pub fn optimize_with_rng<C, R>(
        &mut self,
        cost_fn: &C,
        initial_point: &DVector<T>,
        stopping_criterion: &StoppingCriterion<T>,
        rng: &mut R,
    ) -> Result<OptimizationResult<T>>
    where
        C: CostFunction<T> + ?Sized,
        R: Rng + ?Sized,
    {
        check_initial_point(initial_point)?;
        self.config.validate()?;
        let criterion = stopping_criterion.resolve(DEFAULT_MAX_ITERATIONS, T::DEFAULT_TOLERANCE)?;
        let cost_fn = CountingCostFunction::new(cost_fn);
        let NelderMeadConfig {
            initial_std_dev,
            reflection,
            expansion,
            contraction,
            ..
        } = self.config;

        let sampler = MultivariateNormal::isotropic(initial_point.clone(), initial_std_dev);
        let mut simplex = Vec::with_capacity(initial_point.len() + 1);
        for _ in 0..=initial_point.len() {
            let vertex = sampler.sample(rng);
            simplex.push(evaluate(&cost_fn, vertex)?);
        }

        let best = best_vertex(&simplex);
        let mut monitor = RunMonitor::start(NAME, &criterion, &best.point, best.value);
        let mut iterations = 0;

        let reason = loop {
            if iterations >= criterion.max_iterations {
                break TerminationReason::MaxIterations;
            }

            sort_simplex(&mut simplex);
            let n = simplex.len() - 1;
            let lowest = simplex[0].value;
            let second_highest = simplex[n - 1].value;
            let highest = simplex[n].value;

            let centroid = simplex[..n]
                .iter()
                .fold(DVector::zeros(initial_point.len()), |acc, v| acc + &v.point)
                / <T as Scalar>::from_usize(n);

            let reflected = evaluate(&cost_fn, &centroid + (&centroid - &simplex[n].point) * reflection)?;

            let step = if reflected.value < lowest {
                let expanded = evaluate(&cost_fn, &centroid + (&reflected.point - &centroid) * expansion)?;
                simplex[n] = if expanded.value < reflected.value {
                    expanded
                } else {
                    reflected
                };
                "expand"
            } else if reflected.value >= second_highest {
                if reflected.value <= highest {
                    simplex[n] = reflected;
                }
                let worst = &simplex[n];
                let contracted = evaluate(&cost_fn, &centroid + (&worst.point - &centroid) * contraction)?;
                if contracted.value > worst.value {
                    let anchor = simplex[0].point.clone();
                    let half = <T as Scalar>::from_f64(0.5);
                    for vertex in simplex.iter_mut().skip(1) {
                        *vertex = evaluate(&cost_fn, (&vertex.point + &anchor) * half)?;
                    }
                    "shrink"
                } else {
                    simplex[n] = contracted;
                    "contract"
                }
            } else {
                simplex[n] = reflected;
                "reflect"
            };

            iterations += 1;
            let values: Vec<T> = simplex.iter().map(|v| v.value).collect();
            let spread = simplex_spread(&values);
            let best = best_vertex(&simplex);
            monitor.record(&best.point, best.value);
            tracing::debug!(
                iteration = iterations,
                value = best.value.to_f64(),
                spread = spread.to_f64(),
                step,
                "nelder-mead step"
            );

            if spread < criterion.tolerance {
                break TerminationReason::Converged;
            }
        };

        let best = best_vertex(&simplex).clone();
        Ok(monitor.finish(&cost_fn, best.point, best.value, iterations, reason))
    }
}

impl<T: Scalar> Default for NelderMead<T> {
    fn default() -> Self {
        Self::new(NelderMeadConfig::new())
    }
}

impl<T: Scalar> Optimizer<T> for NelderMead<T> {
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
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.optimize_with_rng(cost_fn, initial_point, stopping_criterion, &mut rng)
    }
}

/// Evaluates a vertex, ranking NaN values as worst.
fn evaluate<T, C>(cost_fn: &C, point: DVector<T>) -> Result<ObjectivePoint<T>>
where
    T: Scalar,
    C: CostFunction<T> + ?Sized,
{
    let value = cost_fn.cost(&point)?;
    let value = if <T as Float>::is_nan(value) { T::infinity() } else { value };
    Ok(ObjectivePoint::new(point, value))
}

fn sort_simplex<T: Scalar>(simplex: &mut [ObjectivePoint<T>]) {
    simplex.sort_by(|a, b| a.value.partial_cmp(&b.value).unwrap_or(Ordering::Equal));
}

fn best_vertex<T: Scalar>(simplex: &[ObjectivePoint<T>]) -> &ObjectivePoint<T> {
    simplex
        .iter()
        .min_by(|a, b| a.value.partial_cmp(&b.value).unwrap_or(Ordering::Equal))
        .unwrap_or(&simplex[0])
}
