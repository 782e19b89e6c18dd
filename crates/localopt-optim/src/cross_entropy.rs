//! Cross-entropy method.
//!
//! A stochastic search that keeps a Gaussian proposal distribution over the
//! design space. Each iteration
//!
//! 1. draws `m` samples from the proposal,
//! 2. evaluates the objective at every sample,
//! 3. keeps the `m_elite` best samples ([`select_elite`]),
//! 4. refits the proposal mean and covariance to the elite.
//!
//! The mean of the final proposal is the returned point. The method runs a
//! fixed number of iterations with no convergence test, so the result always
//! reports [`TerminationReason::MaxIterations`] unless the proposal degenerates.
//! A recorded trajectory holds the best sample of each iteration.
//!
//! When the refitted covariance has no Cholesky factor the sampler drops its
//! off-diagonal terms (see [`MultivariateNormal::new`]).
//!
//! # References
//!
//! - Rubinstein & Kroese, "The Cross-Entropy Method" (2004)
//! - Kochenderfer & Wheeler, "Algorithms for Optimization" (2019), §8.7

use crate::utils::RunMonitor;
use localopt_core::{
    cost_function::{CostFunction, CountingCostFunction},
    error::{OptimizerError, Result},
    numerical::{sample_covariance, sample_mean, MultivariateNormal},
    optimization::optimizer::{
        check_initial_point, OptimizationResult, Optimizer, StoppingCriterion, TerminationReason,
    },
    types::{DMatrix, DVector, Scalar},
};
use num_traits::Float;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::cmp::Ordering;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default number of iterations.
pub const DEFAULT_MAX_ITERATIONS: usize = 200;

const NAME: &str = "Cross-Entropy";

/// Configuration for the cross-entropy method.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CrossEntropyConfig<T: Scalar> {
    /// Samples drawn per iteration (m)
    pub samples: usize,
    /// Elite samples kept per iteration (m_elite)
    pub elite: usize,
    /// Standard deviation of the initial isotropic proposal (σ0)
    pub initial_std_dev: T,
    /// Full initial covariance, overriding `initial_std_dev`
    pub initial_covariance: Option<DMatrix<T>>,
    /// Seed of the sampler; drawn from entropy when absent
    pub seed: Option<u64>,
}

impl<T: Scalar> Default for CrossEntropyConfig<T> {
    fn default() -> Self {
        Self {
            samples: 100,
            elite: 10,
            initial_std_dev: <T as Scalar>::from_f64(10.0),
            initial_covariance: None,
            seed: None,
        }
    }
}

impl<T: Scalar> CrossEntropyConfig<T> {
    /// Creates a configuration with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the population size and elite size.
    pub fn with_samples(mut self, samples: usize, elite: usize) -> Self {
        self.samples = samples;
        self.elite = elite;
        self
    }

    /// Sets the spread of the initial proposal.
    pub fn with_initial_std_dev(mut self, std_dev: T) -> Self {
        self.initial_std_dev = std_dev;
        self
    }

    /// Uses a full initial covariance matrix.
    pub fn with_initial_covariance(mut self, covariance: DMatrix<T>) -> Self {
        self.initial_covariance = Some(covariance);
        self
    }

    /// Fixes the sampler seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.elite == 0 || self.elite > self.samples {
            return Err(OptimizerError::invalid_configuration(
                "elite size must lie in [1, samples]",
                "elite",
                self.elite.to_string(),
            ));
        }
        if self.initial_std_dev <= T::zero() || !<T as Float>::is_finite(self.initial_std_dev) {
            return Err(OptimizerError::invalid_configuration(
                "initial standard deviation must be positive and finite",
                "initial_std_dev",
                self.initial_std_dev.to_string(),
            ));
        }
        Ok(())
    }

    fn initial_proposal(&self, mean: &DVector<T>) -> Result<MultivariateNormal<T>> {
        match &self.initial_covariance {
            Some(covariance) => MultivariateNormal::new(mean.clone(), covariance.clone()),
            None => Ok(MultivariateNormal::isotropic(mean.clone(), self.initial_std_dev)),
        }
    }
}

/// Returns the `elite` columns of `samples` with the lowest `values`, best first.
///
/// The sort is stable, so ties keep their sampling order; NaN values rank
/// last.
pub fn select_elite<T: Scalar>(samples: &DMatrix<T>, values: &[T], elite: usize) -> Result<DMatrix<T>> {
    if values.len() != samples.ncols() {
        return Err(OptimizerError::dimension_mismatch(samples.ncols(), values.len()));
    }
    if elite == 0 || elite > values.len() {
        return Err(OptimizerError::invalid_configuration(
            "elite size must lie in [1, number of samples]",
            "elite",
            elite.to_string(),
        ));
    }

    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| nan_last(values[a], values[b]));
    Ok(samples.select_columns(&order[..elite]))
}

fn nan_last<T: Scalar>(a: T, b: T) -> Ordering {
    match (<T as Float>::is_nan(a), <T as Float>::is_nan(b)) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Cross-entropy method with a Gaussian proposal.
#[derive(Debug, Clone)]
pub struct CrossEntropy<T: Scalar> {
    config: CrossEntropyConfig<T>,
}

impl<T: Scalar> CrossEntropy<T> {
    /// Creates a new optimizer.
    pub fn new(config: CrossEntropyConfig<T>) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &CrossEntropyConfig<T> {
        &self.config
    }

    /// Runs the method drawing all samples from `rng`.
    ///
    /// Only `max_iterations` of the stopping criterion is used; the
    /// tolerance and mode have no effect.
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

        let mut proposal = self.config.initial_proposal(initial_point)?;
        let initial_value = cost_fn.cost(initial_point)?;
        let mut monitor = RunMonitor::start(NAME, &criterion, initial_point, initial_value);
        let mut iterations = 0;

        let reason = loop {
            if iterations >= criterion.max_iterations {
                break TerminationReason::MaxIterations;
            }

            let samples = proposal.sample_columns(rng, self.config.samples);
            let values = samples
                .column_iter()
                .map(|column| cost_fn.cost(&column.into_owned()))
                .collect::<Result<Vec<T>>>()?;

            let elite = select_elite(&samples, &values, self.config.elite)?;
            let mean = sample_mean(&elite)?;
            let covariance = sample_covariance(&elite, &mean)?;
            if !mean.iter().chain(covariance.iter()).all(|v| <T as Float>::is_finite(*v)) {
                tracing::warn!(iteration = iterations, "refitted proposal is not finite, stopping");
                break TerminationReason::NumericalDegeneracy;
            }
            proposal = MultivariateNormal::new(mean, covariance)?;

            iterations += 1;
            let best = (0..values.len())
                .min_by(|&a, &b| nan_last(values[a], values[b]))
                .unwrap_or_default();
            monitor.record(&samples.column(best).into_owned(), values[best]);
            tracing::debug!(
                iteration = iterations,
                best_sample = values[best].to_f64(),
                covariance_trace = proposal.covariance().trace().to_f64(),
                "cross-entropy iteration"
            );
        };

        let point = proposal.mean().clone();
        let value = cost_fn.cost(&point)?;
        Ok(monitor.finish(&cost_fn, point, value, iterations, reason))
    }
}

impl<T: Scalar> Default for CrossEntropy<T> {
    fn default() -> Self {
        Self::new(CrossEntropyConfig::new())
    }
}

impl<T: Scalar> Optimizer<T> for CrossEntropy<T> {
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
