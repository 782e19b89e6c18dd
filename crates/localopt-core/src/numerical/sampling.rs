//! Multivariate-normal sampling.
//!
//! Samples are drawn as `μ + L z` with `z ~ N(0, I)` and `L` a lower
//! triangular factor of the covariance `Σ = L Lᵀ`. When the Cholesky
//! decomposition fails (the covariance drifted away from positive
//! definiteness) the off-diagonal terms are discarded and `L` becomes
//! `diag(sqrt(max(Σᵢᵢ, 0)))`, which always exists.

use crate::{
    error::{OptimizerError, Result},
    types::{DMatrix, DVector, Scalar},
};
use num_traits::Float;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

/// A Gaussian proposal distribution `N(μ, Σ)`.
#[derive(Debug, Clone)]
pub struct MultivariateNormal<T: Scalar> {
    mean: DVector<T>,
    covariance: DMatrix<T>,
    factor: DMatrix<T>,
    diagonal_fallback: bool,
}

impl<T: Scalar> MultivariateNormal<T> {
    /// Creates the distribution, factorizing the covariance.
    ///
    /// # Errors
    ///
    /// Returns an error if the dimensions disagree or the covariance contains
    /// non-finite entries.
    pub fn new(mean: DVector<T>, covariance: DMatrix<T>) -> Result<Self> {
        let n = mean.len();
        if covariance.shape() != (n, n) {
            return Err(OptimizerError::dimension_mismatch(
                format!("({n}, {n})"),
                format!("{:?}", covariance.shape()),
            ));
        }
        if covariance.iter().any(|v| !<T as Float>::is_finite(*v)) {
            return Err(OptimizerError::numerical_error(
                "covariance contains non-finite entries",
            ));
        }

        let (factor, diagonal_fallback) = match covariance.clone().cholesky() {
            Some(cholesky) => (cholesky.l(), false),
            None => {
                tracing::warn!(
                    dimension = n,
                    "covariance is not positive definite, dropping off-diagonal terms"
                );
                let std_devs = covariance
                    .diagonal()
                    .map(|v| <T as Float>::sqrt(<T as Float>::max(v, T::zero())));
                (DMatrix::from_diagonal(&std_devs), true)
            }
        };

        Ok(Self {
            mean,
            covariance,
            factor,
            diagonal_fallback,
        })
    }

    /// Creates `N(μ, σ² I)`.
    pub fn isotropic(mean: DVector<T>, std_dev: T) -> Self {
        let n = mean.len();
        let variance = std_dev * std_dev;
        Self {
            mean,
            covariance: DMatrix::from_diagonal_element(n, n, variance),
            factor: DMatrix::from_diagonal_element(n, n, <T as Float>::abs(std_dev)),
            diagonal_fallback: false,
        }
    }

    /// The mean vector μ.
    pub fn mean(&self) -> &DVector<T> {
        &self.mean
    }

    /// The covariance matrix Σ as supplied.
    pub fn covariance(&self) -> &DMatrix<T> {
        &self.covariance
    }

    /// The lower triangular sampling factor actually used.
    pub fn factor(&self) -> &DMatrix<T> {
        &self.factor
    }

    /// True when sampling fell back to the diagonal of Σ.
    pub fn uses_diagonal_fallback(&self) -> bool {
        self.diagonal_fallback
    }

    /// Draws one sample.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> DVector<T> {
        let z = DVector::from_fn(self.mean.len(), |_, _| {
            let v: f64 = StandardNormal.sample(rng);
            <T as Scalar>::from_f64(v)
        });
        &self.mean + &self.factor * z
    }

    /// Draws `count` samples as the columns of an `n × count` matrix.
    pub fn sample_columns<R: Rng + ?Sized>(&self, rng: &mut R, count: usize) -> DMatrix<T> {
        let mut samples = DMatrix::zeros(self.mean.len(), count);
        for mut column in samples.column_iter_mut() {
            column.copy_from(&self.sample(rng));
        }
        samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numerical::statistics::{sample_covariance, sample_mean};
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_cholesky_factor_reproduces_covariance() {
        let cov = DMatrix::from_row_slice(2, 2, &[4.0, 1.0, 1.0, 3.0]);
        let mvn = MultivariateNormal::new(DVector::zeros(2), cov.clone()).unwrap();

        assert!(!mvn.uses_diagonal_fallback());
        let l = mvn.factor();
        assert_relative_eq!(l * l.transpose(), cov, epsilon = 1e-12);
    }

    #[test]
    fn test_indefinite_covariance_falls_back_to_diagonal() {
        // Eigenvalues 3 and -1
        let cov = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 1.0]);
        let mvn = MultivariateNormal::new(DVector::zeros(2), cov).unwrap();

        assert!(mvn.uses_diagonal_fallback());
        assert_eq!(mvn.factor(), &DMatrix::identity(2, 2));
    }

    #[test]
    fn test_zero_covariance_samples_the_mean() {
        let mean = DVector::from_vec(vec![1.0, -2.0]);
        let mvn = MultivariateNormal::new(mean.clone(), DMatrix::zeros(2, 2)).unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        assert!(mvn.uses_diagonal_fallback());
        assert_eq!(mvn.sample(&mut rng), mean);
    }

    #[test]
    fn test_non_finite_covariance_rejected() {
        let cov = DMatrix::from_row_slice(1, 1, &[f64::NAN]);
        assert!(MultivariateNormal::new(DVector::zeros(1), cov).is_err());
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let result = MultivariateNormal::new(DVector::<f64>::zeros(3), DMatrix::identity(2, 2));
        assert!(matches!(result, Err(OptimizerError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_sample_moments() {
        let mean = DVector::from_vec(vec![1.0, 5.0]);
        let cov = DMatrix::from_row_slice(2, 2, &[2.0, 0.5, 0.5, 1.0]);
        let mvn = MultivariateNormal::new(mean.clone(), cov.clone()).unwrap();
        let mut rng = StdRng::seed_from_u64(42);

        let samples = mvn.sample_columns(&mut rng, 20_000);
        let empirical_mean = sample_mean(&samples).unwrap();
        let empirical_cov = sample_covariance(&samples, &empirical_mean).unwrap();

        assert_relative_eq!(empirical_mean, mean, epsilon = 0.05);
        assert_relative_eq!(empirical_cov, cov, epsilon = 0.1);
    }

    #[test]
    fn test_isotropic() {
        let mvn = MultivariateNormal::isotropic(DVector::<f64>::zeros(3), 10.0);
        assert_eq!(mvn.covariance(), &DMatrix::from_diagonal_element(3, 3, 100.0));
        assert_eq!(mvn.factor(), &DMatrix::from_diagonal_element(3, 3, 10.0));
    }
}
