//! Sample statistics over column samples.
//!
//! Samples are stored as the columns of an `n × m` matrix: `n` is the
//! dimension of the search space and `m` the number of samples.

use crate::{
    error::{OptimizerError, Result},
    types::{DMatrix, DVector, Scalar},
};
use num_traits::Float;

/// Mean of the columns of `samples`.
pub fn sample_mean<T: Scalar>(samples: &DMatrix<T>) -> Result<DVector<T>> {
    let m = samples.ncols();
    if m == 0 {
        return Err(OptimizerError::dimension_mismatch("at least 1 sample", 0));
    }
    Ok(samples.column_sum() / <T as Scalar>::from_usize(m))
}

/// Unbiased sample covariance (divisor `m - 1`) of the columns of `samples`.
///
/// A single sample has zero covariance.
pub fn sample_covariance<T: Scalar>(samples: &DMatrix<T>, mean: &DVector<T>) -> Result<DMatrix<T>> {
    let (n, m) = samples.shape();
    if mean.len() != n {
        return Err(OptimizerError::dimension_mismatch(n, mean.len()));
    }
    if m == 0 {
        return Err(OptimizerError::dimension_mismatch("at least 1 sample", 0));
    }
    if m == 1 {
        return Ok(DMatrix::zeros(n, n));
    }

    let mut centered = samples.clone();
    for mut column in centered.column_iter_mut() {
        column -= mean;
    }
    let divisor = <T as Scalar>::from_usize(m - 1);
    Ok((&centered * centered.transpose()) / divisor)
}

/// Population standard deviation (divisor `m`) of a slice of values.
pub fn population_std_dev<T: Scalar>(values: &[T]) -> T {
    if values.is_empty() {
        return T::zero();
    }
    let m = <T as Scalar>::from_usize(values.len());
    let mean = values.iter().fold(T::zero(), |acc, &v| acc + v) / m;
    let variance = values
        .iter()
        .fold(T::zero(), |acc, &v| acc + (v - mean) * (v - mean))
        / m;
    <T as Float>::sqrt(variance)
}
