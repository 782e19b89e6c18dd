//! Sample designs for fitting surrogates.

use crate::error::{Result, SurrogateError};
use localopt_core::{
    error::OptimizerError,
    types::{DVector, Scalar},
};

/// Full-factorial grid over the box `[lower, upper]`.
///
/// Dimension `i` takes `levels[i]` evenly spaced values from `lower[i]` to
/// `upper[i]`; a single level uses `lower[i]`. Points are ordered with the
/// first dimension varying fastest.
///
/// # Example
///
/// ```rust
/// use localopt_surrogate::full_factorial;
/// use localopt_core::types::DVector;
///
/// let lower = DVector::from_vec(vec![0.0, 0.0]);
/// let upper = DVector::from_vec(vec![1.0, 2.0]);
/// let grid = full_factorial(&lower, &upper, &[2, 3]).unwrap();
///
/// assert_eq!(grid.len(), 6);
/// assert_eq!(grid[1], DVector::from_vec(vec![1.0, 0.0]));
/// assert_eq!(grid[5], DVector::from_vec(vec![1.0, 2.0]));
/// ```
pub fn full_factorial<T: Scalar>(lower: &DVector<T>, upper: &DVector<T>, levels: &[usize]) -> Result<Vec<DVector<T>>> {
    let n = lower.len();
    if n == 0 {
        return Err(SurrogateError::EmptySampleSet);
    }
    if upper.len() != n {
        return Err(SurrogateError::dimension_mismatch(n, upper.len()));
    }
    if levels.len() != n {
        return Err(SurrogateError::dimension_mismatch(format!("{n} levels"), levels.len()));
    }
    if let Some(i) = levels.iter().position(|&l| l == 0) {
        return Err(OptimizerError::invalid_configuration(
            "every dimension needs at least one level",
            format!("levels[{i}]"),
            "0",
        )
        .into());
    }

    let axes: Vec<Vec<T>> = (0..n)
        .map(|i| {
            let count = levels[i];
            if count == 1 {
                return vec![lower[i]];
            }
            let spacing = (upper[i] - lower[i]) / <T as Scalar>::from_usize(count - 1);
            (0..count)
                .map(|k| {
                    if k == count - 1 {
                        upper[i]
                    } else {
                        lower[i] + spacing * <T as Scalar>::from_usize(k)
                    }
                })
                .collect()
        })
        .collect();

    let total: usize = levels.iter().product();
    let mut points = Vec::with_capacity(total);
    let mut index = vec![0usize; n];
    for _ in 0..total {
        points.push(DVector::from_fn(n, |i, _| axes[i][index[i]]));
        for (digit, &count) in index.iter_mut().zip(levels) {
            *digit += 1;
            if *digit < count {
                break;
            }
            *digit = 0;
        }
    }

    tracing::debug!(dimension = n, points = total, "built full-factorial design");
    Ok(points)
}
