//! Vector helpers.

use crate::{
    error::{OptimizerError, Result},
    types::{DVector, Scalar},
};
use num_traits::Float;

/// The `i`-th standard basis vector of dimension `n`.
///
/// # Panics
///
/// Panics if `i >= n`.
pub fn basis<T: Scalar>(i: usize, n: usize) -> DVector<T> {
    assert!(i < n, "basis index {i} out of range for dimension {n}");
    let mut e = DVector::zeros(n);
    e[i] = T::one();
    e
}

/// Returns `v / ||v||` together with `||v||`, or `None` when the norm is zero
/// or not finite.
pub fn normalize<T: Scalar>(v: &DVector<T>) -> Option<(DVector<T>, T)> {
    let norm = v.norm();
    if norm > T::zero() && <T as Float>::is_finite(norm) {
        Some((v / norm, norm))
    } else {
        None
    }
}

/// Central finite-difference approximation of the gradient of `f` at `point`.
///
/// The step along coordinate `i` is `cbrt(ε) · max(1, |x_i|)`, which balances
/// truncation and rounding error for central differences.
pub fn finite_difference_gradient<T, F>(f: F, point: &DVector<T>) -> Result<DVector<T>>
where
    T: Scalar,
    F: Fn(&DVector<T>) -> Result<T>,
{
    let n = point.len();
    if n == 0 {
        return Err(OptimizerError::dimension_mismatch("at least 1", 0));
    }

    let base_step = <T as Float>::cbrt(T::EPSILON);
    let mut gradient = DVector::zeros(n);
    let mut probe = point.clone();

    for i in 0..n {
        let xi = point[i];
        let h = base_step * <T as Float>::max(T::one(), <T as Float>::abs(xi));

        probe[i] = xi + h;
        let f_plus = f(&probe)?;
        probe[i] = xi - h;
        let f_minus = f(&probe)?;
        probe[i] = xi;

        gradient[i] = (f_plus - f_minus) / (h + h);
    }

    Ok(gradient)
}
