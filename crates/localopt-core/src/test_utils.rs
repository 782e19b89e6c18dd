//! Standard test problems for exercising the solvers.
//!
//! Available in unit tests and, for downstream crates, behind the
//! `test-utils` feature.

use crate::{
    cost_function::CostFunction,
    error::Result,
    types::{DMatrix, DVector, Scalar},
};
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

/// The Rosenbrock function `f(x, y) = (a - x)² + b (y - x²)²`,
/// generalized to `n` dimensions as a chain of coupled pairs.
///
/// The minimum is `0` at `(a, a², …)`; with the classic `a = 1, b = 100`
/// it is `(1, 1, …, 1)`.
#[derive(Debug, Clone, Copy)]
pub struct Rosenbrock<T> {
    /// Location parameter
    pub a: T,
    /// Curvature of the valley walls
    pub b: T,
}

impl<T: Scalar> Default for Rosenbrock<T> {
    fn default() -> Self {
        Self {
            a: T::one(),
            b: <T as Scalar>::from_f64(100.0),
        }
    }
}

impl<T: Scalar> Rosenbrock<T> {
    /// The global minimizer in `dim` dimensions (valid for `a = 1`).
    pub fn minimizer(&self, dim: usize) -> DVector<T> {
        DVector::from_element(dim, self.a)
    }
}

impl<T: Scalar> CostFunction<T> for Rosenbrock<T> {
    fn cost(&self, point: &DVector<T>) -> Result<T> {
        let mut value = T::zero();
        for i in 0..point.len().saturating_sub(1) {
            let (x, y) = (point[i], point[i + 1]);
            let u = self.a - x;
            let v = y - x * x;
            value += u * u + self.b * v * v;
        }
        Ok(value)
    }

    fn gradient(&self, point: &DVector<T>) -> Result<DVector<T>> {
        let two = <T as Scalar>::from_f64(2.0);
        let four = <T as Scalar>::from_f64(4.0);
        let mut gradient = DVector::zeros(point.len());
        for i in 0..point.len().saturating_sub(1) {
            let (x, y) = (point[i], point[i + 1]);
            let v = y - x * x;
            gradient[i] += -two * (self.a - x) - four * self.b * x * v;
            gradient[i + 1] += two * self.b * v;
        }
        Ok(gradient)
    }
}

/// `f(x) = ||x - center||²`.
#[derive(Debug, Clone)]
pub struct ShiftedSphere<T: Scalar> {
    /// The minimizer
    pub center: DVector<T>,
}

impl<T: Scalar> ShiftedSphere<T> {
    /// Creates the sphere function centred at `center`.
    pub fn new(center: DVector<T>) -> Self {
        Self { center }
    }
}

impl<T: Scalar> CostFunction<T> for ShiftedSphere<T> {
    fn cost(&self, point: &DVector<T>) -> Result<T> {
        Ok((point - &self.center).norm_squared())
    }

    fn gradient(&self, point: &DVector<T>) -> Result<DVector<T>> {
        Ok((point - &self.center) * <T as Scalar>::from_f64(2.0))
    }
}

/// Booth's function `(x + 2y - 7)² + (2x + y - 5)²`, minimum `0` at `(1, 3)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Booth;

impl CostFunction<f64> for Booth {
    fn cost(&self, point: &DVector<f64>) -> Result<f64> {
        let (x, y) = (point[0], point[1]);
        Ok((x + 2.0 * y - 7.0).powi(2) + (2.0 * x + y - 5.0).powi(2))
    }

    fn gradient(&self, point: &DVector<f64>) -> Result<DVector<f64>> {
        let (x, y) = (point[0], point[1]);
        let r1 = x + 2.0 * y - 7.0;
        let r2 = 2.0 * x + y - 5.0;
        Ok(DVector::from_vec(vec![2.0 * r1 + 4.0 * r2, 4.0 * r1 + 2.0 * r2]))
    }
}

/// A random symmetric positive-definite matrix `M Mᵀ + n I`.
pub fn random_spd_matrix<T: Scalar, R: Rng + ?Sized>(n: usize, rng: &mut R) -> DMatrix<T> {
    let m = DMatrix::from_fn(n, n, |_, _| {
        let z: f64 = StandardNormal.sample(rng);
        <T as Scalar>::from_f64(z)
    });
    &m * m.transpose() + DMatrix::identity(n, n) * <T as Scalar>::from_usize(n)
}
