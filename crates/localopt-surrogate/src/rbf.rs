//! Radial-basis surrogate models.
//!
//! A surrogate `f̂(x) = Σ_i w_i ψ(||x - c_i||)` approximates an expensive
//! objective from a set of evaluated samples. With the samples themselves as
//! centers the weights solve the square interpolation system
//!
//! ```text
//! B w = y,   B_ij = ψ(||x_i - x_j||)
//! ```
//!
//! so the model reproduces every sample value exactly. With fewer, separate
//! centers the weights are the least-squares solution computed through an
//! SVD pseudo-inverse.
//!
//! Fitted models are immutable and implement [`CostFunction`], so any solver
//! can minimize them directly.

use crate::{
    error::{Result, SurrogateError},
    kernel::Kernel,
};
use localopt_core::{
    cost_function::CostFunction,
    error::{OptimizerError, Result as CoreResult},
    types::{DMatrix, DVector, Scalar},
};
use num_traits::Float;

/// A fitted radial-basis model.
#[derive(Debug, Clone)]
pub struct RbfSurrogate<T: Scalar> {
    centers: Vec<DVector<T>>,
    weights: DVector<T>,
    kernel: Kernel<T>,
}

impl<T: Scalar> RbfSurrogate<T> {
    /// Interpolates `values` at `samples`, using the samples as centers.
    ///
    /// # Errors
    ///
    /// - [`SurrogateError::EmptySampleSet`] without samples
    /// - [`SurrogateError::DimensionMismatch`] for inconsistent inputs
    /// - [`SurrogateError::SingularSystem`] when the design matrix cannot be
    ///   solved, e.g. for duplicate samples
    pub fn fit(samples: &[DVector<T>], values: &[T], kernel: Kernel<T>) -> Result<Self> {
        check_samples(samples, values)?;
        kernel.validate()?;

        let design = design_matrix(samples, samples, &kernel);
        let y = DVector::from_column_slice(values);
        let weights = design
            .lu()
            .solve(&y)
            .ok_or_else(|| SurrogateError::singular("interpolation matrix is not invertible"))?;
        if !weights.iter().all(|w| <T as Float>::is_finite(*w)) {
            return Err(SurrogateError::singular("interpolation weights are not finite"));
        }

        tracing::debug!(samples = samples.len(), ?kernel, "fitted interpolating surrogate");
        Ok(Self {
            centers: samples.to_vec(),
            weights,
            kernel,
        })
    }

    /// Fits `values` at `samples` in the least-squares sense with the given centers.
    ///
    /// Singular values below `ε · max(m, k) · σ_max` are treated as zero.
    pub fn fit_with_centers(
        samples: &[DVector<T>],
        values: &[T],
        centers: &[DVector<T>],
        kernel: Kernel<T>,
    ) -> Result<Self> {
        check_samples(samples, values)?;
        kernel.validate()?;
        if centers.is_empty() {
            return Err(SurrogateError::EmptySampleSet);
        }
        let dim = samples[0].len();
        if let Some(center) = centers.iter().find(|c| c.len() != dim) {
            return Err(SurrogateError::dimension_mismatch(dim, center.len()));
        }

        let design = design_matrix(samples, centers, &kernel);
        let (m, k) = design.shape();
        let y = DVector::from_column_slice(values);
        let svd = design.svd(true, true);
        let largest = svd.singular_values.max();
        let eps = T::EPSILON * <T as Scalar>::from_usize(m.max(k)) * largest;
        let weights = svd.solve(&y, eps).map_err(SurrogateError::singular)?;
        if !weights.iter().all(|w| <T as Float>::is_finite(*w)) {
            return Err(SurrogateError::singular("least-squares weights are not finite"));
        }

        tracing::debug!(samples = m, centers = k, ?kernel, "fitted least-squares surrogate");
        Ok(Self {
            centers: centers.to_vec(),
            weights,
            kernel,
        })
    }

    /// Evaluates the surrogate at `x`.
    pub fn evaluate(&self, x: &DVector<T>) -> Result<T> {
        let dim = self.dimension();
        if x.len() != dim {
            return Err(SurrogateError::dimension_mismatch(dim, x.len()));
        }
        Ok(self.evaluate_unchecked(x))
    }

    fn evaluate_unchecked(&self, x: &DVector<T>) -> T {
        self.centers
            .iter()
            .zip(self.weights.iter())
            .fold(T::zero(), |acc, (center, w)| acc + *w * self.kernel.evaluate((x - center).norm()))
    }

    /// Dimension of the input space.
    pub fn dimension(&self) -> usize {
        self.centers[0].len()
    }

    /// The centers of the basis functions.
    pub fn centers(&self) -> &[DVector<T>] {
        &self.centers
    }

    /// The fitted weights, one per center.
    pub fn weights(&self) -> &DVector<T> {
        &self.weights
    }

    /// The kernel.
    pub fn kernel(&self) -> Kernel<T> {
        self.kernel
    }
}

impl<T: Scalar> CostFunction<T> for RbfSurrogate<T> {
    fn cost(&self, point: &DVector<T>) -> CoreResult<T> {
        let dim = self.dimension();
        if point.len() != dim {
            return Err(OptimizerError::dimension_mismatch(dim, point.len()));
        }
        Ok(self.evaluate_unchecked(point))
    }
}

fn check_samples<T: Scalar>(samples: &[DVector<T>], values: &[T]) -> Result<()> {
    let Some(first) = samples.first() else {
        return Err(SurrogateError::EmptySampleSet);
    };
    if values.len() != samples.len() {
        return Err(SurrogateError::dimension_mismatch(
            format!("{} values", samples.len()),
            values.len(),
        ));
    }
    if first.is_empty() {
        return Err(SurrogateError::dimension_mismatch("a non-empty sample", 0));
    }
    if let Some(sample) = samples.iter().find(|s| s.len() != first.len()) {
        return Err(SurrogateError::dimension_mismatch(first.len(), sample.len()));
    }
    Ok(())
}

fn design_matrix<T: Scalar>(samples: &[DVector<T>], centers: &[DVector<T>], kernel: &Kernel<T>) -> DMatrix<T> {
    DMatrix::from_fn(samples.len(), centers.len(), |i, j| {
        kernel.evaluate((&samples[i] - &centers[j]).norm())
    })
}
