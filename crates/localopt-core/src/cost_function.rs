//! Cost function interface for optimization algorithms.
//!
//! Every solver in the workspace consumes a [`CostFunction`]: a scalar
//! objective over `DVector<T>` with an optional analytic gradient. When no
//! gradient is provided, the default implementation falls back to central
//! finite differences, so plain scalar functions are always usable.
//!
//! # Design Philosophy
//!
//! - Objectives are treated as pure functions: same input, same output
//! - Closures are wrapped by [`FnCost`] and may carry a gradient override
//!   via [`FnCost::with_gradient`]
//! - Evaluation may fail (e.g. an expensive simulation diverging); failures
//!   propagate as [`OptimizerError`]

use crate::{
    error::{OptimizerError, Result},
    numerical::finite_difference_gradient,
    types::{DMatrix, DVector, Scalar},
};
use std::cell::Cell;
use std::fmt::{self, Debug};

/// Trait for objective functions minimized by the solvers.
pub trait CostFunction<T>: Debug
where
    T: Scalar,
{
    /// Evaluates the cost function at a point.
    fn cost(&self, point: &DVector<T>) -> Result<T>;

    /// Evaluates the cost and gradient at a point.
    ///
    /// # Default Implementation
    ///
    /// Uses finite differences to approximate the gradient if not overridden.
    fn cost_and_gradient(&self, point: &DVector<T>) -> Result<(T, DVector<T>)> {
        let cost = self.cost(point)?;
        let gradient = self.gradient(point)?;
        Ok((cost, gradient))
    }

    /// Computes only the gradient at a point.
    ///
    /// # Default Implementation
    ///
    /// Central finite differences, see [`CostFunction::gradient_fd`].
    fn gradient(&self, point: &DVector<T>) -> Result<DVector<T>> {
        self.gradient_fd(point)
    }

    /// Computes the gradient using central finite differences.
    fn gradient_fd(&self, point: &DVector<T>) -> Result<DVector<T>> {
        finite_difference_gradient(|x| self.cost(x), point)
    }
}

impl<T, C> CostFunction<T> for &C
where
    T: Scalar,
    C: CostFunction<T> + ?Sized,
{
    fn cost(&self, point: &DVector<T>) -> Result<T> {
        (**self).cost(point)
    }

    fn cost_and_gradient(&self, point: &DVector<T>) -> Result<(T, DVector<T>)> {
        (**self).cost_and_gradient(point)
    }

    fn gradient(&self, point: &DVector<T>) -> Result<DVector<T>> {
        (**self).gradient(point)
    }
}

/// Adapter turning a plain closure `Fn(&DVector<T>) -> T` into a cost function.
///
/// # Example
///
/// ```rust
/// use localopt_core::cost_function::{CostFunction, FnCost};
/// use localopt_core::types::DVector;
///
/// let sphere = FnCost::new(|x: &DVector<f64>| x.norm_squared())
///     .with_gradient(|x: &DVector<f64>| x * 2.0);
/// let x = DVector::from_vec(vec![1.0, 2.0]);
/// assert_eq!(sphere.cost(&x).unwrap(), 5.0);
/// assert_eq!(sphere.gradient(&x).unwrap()[1], 4.0);
/// ```
#[derive(Clone)]
pub struct FnCost<F, G = NoGradient> {
    cost: F,
    gradient: G,
}

impl<F> FnCost<F> {
    /// Wraps an objective without an analytic gradient.
    pub fn new(cost: F) -> Self {
        Self {
            cost,
            gradient: NoGradient,
        }
    }

    /// Attaches an analytic gradient, replacing the finite-difference default.
    pub fn with_gradient<G>(self, gradient: G) -> FnCost<F, G> {
        FnCost {
            cost: self.cost,
            gradient,
        }
    }
}

/// Marker for a [`FnCost`] that relies on finite differences.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGradient;

impl<F, G> Debug for FnCost<F, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnCost").finish_non_exhaustive()
    }
}

impl<T, F> CostFunction<T> for FnCost<F, NoGradient>
where
    T: Scalar,
    F: Fn(&DVector<T>) -> T,
{
    fn cost(&self, point: &DVector<T>) -> Result<T> {
        Ok((self.cost)(point))
    }
}

impl<T, F, G> CostFunction<T> for FnCost<F, G>
where
    T: Scalar,
    F: Fn(&DVector<T>) -> T,
    G: Fn(&DVector<T>) -> DVector<T>,
{
    fn cost(&self, point: &DVector<T>) -> Result<T> {
        Ok((self.cost)(point))
    }

    fn gradient(&self, point: &DVector<T>) -> Result<DVector<T>> {
        let gradient = (self.gradient)(point);
        if gradient.len() != point.len() {
            return Err(OptimizerError::dimension_mismatch(point.len(), gradient.len()));
        }
        Ok(gradient)
    }
}

/// A quadratic cost function.
///
/// Computes f(x) = 0.5 * x^T * A * x + b^T * x + c
#[derive(Debug, Clone)]
pub struct QuadraticCost<T>
where
    T: Scalar,
{
    /// The quadratic form matrix (should be symmetric)
    pub a: DMatrix<T>,
    /// The linear term
    pub b: DVector<T>,
    /// The constant term
    pub c: T,
}

impl<T> QuadraticCost<T>
where
    T: Scalar,
{
    /// Creates a new quadratic cost function.
    pub fn new(a: DMatrix<T>, b: DVector<T>, c: T) -> Self {
        Self { a, b, c }
    }

    /// Creates a simple quadratic with identity matrix: f(x) = 0.5 * ||x||^2
    pub fn simple(dim: usize) -> Self {
        Self {
            a: DMatrix::identity(dim, dim),
            b: DVector::zeros(dim),
            c: T::zero(),
        }
    }

    /// Creates f(x) = (x - x*)^T A (x - x*), minimized at `minimizer`.
    ///
    /// Expanding the form gives the Hessian 2A, the linear term -2 A x*
    /// and the constant x*^T A x*.
    pub fn centered(a: DMatrix<T>, minimizer: &DVector<T>) -> Self {
        let two = <T as Scalar>::from_f64(2.0);
        let a_xs = &a * minimizer;
        let c = minimizer.dot(&a_xs);
        Self {
            b: a_xs * -two,
            a: a * two,
            c,
        }
    }
}

impl<T> CostFunction<T> for QuadraticCost<T>
where
    T: Scalar,
{
    fn cost(&self, point: &DVector<T>) -> Result<T> {
        let ax = &self.a * point;
        let quad_term = point.dot(&ax) * <T as Scalar>::from_f64(0.5);
        let linear_term = self.b.dot(point);
        Ok(quad_term + linear_term + self.c)
    }

    fn cost_and_gradient(&self, point: &DVector<T>) -> Result<(T, DVector<T>)> {
        let ax = &self.a * point;
        let cost = point.dot(&ax) * <T as Scalar>::from_f64(0.5) + self.b.dot(point) + self.c;
        let gradient = ax + &self.b;
        Ok((cost, gradient))
    }

    fn gradient(&self, point: &DVector<T>) -> Result<DVector<T>> {
        Ok(&self.a * point + &self.b)
    }
}

/// Wrapper to count function evaluations for testing and diagnostics.
#[derive(Debug)]
pub struct CountingCostFunction<C> {
    /// The underlying cost function
    pub inner: C,
    cost_count: Cell<usize>,
    gradient_count: Cell<usize>,
}

impl<C> CountingCostFunction<C> {
    /// Creates a new counting wrapper around a cost function.
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            cost_count: Cell::new(0),
            gradient_count: Cell::new(0),
        }
    }

    /// Resets all counters to zero.
    pub fn reset_counts(&self) {
        self.cost_count.set(0);
        self.gradient_count.set(0);
    }

    /// Returns the current (cost, gradient) evaluation counts.
    pub fn counts(&self) -> (usize, usize) {
        (self.cost_count.get(), self.gradient_count.get())
    }
}

impl<T, C> CostFunction<T> for CountingCostFunction<C>
where
    T: Scalar,
    C: CostFunction<T>,
{
    fn cost(&self, point: &DVector<T>) -> Result<T> {
        self.cost_count.set(self.cost_count.get() + 1);
        self.inner.cost(point)
    }

    fn cost_and_gradient(&self, point: &DVector<T>) -> Result<(T, DVector<T>)> {
        self.cost_count.set(self.cost_count.get() + 1);
        self.gradient_count.set(self.gradient_count.get() + 1);
        self.inner.cost_and_gradient(point)
    }

    fn gradient(&self, point: &DVector<T>) -> Result<DVector<T>> {
        self.gradient_count.set(self.gradient_count.get() + 1);
        self.inner.gradient(point)
    }
}
