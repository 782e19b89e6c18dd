//! Numeric primitives shared by the solvers.
//!
//! - [`vector`]: norms, basis vectors and finite-difference gradients
//! - [`statistics`]: sample mean and covariance of column samples
//! - [`sampling`]: multivariate-normal sampling with a Cholesky fallback

pub mod sampling;
pub mod statistics;
pub mod vector;

pub use sampling::MultivariateNormal;
pub use statistics::{population_std_dev, sample_covariance, sample_mean};
pub use vector::{basis, finite_difference_gradient, normalize};
