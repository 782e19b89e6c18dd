//! Local optimizers over real vector spaces.
//!
//! This crate provides the solver family built on `localopt-core`: three
//! gradient-based descent methods and three derivative-free searches. All
//! of them implement [`Optimizer`] and share its result type.
//!
//! # Available Optimizers
//!
//! - **Gradient descent**: normalized steepest descent with line-search,
//!   decaying or constant step factors
//! - **Conjugate gradient**: Fletcher-Reeves or Polak-Ribière directions
//! - **Barzilai-Borwein**: step factors from consecutive gradients
//! - **Nelder-Mead**: simplex reflection, expansion, contraction and shrink
//! - **Hooke-Jeeves**: greedy coordinate pattern search
//! - **Cross-entropy**: Gaussian proposal refitted to elite samples
//!
//! # Examples
//!
//! ```rust
//! use localopt_optim::{ConjugateGradient, ConjugateGradientConfig};
//! use localopt_core::prelude::*;
//!
//! let cost_fn = FnCost::new(|x: &DVector<f64>| (x[0] - 1.0).powi(2) + 10.0 * (x[1] + 2.0).powi(2));
//! let mut optimizer = ConjugateGradient::new(ConjugateGradientConfig::new().with_fletcher_reeves());
//!
//! let result = optimizer
//!     .optimize(&cost_fn, &DVector::zeros(2), &StoppingCriterion::new().with_max_iterations(500))
//!     .unwrap();
//! assert!((result.point[0] - 1.0).abs() < 1e-3);
//! ```
//!
//! [`Optimizer`]: localopt_core::optimization::optimizer::Optimizer

pub mod barzilai_borwein;
pub mod conjugate_gradient;
pub mod cross_entropy;
pub mod gradient_descent;
pub mod hooke_jeeves;
pub mod nelder_mead;

mod utils;

// Re-export main optimizers for convenience
pub use barzilai_borwein::{BarzilaiBorwein, BarzilaiBorweinConfig};
pub use conjugate_gradient::{ConjugateGradient, ConjugateGradientConfig, ConjugateGradientMethod};
pub use cross_entropy::{select_elite, CrossEntropy, CrossEntropyConfig};
pub use gradient_descent::{GradientDescent, GradientDescentConfig};
pub use hooke_jeeves::{HookeJeeves, HookeJeevesConfig};
pub use nelder_mead::{NelderMead, NelderMeadConfig};

// Re-export commonly used items from core
pub use localopt_core::optimization::{
    optimizer::{OptimizationResult, Optimizer, StoppingCriterion, TerminationReason},
    step_size::StepFactor,
    termination::TerminationMode,
};
