//! Surrogate models and constraint handling for local optimization.
//!
//! # Modules
//!
//! - [`kernel`]: Radial basis functions
//! - [`rbf`]: Interpolating and least-squares radial-basis surrogates
//! - [`penalty`]: Constraint sets, penalized objectives and the penalty method
//! - [`sampling`]: Full-factorial sample designs
//! - [`error`]: Error types
//!
//! # Example
//!
//! ```rust
//! use localopt_surrogate::{full_factorial, Kernel, RbfSurrogate};
//! use localopt_core::types::DVector;
//!
//! let lower = DVector::from_vec(vec![-1.0, -1.0]);
//! let upper = DVector::from_vec(vec![1.0, 1.0]);
//! let samples = full_factorial(&lower, &upper, &[5, 5]).unwrap();
//! let values: Vec<f64> = samples.iter().map(|x| x.norm_squared()).collect();
//!
//! let surrogate = RbfSurrogate::fit(&samples, &values, Kernel::Multiquadric { shape: 1.0 }).unwrap();
//! assert!((surrogate.evaluate(&samples[3]).unwrap() - values[3]).abs() < 1e-8);
//! ```

pub mod error;
pub mod kernel;
pub mod penalty;
pub mod rbf;
pub mod sampling;

pub use error::{Result, SurrogateError};
pub use kernel::Kernel;
pub use penalty::{ConstraintFn, Constraints, PenalizedCost, PenaltyKind, PenaltyMethod, PenaltyResult};
pub use rbf::RbfSurrogate;
pub use sampling::full_factorial;
