//! # localopt
//!
//! Local optimization over real vector spaces: bracketing and golden-section
//! line search, gradient-based descent methods, derivative-free direct
//! search, and radial-basis surrogates.
//!
//! This crate re-exports the workspace members:
//!
//! - [`localopt_core`]: cost functions, numeric primitives, line search and
//!   the [`Optimizer`](localopt_core::optimization::optimizer::Optimizer) trait
//! - [`localopt_optim`]: the solvers
//! - [`localopt_surrogate`]: surrogate models, penalties and sample designs
//!
//! # Quick Start
//!
//! ```rust
//! use localopt::prelude::*;
//!
//! let cost_fn = FnCost::new(|x: &DVector<f64>| (x[0] - 3.0).powi(2) + (x[1] + 1.0).powi(2));
//! let result = HookeJeeves::<f64>::default()
//!     .optimize(&cost_fn, &DVector::zeros(2), &StoppingCriterion::new())
//!     .unwrap();
//!
//! assert!(result.converged);
//! assert!((result.point[0] - 3.0).abs() < 1e-8);
//! ```

pub use localopt_core;
pub use localopt_optim;
pub use localopt_surrogate;

pub use nalgebra;

/// Prelude with the commonly used types of every member crate.
pub mod prelude {
    pub use localopt_core::prelude::*;
    pub use localopt_optim::{
        BarzilaiBorwein, BarzilaiBorweinConfig, ConjugateGradient, ConjugateGradientConfig, ConjugateGradientMethod,
        CrossEntropy, CrossEntropyConfig, GradientDescent, GradientDescentConfig, HookeJeeves, HookeJeevesConfig,
        NelderMead, NelderMeadConfig,
    };
    pub use localopt_surrogate::{
        full_factorial, Constraints, Kernel, PenalizedCost, PenaltyKind, PenaltyMethod, RbfSurrogate, SurrogateError,
    };
}

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_prelude_covers_all_solvers() {
        let names = [
            GradientDescent::<f64>::default().name().to_string(),
            ConjugateGradient::<f64>::fletcher_reeves().name().to_string(),
            BarzilaiBorwein::<f64>::default().name().to_string(),
            NelderMead::<f64>::default().name().to_string(),
            HookeJeeves::<f64>::default().name().to_string(),
            CrossEntropy::<f64>::default().name().to_string(),
        ];
        assert_eq!(
            names,
            [
                "Gradient Descent",
                "Conjugate Gradient (Fletcher-Reeves)",
                "Barzilai-Borwein",
                "Nelder-Mead",
                "Hooke-Jeeves",
                "Cross-Entropy",
            ]
        );
    }

    #[test]
    fn test_constraints_compose_through_the_prelude() {
        let constraints = Constraints::<f64>::new()
            .with_inequality(|x: &DVector<f64>| x[0] + x[1] - 2.0)
            .with_equality(|x: &DVector<f64>| x[0] - x[1]);
        let objective = FnCost::new(|x: &DVector<f64>| (x[0] - 2.0).powi(2) + (x[1] - 2.0).powi(2));
        let outside = DVector::from_vec(vec![2.0, 1.0]);

        assert_eq!(constraints.count_penalty(&outside), 2.0);
        assert_eq!(constraints.quadratic_penalty(&outside), 2.0);
        let penalized = PenalizedCost::new(&objective, &constraints, PenaltyKind::Count).with_rho(10.0);
        assert_eq!(penalized.cost(&outside).unwrap(), 1.0 + 10.0 * 2.0);

        let result = PenaltyMethod::new()
            .with_kind(PenaltyKind::Count)
            .minimize(
                &mut HookeJeeves::default(),
                &objective,
                &constraints,
                &DVector::zeros(2),
                &StoppingCriterion::new(),
            )
            .unwrap();

        assert!(result.feasible);
        assert_eq!(result.point(), &DVector::from_vec(vec![1.0, 1.0]));
    }
}
