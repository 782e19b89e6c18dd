//! Bracketing of univariate minima and roots.
//!
//! A bracket is an interval `[lower, upper]` that contains, by construction,
//! a local minimum (or a sign change) of a scalar function. Both routines
//! grow the interval geometrically and therefore only terminate when the
//! function has the assumed structure. An expansion cap turns the unbounded
//! case (e.g. a function decreasing without bound) into
//! [`OptimizerError::BracketNotFound`].
//!
//! Function values that are NaN are treated as `+∞`, so a failed evaluation
//! always looks worse than a successful one.

use crate::{
    error::{OptimizerError, Result},
    types::Scalar,
};
use num_traits::Float;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A closed interval `[lower, upper]` with `lower <= upper`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Bracket<T> {
    /// Lower bound
    pub lower: T,
    /// Upper bound
    pub upper: T,
}

impl<T: Scalar> Bracket<T> {
    /// Creates a bracket from two bounds in either order.
    pub fn new(a: T, b: T) -> Self {
        if a <= b {
            Self { lower: a, upper: b }
        } else {
            Self { lower: b, upper: a }
        }
    }

    /// Width `upper - lower`.
    pub fn width(&self) -> T {
        self.upper - self.lower
    }

    /// Midpoint of the interval.
    pub fn midpoint(&self) -> T {
        (self.lower + self.upper) * <T as Scalar>::from_f64(0.5)
    }

    /// Whether `x` lies in the closed interval.
    pub fn contains(&self, x: T) -> bool {
        self.lower <= x && x <= self.upper
    }
}

/// Parameters of the expanding-step bracketing search.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BracketParams<T> {
    /// Initial step `s` (its sign gives the initial search direction)
    pub initial_step: T,
    /// Growth factor `k > 1` applied to the step after every expansion
    pub expansion: T,
    /// Number of expansions after which bracketing gives up
    pub max_expansions: usize,
}

impl<T: Scalar> Default for BracketParams<T> {
    fn default() -> Self {
        Self {
            initial_step: <T as Scalar>::from_f64(1e-2),
            expansion: <T as Scalar>::from_f64(2.0),
            max_expansions: 1000,
        }
    }
}

impl<T: Scalar> BracketParams<T> {
    /// Creates parameters with the given step and growth factor.
    pub fn new(initial_step: T, expansion: T) -> Self {
        Self {
            initial_step,
            expansion,
            ..Self::default()
        }
    }

    /// Sets the expansion cap.
    pub fn with_max_expansions(mut self, max_expansions: usize) -> Self {
        self.max_expansions = max_expansions;
        self
    }

    /// Validates the parameters.
    pub fn validate(&self) -> Result<()> {
        if self.initial_step == T::zero() || !<T as Float>::is_finite(self.initial_step) {
            return Err(OptimizerError::invalid_configuration(
                "initial step must be non-zero and finite",
                "initial_step",
                self.initial_step.to_string(),
            ));
        }
        if self.expansion <= T::one() || !<T as Float>::is_finite(self.expansion) {
            return Err(OptimizerError::invalid_configuration(
                "expansion factor must be finite and greater than 1",
                "expansion",
                self.expansion.to_string(),
            ));
        }
        if self.max_expansions == 0 {
            return Err(OptimizerError::invalid_configuration(
                "at least one expansion is required",
                "max_expansions",
                "0",
            ));
        }
        Ok(())
    }
}

/// Maps NaN to `+∞` so failed evaluations never win a comparison.
#[inline]
pub(crate) fn assume_worse<T: Scalar>(value: T) -> T {
    if <T as Float>::is_nan(value) {
        T::infinity()
    } else {
        value
    }
}

/// Brackets a local minimum of `f` starting from `x0`.
///
/// Evaluates `f(x0)` and `f(x0 + s)`, reversing the direction if the second
/// point is worse, then keeps stepping forward with the step multiplied by
/// `expansion` until the function value increases. The returned bracket
/// spans the last three points visited.
///
/// # Errors
///
/// Returns [`OptimizerError::BracketNotFound`] after 1000 expansions and
/// [`OptimizerError::InvalidConfiguration`] for a zero step or an expansion
/// factor not greater than one.
pub fn bracket_minimum<T, F>(f: F, x0: T, step: T, expansion: T) -> Result<Bracket<T>>
where
    T: Scalar,
    F: FnMut(T) -> T,
{
    bracket_minimum_with(f, x0, &BracketParams::new(step, expansion))
}

/// [`bracket_minimum`] with explicit parameters.
pub fn bracket_minimum_with<T, F>(mut f: F, x0: T, params: &BracketParams<T>) -> Result<Bracket<T>>
where
    T: Scalar,
    F: FnMut(T) -> T,
{
    params.validate()?;

    let mut step = params.initial_step;
    let (mut a, mut ya) = (x0, assume_worse(f(x0)));
    let (mut b, mut yb) = (a + step, assume_worse(f(a + step)));

    if yb > ya {
        std::mem::swap(&mut a, &mut b);
        std::mem::swap(&mut ya, &mut yb);
        step = -step;
    }

    for _ in 0..params.max_expansions {
        let c = b + step;
        let yc = assume_worse(f(c));
        if yc > yb {
            return Ok(Bracket::new(a, c));
        }
        a = b;
        b = c;
        yb = yc;
        step *= params.expansion;
        if !<T as Float>::is_finite(b) {
            break;
        }
    }

    Err(OptimizerError::bracket_not_found(
        "objective did not increase along the search direction",
        params.max_expansions,
    ))
}

/// Brackets a sign change of `f` starting from the interval `[a, b]`.
///
/// The bounds are swapped if out of order; the half-width around the
/// centre is then doubled until `f(a) · f(b) <= 0`.
pub fn bracket_sign_change<T, F>(f: F, a: T, b: T) -> Result<Bracket<T>>
where
    T: Scalar,
    F: FnMut(T) -> T,
{
    let params = BracketParams {
        initial_step: T::one(),
        ..BracketParams::default()
    };
    bracket_sign_change_with(f, a, b, &params)
}

/// [`bracket_sign_change`] with explicit parameters.
///
/// `params.expansion` is the growth factor of the half-width;
/// `params.initial_step` is unused.
pub fn bracket_sign_change_with<T, F>(
    mut f: F,
    a: T,
    b: T,
    params: &BracketParams<T>,
) -> Result<Bracket<T>>
where
    T: Scalar,
    F: FnMut(T) -> T,
{
    params.validate()?;
    if a == b {
        return Err(OptimizerError::invalid_configuration(
            "initial interval must have non-zero width",
            "b",
            b.to_string(),
        ));
    }

    let mut bracket = Bracket::new(a, b);
    let center = bracket.midpoint();
    let mut half_width = bracket.width() * <T as Scalar>::from_f64(0.5);

    for _ in 0..=params.max_expansions {
        let product = f(bracket.lower) * f(bracket.upper);
        if <T as Float>::is_nan(product) {
            return Err(OptimizerError::numerical_error(format!(
                "function is NaN on [{}, {}]",
                bracket.lower, bracket.upper
            )));
        }
        if product <= T::zero() {
            return Ok(bracket);
        }
        half_width *= params.expansion;
        bracket = Bracket::new(center - half_width, center + half_width);
    }

    Err(OptimizerError::bracket_not_found(
        "no sign change found",
        params.max_expansions,
    ))
}
