//! Radial basis functions.

use crate::error::Result;
use localopt_core::{error::OptimizerError, types::Scalar};
use num_traits::Float;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A radial basis function `ψ(r)` of the distance `r >= 0` to a center.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Kernel<T> {
    /// `r`
    Linear,
    /// `r³`
    Cubic,
    /// `r² ln r`, continuous at `r = 0` with value 0
    ThinPlate,
    /// `exp(-r² / (2σ²))`
    Gaussian {
        /// Bandwidth σ
        bandwidth: T,
    },
    /// `sqrt(r² + c²)`
    Multiquadric {
        /// Shape parameter c
        shape: T,
    },
    /// `1 / sqrt(r² + c²)`
    InverseMultiquadric {
        /// Shape parameter c
        shape: T,
    },
}

impl<T: Scalar> Kernel<T> {
    /// Evaluates the kernel at distance `r`.
    pub fn evaluate(&self, r: T) -> T {
        match *self {
            Self::Linear => r,
            Self::Cubic => r * r * r,
            Self::ThinPlate => {
                if r > T::zero() {
                    r * r * <T as Float>::ln(r)
                } else {
                    T::zero()
                }
            }
            Self::Gaussian { bandwidth } => {
                let two = <T as Scalar>::from_f64(2.0);
                <T as Float>::exp(-(r * r) / (two * bandwidth * bandwidth))
            }
            Self::Multiquadric { shape } => <T as Float>::sqrt(r * r + shape * shape),
            Self::InverseMultiquadric { shape } => T::one() / <T as Float>::sqrt(r * r + shape * shape),
        }
    }

    /// Checks the kernel parameters.
    pub fn validate(&self) -> Result<()> {
        let (value, name) = match *self {
            Self::Gaussian { bandwidth } => (bandwidth, "bandwidth"),
            Self::Multiquadric { shape } | Self::InverseMultiquadric { shape } => (shape, "shape"),
            Self::Linear | Self::Cubic | Self::ThinPlate => return Ok(()),
        };
        if value <= T::zero() || !<T as Float>::is_finite(value) {
            return Err(OptimizerError::invalid_configuration(
                "kernel parameter must be positive and finite",
                name,
                value.to_string(),
            )
            .into());
        }
        Ok(())
    }
}
