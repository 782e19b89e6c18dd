//! Optimization building blocks shared by the solvers.

pub mod bracket;
pub mod line_search;
pub mod optimizer;
pub mod step_size;
pub mod termination;
pub mod univariate;

pub use bracket::*;
pub use line_search::*;
pub use optimizer::*;
pub use step_size::*;
pub use termination::*;
pub use univariate::*;
