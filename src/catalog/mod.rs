//! The catalog of ready made parametric models.
//!
//! Every function creates a fresh model with the given initial parameter values.
//! All models with a single output provide analytical derivatives with respect to
//! their parameters. Polynomials start with all coefficients set to zero and carry
//! their degrees as hyper parameters.
//!
//! ```rust
//! # use modelfit::catalog::gaussian1d;
//! # use modelfit::model::Evaluate;
//! let model = gaussian1d(1., 2., 3.);
//! assert_eq!(model.to_string(), "<Gaussian1D(amplitude=1.0, mean=2.0, stddev=3.0)>");
//! assert_eq!(model.eval1(2.).unwrap().sum(), 1.);
//! ```

mod functional;
mod geometric;
mod polynomial;

pub use functional::{const1d, const2d, gaussian1d, gaussian2d, linear1d, lorentz1d, sine1d};
pub use geometric::{rotation2d, scale, shift};
pub use polynomial::{chebyshev1d, chebyshev2d, polynomial1d, polynomial2d};
