#![warn(missing_docs)]
//!
//! # Introduction
//!
//! This crate provides parametric models `$\vec{y} = f(\vec{x},\vec{p})$` that evaluate
//! element-wise over N-dimensional arrays, ways to compose them into larger models and
//! a nonlinear least squares fitter that adjusts the free parameters of a model to data.
//!
//! A model is a named function of one or more independent variables (the *inputs*) and
//! an ordered set of named parameters `$\vec{p}=(p_1,\dots,p_{N_{params}})^T$`. It produces
//! one or more outputs. Inputs may be scalars, 1-D sample vectors or N-D grids. They
//! are broadcast against each other following the usual array broadcasting rules.
//!
//! ## Composite Models
//!
//! Models can be combined in two ways:
//! * *in series*, where each model consumes the output of the previous one, so that
//!   `$\mathrm{Serial}([f,g])(x) = g(f(x))$`. See [SerialCompositeModel](crate::model::composite::SerialCompositeModel).
//! * *in parallel*, where all models see the same input and their outputs are summed,
//!   so that `$\mathrm{Summed}([f,g])(x) = f(x)+g(x)$`. See [SummedCompositeModel](crate::model::composite::SummedCompositeModel).
//!
//! Instead of passing arrays positionally, composite models can also route named
//! signals between their members using a [LabeledInput](crate::model::LabeledInput).
//!
//! ## Fitting
//!
//! The [LevMarFitter](crate::fitting::LevMarFitter) minimizes
//!
//! ```math
//! \arg\min_{\vec{p}_{free}} ||\mathbf{W}(\vec{f}(\vec{x},\vec{p})-\vec{y})||_2^2,
//! ```
//!
//! over the free (i.e. not fixed) parameters of a model, using the Levenberg-Marquardt
//! algorithm of the [levenberg_marquardt](https://crates.io/crates/levenberg-marquardt) crate.
//! It uses the analytical derivatives of a model with respect to its parameters when they
//! are available and falls back to finite differences otherwise. Fitting never mutates the
//! model that is passed in, but returns a new model with the fitted parameter values.
//!
//! # Example
//!
//! ```rust
//! use modelfit::prelude::*;
//! use modelfit::array::grid::linspace;
//! use modelfit::catalog;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let x = linspace(-3., 3., 50).into_dyn();
//! // observations generated from a gaussian with amplitude 2, mean 0.5 and stddev 0.8
//! let truth = catalog::gaussian1d(2., 0.5, 0.8);
//! let y = truth.eval1(x.clone())?;
//!
//! // start the fit from a rough guess and keep the mean fixed at its true value
//! let mut guess = catalog::gaussian1d(1., 0.5, 1.5);
//! guess.set_fixed("mean", true)?;
//!
//! let fit = LevMarFitter::default().fit(&guess, &[x], &y)?;
//! assert!(fit.was_successful());
//! assert!((fit.model.parameter("amplitude").unwrap().value() - 2.).abs() < 1e-6);
//! assert_eq!(fit.model.parameter("mean").unwrap().value(), 0.5);
//! # Ok(())
//! # }
//! ```

/// array helpers: conversion into N-D arrays, broadcasting and grid generation
pub mod array;
pub mod catalog;
/// least squares fitting of parametric models to data
pub mod fitting;
/// parametric models, composite models and labeled inputs
pub mod model;
/// commonly useful imports
pub mod prelude;
/// an explicit, tag based byte format for models
pub mod serialization;
/// statistical information about a completed fit
pub mod statistics;

#[cfg(test)]
pub mod test_helpers;
