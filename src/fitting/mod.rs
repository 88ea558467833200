use crate::array::Array;
use crate::model::errors::ModelError;
use crate::model::{Evaluate, ParametricModel};
use crate::statistics::{FitStatistics, StatisticsError};
use thiserror::Error as ThisError;

mod builder;
#[cfg(feature = "levmar")]
mod levmar;
mod problem;
mod weights;


pub use builder::{FitProblemBuilder, FitProblemBuilderError};
pub use problem::FitProblem;
pub use weights::Weights;

/// whether this build contains an optimizer backend. If this is `false`, every
/// fit fails with [`FitError::BackendUnavailable`].
pub fn optimizer_available() -> bool {
    cfg!(feature = "levmar")
}

/// Errors that prevent a fit from being performed
#[derive(Debug, Clone, ThisError)]
pub enum FitError {
    /// the crate was built without an optimizer backend
    #[error("No optimizer backend is available. Enable the `levmar` feature to fit models.")]
    BackendUnavailable,

    /// the fitting problem could not be created from the given model and data
    #[error(transparent)]
    Problem(#[from] FitProblemBuilderError),
}

/// A summary of how the minimization terminated.
#[derive(Debug, Clone, PartialEq)]
pub struct FitInfo {
    /// whether the optimizer considers the minimization successful
    pub successful: bool,
    /// the reason for the termination, as reported by the optimizer
    pub termination: String,
    /// the number of residual evaluations
    pub evaluations: usize,
    /// the value of the objective function `$\frac{1}{2}||\vec{r}_w||^2$` at the solution
    pub objective_function: f64,
}

/// The result of a fit: the fitted model, information about the minimization and
/// the final state of the fitting problem.
///
/// The fit is not considered an error if the minimization did not converge, so the
/// result should be checked using [`FitResult::was_successful`].
#[derive(Debug, Clone)]
pub struct FitResult {
    /// a copy of the input model with the fitted values of the free parameters
    pub model: ParametricModel,
    /// information about the minimization
    pub info: FitInfo,
    problem: FitProblem,
}

impl FitResult {
    pub(crate) fn new(problem: FitProblem, info: FitInfo) -> Self {
        Self {
            model: problem.model().clone(),
            info,
            problem,
        }
    }

    /// whether the optimizer deemed the minimization successful. The fitted parameters
    /// might still not be optimal for numerical reasons.
    pub fn was_successful(&self) -> bool {
        self.info.successful
    }

    /// the final state of the fitting problem
    pub fn problem(&self) -> &FitProblem {
        &self.problem
    }

    /// the values of the fitted (i.e. free) parameters, in order
    pub fn free_parameters(&self) -> Vec<f64> {
        self.problem.free_parameters().iter().copied().collect()
    }

    /// the fitted model evaluated at the inputs of the problem
    pub fn best_fit(&self) -> Result<Array, ModelError> {
        let mut outputs = self.model.evaluate(self.problem.inputs())?;
        outputs.pop().ok_or_else(|| ModelError::OutputCountMismatch {
            model: self.model.tag().to_string(),
            expected: 1,
            actual: 0,
        })
    }

    /// Calculate statistical information about the fitted parameters, such as their
    /// covariance matrix and standard errors.
    pub fn statistics(&self) -> Result<FitStatistics, StatisticsError> {
        FitStatistics::try_calculate(&self.problem)
    }
}

/// A fitter that uses the Levenberg-Marquardt algorithm of the
/// [levenberg_marquardt](https://crates.io/crates/levenberg-marquardt) crate to minimize the
/// weighted sum of squared residuals over the free parameters of a model.
///
/// The fitter only holds configuration, every fit starts from the parameters of the given
/// model and returns a new model.
///
/// # Example
///
/// ```rust
/// # use modelfit::catalog::sine1d;
/// # use modelfit::array::grid::linspace;
/// # use modelfit::fitting::LevMarFitter;
/// # use modelfit::model::Evaluate;
/// let x = linspace(0., 1., 100).into_dyn();
/// let y = sine1d(4., 1.).eval1(x.clone()).unwrap();
/// let fitter = LevMarFitter::new().with_accuracy(1e-10);
/// let fit = fitter.fit(&sine1d(3., 1.1), &[x], &y).unwrap();
/// assert!((fit.model.parameter("amplitude").unwrap().value() - 4.).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[must_use]
pub struct LevMarFitter {
    max_iterations: usize,
    accuracy: f64,
    epsilon: f64,
    estimate_jacobian: bool,
}

impl Default for LevMarFitter {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            accuracy: 1e-7,
            epsilon: f64::EPSILON.sqrt(),
            estimate_jacobian: false,
        }
    }
}

impl LevMarFitter {
    /// a fitter with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// The maximum number of iterations. This limits the number of residual
    /// evaluations to `max_iterations * (free_parameters + 1)`. Default `100`.
    pub fn with_max_iterations(self, max_iterations: usize) -> Self {
        Self {
            max_iterations: max_iterations.max(1),
            ..self
        }
    }

    /// The relative error in the sum of squares and in the parameters that is
    /// acceptable at the solution. Default `1e-7`.
    pub fn with_accuracy(self, accuracy: f64) -> Self {
        Self {
            accuracy: accuracy.abs(),
            ..self
        }
    }

    /// The relative error of the model values that determines the step size of the
    /// finite difference Jacobian. Default `sqrt(f64::EPSILON)`.
    pub fn with_epsilon(self, epsilon: f64) -> Self {
        Self {
            epsilon: epsilon.abs(),
            ..self
        }
    }

    /// Use finite differences even for models with analytical derivatives. Default `false`.
    ///
    /// The fitter is `Copy`, so the choice can be made for a single fit without touching a
    /// configured fitter:
    ///
    /// ```rust
    /// # use modelfit::catalog::gaussian1d;
    /// # use modelfit::array::grid::linspace;
    /// # use modelfit::fitting::LevMarFitter;
    /// # use modelfit::model::Evaluate;
    /// let x = linspace(-3., 3., 50).into_dyn();
    /// let y = gaussian1d(2., 0.5, 0.8).eval1(x.clone()).unwrap();
    /// let fitter = LevMarFitter::new().with_accuracy(1e-10);
    /// let fit = fitter
    ///     .with_estimate_jacobian(true)
    ///     .fit(&gaussian1d(1., 0., 1.), &[x], &y)
    ///     .unwrap();
    /// assert!((fit.model.parameter("mean").unwrap().value() - 0.5).abs() < 1e-4);
    /// ```
    pub fn with_estimate_jacobian(self, estimate_jacobian: bool) -> Self {
        Self {
            estimate_jacobian,
            ..self
        }
    }

    /// Fit the free parameters of the model to the observations at the given inputs.
    /// The parameters of the model are the initial guess. Whether the Jacobian is
    /// estimated is taken from the fitter, use
    /// [`with_estimate_jacobian`](LevMarFitter::with_estimate_jacobian) to choose it per call.
    pub fn fit(
        &self,
        model: &ParametricModel,
        inputs: &[Array],
        observations: &Array,
    ) -> Result<FitResult, FitError> {
        if !optimizer_available() {
            return Err(FitError::BackendUnavailable);
        }
        let problem = FitProblemBuilder::new(model)
            .inputs(inputs.to_vec())
            .observations(observations)
            .build()?;
        self.fit_problem(problem)
    }

    /// Same as [`LevMarFitter::fit`], but with one weight per observation.
    pub fn fit_weighted(
        &self,
        model: &ParametricModel,
        inputs: &[Array],
        observations: &Array,
        weights: &Array,
    ) -> Result<FitResult, FitError> {
        if !optimizer_available() {
            return Err(FitError::BackendUnavailable);
        }
        let problem = FitProblemBuilder::new(model)
            .inputs(inputs.to_vec())
            .observations(observations)
            .weights(weights)
            .build()?;
        self.fit_problem(problem)
    }

    /// Solve the given fitting problem. The current parameters of the problem are the
    /// initial guess.
    #[cfg(feature = "levmar")]
    pub fn fit_problem(&self, mut problem: FitProblem) -> Result<FitResult, FitError> {
        use levenberg_marquardt::LevenbergMarquardt;

        problem.configure_jacobian(self.epsilon, self.estimate_jacobian);
        let solver = LevenbergMarquardt::new()
            .with_patience(self.max_iterations)
            .with_ftol(self.accuracy)
            .with_xtol(self.accuracy);
        let (problem, report) = solver.minimize(problem);
        let info = FitInfo {
            successful: report.termination.was_successful(),
            termination: format!("{:?}", report.termination),
            evaluations: report.number_of_evaluations,
            objective_function: report.objective_function,
        };
        Ok(FitResult::new(problem, info))
    }

    /// Solve the given fitting problem. Always fails, because this build has no
    /// optimizer backend.
    #[cfg(not(feature = "levmar"))]
    pub fn fit_problem(&self, _problem: FitProblem) -> Result<FitResult, FitError> {
        Err(FitError::BackendUnavailable)
    }
}
