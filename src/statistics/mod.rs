use crate::fitting::FitProblem;
use distrs::StudentsT;
use nalgebra::{DMatrix, DVector};
use thiserror::Error as ThisError;


/// Information about an error that occurred during calculation
/// of the fit statistics.
#[derive(Debug, Clone, PartialEq, ThisError)]
pub enum StatisticsError {
    /// Fit is underdetermined
    #[error(
        "Fit is underdetermined: {} data points for {} free parameters.",
        data_points,
        free_parameters
    )]
    Underdetermined {
        /// number of data points
        data_points: usize,
        /// number of free parameters
        free_parameters: usize,
    },

    /// The residuals or the Jacobian could not be calculated at the fitted parameters
    #[error("The model could not be evaluated at the fitted parameters.")]
    EvaluationFailed,

    /// The matrix `$J^T J$` can not be inverted
    #[error("Covariance matrix can not be calculated because the Jacobian has dependent columns.")]
    SingularMatrix,

    /// A probability outside the open interval `(0,1)` was given
    #[error("Probability must be in the open interval (0,1), but was {}.", probability)]
    InvalidProbability {
        /// the given probability
        probability: f64,
    },
}

/// this structure contains some additional statistical information
/// about the fit, such as errors on the parameters and other useful
/// information to assess the quality of the fit. All parameter related
/// quantities refer to the free parameters of the model, in the order in
/// which they appear in the model.
#[derive(Debug, Clone, PartialEq)]
pub struct FitStatistics {
    /// The covariance matrix `$\sigma^2 (J^T J)^{-1}$` of the parameter estimates, where `$J$`
    /// is the Jacobian of the weighted residuals.
    /// # Correlation
    /// Note that we can calculate the estimated correlation matrix from
    /// the covariance matrix by dividing each element `$c_{ij}$` by
    /// `$\sqrt{c_{ii} c_{jj}}$`.
    covariance_matrix: DMatrix<f64>,
    /// the weighted residuals `$\vec{r_w} = W (\vec{f}(\vec{p}) - \vec{y})$`
    weighted_residuals: DVector<f64>,
    /// the _regression standard error_ `$\sigma = ||\vec{r_w}||/\sqrt{N_{data}-N_{params}}$`
    sigma: f64,
    /// number of data points minus number of free parameters
    degrees_of_freedom: usize,
    /// names of the free parameters
    parameter_names: Vec<String>,
}

impl FitStatistics {
    /// Calculate the fit statistics at the current parameters of the problem, which should
    /// be the ones after the fit has completed.
    #[allow(non_snake_case)]
    pub(crate) fn try_calculate(problem: &FitProblem) -> Result<Self, StatisticsError> {
        let parameter_names: Vec<String> = problem
            .free_parameter_names()
            .into_iter()
            .map(String::from)
            .collect();
        let data_points = problem.data_len();
        let free_parameters = parameter_names.len();
        if data_points <= free_parameters {
            return Err(StatisticsError::Underdetermined {
                data_points,
                free_parameters,
            });
        }
        let degrees_of_freedom = data_points - free_parameters;

        let weighted_residuals = problem
            .weighted_residuals()
            .cloned()
            .ok_or(StatisticsError::EvaluationFailed)?;
        let J = problem
            .weighted_jacobian()
            .ok_or(StatisticsError::EvaluationFailed)?;

        let sigma = weighted_residuals.norm() / (degrees_of_freedom as f64).sqrt();
        let JTJ_inv = (J.transpose() * J)
            .try_inverse()
            .ok_or(StatisticsError::SingularMatrix)?;
        let covariance_matrix = JTJ_inv * (sigma * sigma);

        Ok(Self {
            covariance_matrix,
            weighted_residuals,
            sigma,
            degrees_of_freedom,
            parameter_names,
        })
    }

    /// the covariance matrix of the free parameters
    pub fn covariance_matrix(&self) -> &DMatrix<f64> {
        &self.covariance_matrix
    }

    /// Calculate the correlation matrix of the free parameters from the covariance matrix.
    pub fn correlation_matrix(&self) -> DMatrix<f64> {
        calc_correlation_matrix(&self.covariance_matrix)
    }

    /// the weighted residuals at the fitted parameters
    pub fn weighted_residuals(&self) -> &DVector<f64> {
        &self.weighted_residuals
    }

    /// the _regression standard error_ (also called weighted residual mean square, or sigma).
    pub fn regression_standard_error(&self) -> f64 {
        self.sigma
    }

    /// the reduced chi-squared, i.e. the squared regression standard error. For weights
    /// `$w_j = 1/\sigma_j$` this should be close to one for a good fit.
    pub fn reduced_chi2(&self) -> f64 {
        self.sigma * self.sigma
    }

    /// the number of data points minus the number of free parameters
    pub fn degrees_of_freedom(&self) -> usize {
        self.degrees_of_freedom
    }

    /// the names of the free parameters, in the order of the rows of the covariance matrix
    pub fn parameter_names(&self) -> &[String] {
        &self.parameter_names
    }

    /// the estimated standard errors of the free parameters, i.e. the square roots of the
    /// diagonal of the covariance matrix
    pub fn standard_errors(&self) -> DVector<f64> {
        self.covariance_matrix.diagonal().map(f64::sqrt)
    }

    /// the estimated standard error of the free parameter with the given name
    pub fn standard_error(&self, name: &str) -> Option<f64> {
        let idx = self.parameter_names.iter().position(|n| n == name)?;
        Some(self.covariance_matrix[(idx, idx)].sqrt())
    }

    /// Calculate the radii of the confidence intervals of the free parameters for the given
    /// probability, e.g. `0.95` for the 95% confidence intervals. The radius is the standard
    /// error scaled by the quantile of the Student-t distribution with the degrees of freedom
    /// of the fit, so the interval of parameter `$p_j$` is `$[p_j - r_j, p_j + r_j]$`.
    pub fn confidence_radius(&self, probability: f64) -> Result<DVector<f64>, StatisticsError> {
        if !(probability > 0. && probability < 1.) {
            return Err(StatisticsError::InvalidProbability { probability });
        }
        let t = StudentsT::ppf((1. + probability) / 2., self.degrees_of_freedom as f64);
        Ok(self.standard_errors() * t)
    }
}

/// divide each element `$c_{ij}$` of the covariance matrix by `$\sqrt{c_{ii} c_{jj}}$`
fn calc_correlation_matrix(covariance_matrix: &DMatrix<f64>) -> DMatrix<f64> {
    let variances = covariance_matrix.diagonal();
    DMatrix::from_fn(
        covariance_matrix.nrows(),
        covariance_matrix.ncols(),
        |i, j| covariance_matrix[(i, j)] / (variances[i] * variances[j]).sqrt(),
    )
}
