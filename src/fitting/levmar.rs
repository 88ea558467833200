use crate::fitting::problem::FitProblem;
use levenberg_marquardt::LeastSquaresProblem;
use nalgebra::storage::Owned;
use nalgebra::{DMatrix, DVector, Dyn};

impl LeastSquaresProblem<f64, Dyn, Dyn> for FitProblem {
    type ResidualStorage = Owned<f64, Dyn>;
    type JacobianStorage = Owned<f64, Dyn, Dyn>;
    type ParameterStorage = Owned<f64, Dyn>;

    /// Set the free model parameters `$\vec{p}$` and update the internal state of the
    /// problem accordingly. The parameters are expected in the order in which they appear
    /// in the model, with the fixed parameters left out.
    ///
    /// This is an implementation of the [`LeastSquaresProblem::set_params`] method.
    fn set_params(&mut self, params: &DVector<f64>) {
        self.set_free_parameters(params);
    }

    /// Retrieve the free model parameters as a vector `$\vec{p}$`.
    fn params(&self) -> DVector<f64> {
        self.free_parameters()
    }

    /// The weighted residuals `$\vec{r}_w(\vec{p}) = \mathbf{W}(\vec{f}(\vec{x},\vec{p})-\vec{y})$`.
    fn residuals(&self) -> Option<DVector<f64>> {
        self.weighted_residuals().cloned()
    }

    /// The Jacobian matrix of the weighted residuals with respect to the free parameters.
    fn jacobian(&self) -> Option<DMatrix<f64>> {
        self.weighted_jacobian()
    }
}
