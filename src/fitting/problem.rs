use crate::array::Array;
use crate::fitting::weights::Weights;
use crate::model::errors::ModelError;
use crate::model::{Evaluate, ParametricModel};
use nalgebra::{DMatrix, DVector};

/// A least squares problem that fits the free parameters of a parametric model to data.
///
/// The problem minimizes `$||\mathbf{W}(\vec{f}(\vec{x},\vec{p})-\vec{y})||^2$` over the free
/// (i.e. not fixed) parameters `$\vec{p}$` of the model. It is created using the
/// [FitProblemBuilder](super::FitProblemBuilder) and solved using the
/// [LevMarFitter](super::LevMarFitter). The current state of the model, i.e. the
/// parameters at which residuals and Jacobian are evaluated, is part of the problem.
#[derive(Debug, Clone)]
pub struct FitProblem {
    /// the model at the current parameters
    pub(crate) model: ParametricModel,
    /// the inputs, broadcast to the shape of the observations
    inputs: Vec<Array>,
    /// the shape of the observations
    shape: Vec<usize>,
    /// the observations in logical order
    observations: DVector<f64>,
    weights: Weights,
    /// indices of the free parameters in the parameter list of the model
    free: Vec<usize>,
    /// relative step size for the finite difference Jacobian
    epsilon: f64,
    /// whether to use finite differences even if analytical derivatives exist
    estimate_jacobian: bool,
    /// the weighted residuals at the current parameters, `None` if they
    /// could not be calculated
    cached: Option<DVector<f64>>,
}

impl FitProblem {
    pub(crate) fn new(
        model: ParametricModel,
        inputs: Vec<Array>,
        shape: Vec<usize>,
        observations: DVector<f64>,
        weights: Weights,
        free: Vec<usize>,
    ) -> Result<Self, ModelError> {
        debug_assert!(weights.is_size_correct_for_data_length(observations.len()));
        let mut problem = Self {
            model,
            inputs,
            shape,
            observations,
            weights,
            free,
            epsilon: f64::EPSILON.sqrt(),
            estimate_jacobian: false,
            cached: None,
        };
        problem.cached = Some(problem.calculate_weighted_residuals(&problem.model)?);
        Ok(problem)
    }

    /// set the configuration of the Jacobian calculation
    #[cfg_attr(not(feature = "levmar"), allow(dead_code))]
    pub(crate) fn configure_jacobian(&mut self, epsilon: f64, estimate_jacobian: bool) {
        self.epsilon = epsilon;
        self.estimate_jacobian = estimate_jacobian;
    }

    /// the model at the current parameters of the problem
    pub fn model(&self) -> &ParametricModel {
        &self.model
    }

    /// the number of data points
    pub fn data_len(&self) -> usize {
        self.observations.len()
    }

    /// the names of the parameters that are fitted, in order
    pub fn free_parameter_names(&self) -> Vec<&str> {
        let parameters = self.model.parameter_list();
        self.free.iter().map(|&idx| parameters[idx].name()).collect()
    }

    /// the inputs of the model, broadcast to the shape of the observations
    pub fn inputs(&self) -> &[Array] {
        &self.inputs
    }

    /// the observed data in logical (row major) order
    pub fn observations(&self) -> &DVector<f64> {
        &self.observations
    }

    /// the weights of the problem
    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    /// the current values of the free parameters
    pub fn free_parameters(&self) -> DVector<f64> {
        let values = self.model.parameters();
        DVector::from_iterator(self.free.len(), self.free.iter().map(|&idx| values[idx]))
    }

    /// Set the values of the free parameters and update the cached residuals.
    /// Values outside the bounds of a parameter are clamped into its bounds.
    pub(crate) fn set_free_parameters(&mut self, free_values: &DVector<f64>) {
        let mut values = self.model.parameters();
        let parameters = self.model.parameter_list();
        for (&idx, &value) in self.free.iter().zip(free_values.iter()) {
            values[idx] = parameters[idx].clamp(value);
        }
        if self.model.set_parameters(&values).is_err() {
            self.cached = None;
            return;
        }
        self.cached = self.calculate_weighted_residuals(&self.model).ok();
    }

    /// The weighted residuals `$\vec{r}_w = \mathbf{W}(\vec{f}(\vec{x},\vec{p})-\vec{y})$` at the
    /// current parameters. `None` if the model could not be evaluated.
    pub fn weighted_residuals(&self) -> Option<&DVector<f64>> {
        self.cached.as_ref()
    }

    /// The Jacobian of the weighted residuals with respect to the free parameters at the
    /// current parameters. The columns are ordered like the free parameters.
    ///
    /// The analytical derivatives of the model are used if the model provides them and the
    /// problem is not configured to estimate the Jacobian. Otherwise the Jacobian is calculated
    /// using forward differences. Returns `None` if the calculation failed.
    pub fn weighted_jacobian(&self) -> Option<DMatrix<f64>> {
        if !self.estimate_jacobian {
            if let Some(derivatives) = self.model.fit_deriv(&self.inputs) {
                return self.analytical_jacobian(derivatives.ok()?);
            }
        }
        self.numerical_jacobian()
    }

    fn analytical_jacobian(&self, derivatives: Vec<Array>) -> Option<DMatrix<f64>> {
        let mut jacobian = DMatrix::zeros(self.data_len(), self.free.len());
        for (mut column, &idx) in jacobian.column_iter_mut().zip(self.free.iter()) {
            column.copy_from(&self.flatten(derivatives.get(idx)?)?);
        }
        Some(&self.weights * jacobian)
    }

    /// Forward differences with step `$h_j = \sqrt{\epsilon}|p_j|$`, or `$\sqrt{\epsilon}$` if `$p_j=0$`.
    /// The step is taken backwards if the forward step would leave the upper bound of the parameter.
    fn numerical_jacobian(&self) -> Option<DMatrix<f64>> {
        let residuals = self.cached.as_ref()?;
        let step_factor = self.epsilon.max(f64::EPSILON).sqrt();
        let values = self.model.parameters();
        let parameters = self.model.parameter_list();
        let mut jacobian = DMatrix::zeros(self.data_len(), self.free.len());
        for (mut column, &idx) in jacobian.column_iter_mut().zip(self.free.iter()) {
            let mut step = step_factor * values[idx].abs();
            if step == 0. {
                step = step_factor;
            }
            let (_, upper) = parameters[idx].bounds();
            if upper.is_some_and(|upper| values[idx] + step > upper) {
                step = -step;
            }
            let mut shifted_values = values.clone();
            shifted_values[idx] += step;
            let mut shifted = self.model.clone();
            shifted.set_parameters(&shifted_values).ok()?;
            let shifted_residuals = self.calculate_weighted_residuals(&shifted).ok()?;
            column.copy_from(&((shifted_residuals - residuals) / step));
        }
        Some(jacobian)
    }

    fn calculate_weighted_residuals(
        &self,
        model: &ParametricModel,
    ) -> Result<DVector<f64>, ModelError> {
        let output = model
            .evaluate(&self.inputs)?
            .into_iter()
            .next()
            .ok_or_else(|| ModelError::OutputCountMismatch {
                model: model.tag().to_string(),
                expected: 1,
                actual: 0,
            })?;
        let values = self
            .flatten(&output)
            .ok_or_else(|| ModelError::IncompatibleShapes {
                shapes: vec![output.shape().to_vec(), self.shape.clone()],
            })?;
        Ok(&self.weights * (values - &self.observations))
    }

    /// broadcast the array to the shape of the observations and flatten it in logical order
    fn flatten(&self, array: &Array) -> Option<DVector<f64>> {
        let view = array.broadcast(self.shape.as_slice())?;
        Some(DVector::from_iterator(self.data_len(), view.iter().copied()))
    }
}
