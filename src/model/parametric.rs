use crate::array::{map_elementwise, Array, IntoArray};
use crate::model::errors::ModelError;
use crate::model::parameter::Parameter;
use crate::model::{EvalOptions, Evaluate, ModelKind, ModelSetAxis};
use ndarray::{ArrayD, Axis, IxDyn};
use std::fmt;
use std::sync::Arc;

/// The element-wise evaluation kernel of a parametric model.
///
/// It is called with the values of the inputs and the parameters at one element
/// position and must write one value per model output into the last argument.
pub type ModelFunction = Arc<dyn Fn(&[f64], &[f64], &mut [f64]) + Send + Sync>;

/// The element-wise derivative kernel of a parametric model.
///
/// Same signature as the [`ModelFunction`], but it writes the partial derivative
/// of the (single) output with respect to each parameter.
pub type ParameterDerivative = Arc<dyn Fn(&[f64], &[f64], &mut [f64]) + Send + Sync>;

/// Creates the inverse of a model from the model itself (with its current parameters).
pub type InverseFunction =
    Arc<dyn Fn(&ParametricModel) -> Result<ParametricModel, ModelError> + Send + Sync>;

/// A mathematical function of one or more inputs and a fixed, ordered set
/// of named parameters.
///
/// Parametric models are created either from the [catalog](crate::catalog) or with
/// the [`ParametricModelBuilder`](crate::model::builder::ParametricModelBuilder).
/// Evaluating a model never changes it. The parameters can only be changed via the
/// explicit setters or by a fitter, which returns an updated copy.
///
/// # Model Sets
///
/// A parametric model can represent a set of `n_models` models of the same kind that
/// differ only in their parameter values. See [`ParametricModel::with_model_set`] and
/// [`ModelSetAxis`] for how inputs are distributed over the members.
#[derive(Clone)]
pub struct ParametricModel {
    pub(crate) tag: String,
    pub(crate) kind: ModelKind,
    pub(crate) hyper_parameters: Vec<usize>,
    pub(crate) n_inputs: usize,
    pub(crate) n_outputs: usize,
    pub(crate) parameters: Vec<Parameter>,
    pub(crate) n_models: usize,
    pub(crate) function: ModelFunction,
    pub(crate) derivative: Option<ParameterDerivative>,
    pub(crate) inverse: Option<InverseFunction>,
}

impl ParametricModel {
    /// the type tag of the model, e.g. `"Gaussian1D"`
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// the capability tag of the model
    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    /// Integer settings that determine the parameter layout of the model,
    /// e.g. the degree of a polynomial. Empty for most models.
    pub fn hyper_parameters(&self) -> &[usize] {
        &self.hyper_parameters
    }

    /// the number of members of the model set (`1` for an ordinary model)
    pub fn n_models(&self) -> usize {
        self.n_models
    }

    /// the parameter names in order
    pub fn param_names(&self) -> Vec<&str> {
        self.parameters.iter().map(Parameter::name).collect()
    }

    /// get a parameter by name
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// all parameters in order
    pub fn parameter_list(&self) -> &[Parameter] {
        &self.parameters
    }

    /// The values of all parameters as a flat vector. For model sets the values
    /// of each parameter for all members are consecutive.
    pub fn parameters(&self) -> Vec<f64> {
        self.parameters
            .iter()
            .flat_map(|p| p.values.iter().copied())
            .collect()
    }

    /// Set all parameter values from a flat vector in the layout of [`ParametricModel::parameters`].
    /// This also changes fixed parameters.
    pub fn set_parameters(&mut self, values: &[f64]) -> Result<(), ModelError> {
        let expected = self.parameters.len() * self.n_models;
        if values.len() != expected {
            return Err(ModelError::ParameterCountMismatch {
                expected,
                actual: values.len(),
            });
        }
        for (param, chunk) in self
            .parameters
            .iter_mut()
            .zip(values.chunks_exact(self.n_models))
        {
            param.values.copy_from_slice(chunk);
        }
        Ok(())
    }

    /// Set the value of a parameter. For a model set the value is set for all members.
    pub fn set_value(&mut self, name: &str, value: f64) -> Result<(), ModelError> {
        let param = self.parameter_mut(name)?;
        param.values.iter_mut().for_each(|v| *v = value);
        Ok(())
    }

    /// Set the values of a parameter for each member of a model set.
    pub fn set_values(&mut self, name: &str, values: &[f64]) -> Result<(), ModelError> {
        let n_models = self.n_models;
        let param = self.parameter_mut(name)?;
        if values.len() != n_models {
            return Err(ModelError::InconsistentModelSet {
                parameter: name.to_string(),
                expected: n_models,
                actual: values.len(),
            });
        }
        param.values.copy_from_slice(values);
        Ok(())
    }

    /// Mark a parameter as fixed (or free). Fixed parameters are not changed by fitting.
    pub fn set_fixed(&mut self, name: &str, fixed: bool) -> Result<(), ModelError> {
        self.parameter_mut(name)?.fixed = fixed;
        Ok(())
    }

    /// Set lower and upper bounds of a parameter. `None` means unbounded.
    pub fn set_bounds(
        &mut self,
        name: &str,
        min: Option<f64>,
        max: Option<f64>,
    ) -> Result<(), ModelError> {
        self.parameter_mut(name)?.bounds = (min, max);
        Ok(())
    }

    /// convenience function to fix a parameter by value
    pub fn with_fixed(mut self, name: &str) -> Result<Self, ModelError> {
        self.set_fixed(name, true)?;
        Ok(self)
    }

    /// convenience function to set the value of a parameter by value
    pub fn with_value(mut self, name: &str, value: f64) -> Result<Self, ModelError> {
        self.set_value(name, value)?;
        Ok(self)
    }

    /// convenience function to bound a parameter by value
    pub fn with_bounds(
        mut self,
        name: &str,
        min: Option<f64>,
        max: Option<f64>,
    ) -> Result<Self, ModelError> {
        self.set_bounds(name, min, max)?;
        Ok(self)
    }

    /// Turn the model into a model set.
    ///
    /// Every given parameter receives one value per member of the set, the number of
    /// members is the number of values given. All given parameters must have the same
    /// number of values. Parameters that are not given keep their current (first) value
    /// for all members.
    ///
    /// ```rust
    /// # use modelfit::catalog::shift;
    /// # use modelfit::model::Evaluate;
    /// let shifts = shift(0.).with_model_set(&[("offset", vec![42., 43.])]).unwrap();
    /// assert_eq!(shifts.n_models(), 2);
    /// let shifted = shifts.eval1(0.).unwrap();
    /// assert_eq!(shifted.as_slice().unwrap(), &[42., 43.]);
    /// ```
    pub fn with_model_set(mut self, values: &[(&str, Vec<f64>)]) -> Result<Self, ModelError> {
        let Some((first_name, first_values)) = values.first() else {
            return Ok(self);
        };
        let n_models = first_values.len();
        if n_models == 0 {
            return Err(ModelError::InconsistentModelSet {
                parameter: first_name.to_string(),
                expected: 1,
                actual: 0,
            });
        }

        for (name, member_values) in values {
            if member_values.len() != n_models {
                return Err(ModelError::InconsistentModelSet {
                    parameter: name.to_string(),
                    expected: n_models,
                    actual: member_values.len(),
                });
            }
            // validate the name before anything is changed
            self.parameter_index(name)?;
        }

        for param in self.parameters.iter_mut() {
            match values.iter().find(|(name, _)| *name == param.name) {
                Some((_, member_values)) => param.values = member_values.clone(),
                None => param.values = vec![param.value(); n_models],
            }
        }
        self.n_models = n_models;
        Ok(self)
    }

    /// whether the model provides analytical derivatives with respect to its parameters
    pub fn has_fit_deriv(&self) -> bool {
        self.derivative.is_some()
    }

    /// Calculate the partial derivatives of the model output with respect to all
    /// parameters (fixed parameters included) at the given inputs.
    ///
    /// Returns `None` if the model does not provide analytical derivatives. Otherwise the
    /// result contains one array per parameter, each with the broadcast shape of the inputs.
    pub fn fit_deriv(&self, inputs: &[Array]) -> Option<Result<Vec<Array>, ModelError>> {
        let derivative = self.derivative.as_ref()?;
        let n_params = self.parameters.len();
        Some(
            self.broadcast_operands(inputs, EvalOptions::default())
                .and_then(|(inputs, params)| {
                    self.map_kernel(&inputs, &params, n_params, derivative.as_ref())
                }),
        )
    }

    /// Create the inverse of the model.
    ///
    /// # Errors
    /// Returns [`ModelError::NoInverse`] if the model has no inverse.
    pub fn inverse(&self) -> Result<ParametricModel, ModelError> {
        match &self.inverse {
            Some(inverse) => inverse(self),
            None => Err(ModelError::NoInverse {
                model: self.tag.clone(),
            }),
        }
    }

    /// index of the parameter with the given name
    pub(crate) fn parameter_index(&self, name: &str) -> Result<usize, ModelError> {
        self.parameters
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| ModelError::UnknownParameter {
                model: self.tag.clone(),
                parameter: name.to_string(),
            })
    }

    /// indices of the parameters that are not fixed
    pub(crate) fn free_parameter_indices(&self) -> Vec<usize> {
        self.parameters
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.fixed)
            .map(|(idx, _)| idx)
            .collect()
    }

    fn parameter_mut(&mut self, name: &str) -> Result<&mut Parameter, ModelError> {
        let idx = self.parameter_index(name)?;
        Ok(&mut self.parameters[idx])
    }

    /// Replace the parameters and the model set size, e.g. after deserialization.
    /// The parameter names must match the names of this model in order.
    pub(crate) fn restore(
        &mut self,
        n_models: usize,
        parameters: Vec<Parameter>,
    ) -> Result<(), ModelError> {
        if n_models == 0 {
            return Err(ModelError::InconsistentModelSet {
                parameter: self.parameters.first().map_or(String::new(), |p| p.name.clone()),
                expected: 1,
                actual: 0,
            });
        }
        if parameters.len() != self.parameters.len() {
            return Err(ModelError::ParameterCountMismatch {
                expected: self.parameters.len(),
                actual: parameters.len(),
            });
        }
        for (current, restored) in self.parameters.iter().zip(parameters.iter()) {
            if current.name != restored.name {
                return Err(ModelError::UnknownParameter {
                    model: self.tag.clone(),
                    parameter: restored.name.clone(),
                });
            }
            if restored.values.len() != n_models {
                return Err(ModelError::InconsistentModelSet {
                    parameter: restored.name.clone(),
                    expected: n_models,
                    actual: restored.values.len(),
                });
            }
        }
        self.n_models = n_models;
        self.parameters = parameters;
        Ok(())
    }

    /// Bring the inputs and parameters into shapes that broadcast against each other
    /// according to the model set rules.
    fn broadcast_operands(
        &self,
        inputs: &[Array],
        options: EvalOptions,
    ) -> Result<(Vec<Array>, Vec<Array>), ModelError> {
        if inputs.len() != self.n_inputs {
            return Err(ModelError::InputCountMismatch {
                model: self.tag.clone(),
                expected: self.n_inputs,
                actual: inputs.len(),
            });
        }

        if self.n_models == 1 {
            let params = self
                .parameters
                .iter()
                .map(|p| p.value().into_array())
                .collect();
            return Ok((inputs.to_vec(), params));
        }

        let ndim = inputs.iter().map(|x| x.ndim()).max().unwrap_or(0);
        let (inputs, param_ndim) = match options.model_set_axis {
            ModelSetAxis::Leading => {
                for x in inputs.iter().filter(|x| x.ndim() > 0) {
                    let leading = x.shape()[0];
                    if x.ndim() != ndim || (leading != self.n_models && leading != 1) {
                        return Err(ModelError::ModelSetMismatch {
                            n_models: self.n_models,
                            shape: x.shape().to_vec(),
                        });
                    }
                }
                (inputs.to_vec(), ndim.max(1))
            }
            ModelSetAxis::Shared => (
                inputs
                    .iter()
                    .map(|x| x.clone().insert_axis(Axis(0)))
                    .collect(),
                ndim + 1,
            ),
        };

        let mut shape = vec![1; param_ndim];
        shape[0] = self.n_models;
        let params = self
            .parameters
            .iter()
            .map(|p| ArrayD::from_shape_vec(IxDyn(&shape), p.values.clone()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok((inputs, params))
    }

    fn map_kernel(
        &self,
        inputs: &[Array],
        params: &[Array],
        n_outputs: usize,
        kernel: &(dyn Fn(&[f64], &[f64], &mut [f64]) + Send + Sync),
    ) -> Result<Vec<Array>, ModelError> {
        let operands: Vec<&Array> = inputs.iter().chain(params.iter()).collect();
        let n_inputs = self.n_inputs;
        map_elementwise(&operands, n_outputs, |args, out| {
            kernel(&args[..n_inputs], &args[n_inputs..], out)
        })
    }
}

impl Evaluate for ParametricModel {
    fn name(&self) -> &str {
        &self.tag
    }

    fn n_inputs(&self) -> usize {
        self.n_inputs
    }

    fn n_outputs(&self) -> usize {
        self.n_outputs
    }

    fn evaluate_with(
        &self,
        inputs: &[Array],
        options: EvalOptions,
    ) -> Result<Vec<Array>, ModelError> {
        let (inputs, params) = self.broadcast_operands(inputs, options)?;
        self.map_kernel(&inputs, &params, self.n_outputs, self.function.as_ref())
    }
}

impl fmt::Debug for ParametricModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParametricModel")
            .field("tag", &self.tag)
            .field("kind", &self.kind)
            .field("hyper_parameters", &self.hyper_parameters)
            .field("n_inputs", &self.n_inputs)
            .field("n_outputs", &self.n_outputs)
            .field("n_models", &self.n_models)
            .field("parameters", &self.parameters)
            .field("has_fit_deriv", &self.derivative.is_some())
            .field("has_inverse", &self.inverse.is_some())
            .finish()
    }
}

/// Renders e.g. `<Gaussian1D(amplitude=1.0, mean=2.0, stddev=3.0)>`. Parameters of
/// model sets are rendered as lists.
impl fmt::Display for ParametricModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}(", self.tag)?;
        for (idx, param) in self.parameters.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            if self.n_models == 1 {
                write!(f, "{}={:?}", param.name, param.value())?;
            } else {
                write!(f, "{}={:?}", param.name, param.values)?;
            }
        }
        write!(f, ")>")
    }
}
