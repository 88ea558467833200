use crate::model::builder::error::ModelBuildError;
use crate::model::errors::ModelError;
use crate::model::parameter::Parameter;
use crate::model::{
    InverseFunction, ModelFunction, ModelKind, ParameterDerivative, ParametricModel,
};
use std::collections::HashSet;
use std::sync::Arc;

/// contains the error for the model builder
pub mod error;

/// A builder that creates a [`ParametricModel`] from an explicit evaluation function,
/// an ordered list of named parameters with default values and an optional function
/// for the derivatives with respect to the parameters.
///
/// # Example
///
/// A custom sine model with analytical derivatives:
///
/// ```rust
/// # use modelfit::model::builder::ParametricModelBuilder;
/// # use modelfit::model::Evaluate;
/// let model = ParametricModelBuilder::new("Sine")
///     .parameters(&[("amplitude", 1.), ("frequency", 1.)])
///     .function_1d(|x, p| p[0] * (p[1] * x).sin())
///     .fit_deriv_1d(|x, p, d| {
///         d[0] = (p[1] * x).sin();
///         d[1] = p[0] * x * (p[1] * x).cos();
///     })
///     .build()
///     .unwrap();
/// assert_eq!(model.param_names(), vec!["amplitude", "frequency"]);
/// assert_eq!(model.eval1(0.).unwrap().sum(), 0.);
/// ```
///
/// The builder defaults to one input and one output. The evaluation function is
/// mandatory, everything else is optional.
#[must_use = "The builder should be used to build a model with the build() method"]
pub struct ParametricModelBuilder {
    tag: String,
    n_inputs: usize,
    n_outputs: usize,
    kind: ModelKind,
    hyper_parameters: Vec<usize>,
    parameters: Vec<(String, f64)>,
    function: Option<ModelFunction>,
    derivative: Option<ParameterDerivative>,
    inverse: Option<InverseFunction>,
}

impl ParametricModelBuilder {
    /// start building a model with the given type tag
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            n_inputs: 1,
            n_outputs: 1,
            kind: ModelKind::General,
            hyper_parameters: Vec::new(),
            parameters: Vec::new(),
            function: None,
            derivative: None,
            inverse: None,
        }
    }

    /// the number of inputs of the model
    pub fn inputs(mut self, n_inputs: usize) -> Self {
        self.n_inputs = n_inputs;
        self
    }

    /// the number of outputs of the model
    pub fn outputs(mut self, n_outputs: usize) -> Self {
        self.n_outputs = n_outputs;
        self
    }

    /// The ordered parameters as pairs of names and default values.
    /// Parameter names must be unique and must not contain commas.
    pub fn parameters<S: AsRef<str>>(mut self, parameters: &[(S, f64)]) -> Self {
        self.parameters = parameters
            .iter()
            .map(|(name, default)| (name.as_ref().to_string(), *default))
            .collect();
        self
    }

    /// the capability tag of the model
    pub fn kind(mut self, kind: ModelKind) -> Self {
        self.kind = kind;
        self
    }

    /// integer settings such as polynomial degrees that are stored with the model
    pub fn hyper_parameters(mut self, hyper_parameters: &[usize]) -> Self {
        self.hyper_parameters = hyper_parameters.to_vec();
        self
    }

    /// The general element-wise evaluation function. It receives the inputs and the
    /// parameters at one element position and writes one value per output.
    pub fn function<F>(mut self, function: F) -> Self
    where
        F: Fn(&[f64], &[f64], &mut [f64]) + Send + Sync + 'static,
    {
        self.function = Some(Arc::new(function));
        self
    }

    /// Evaluation function for a model with a single input and output.
    /// This also sets the arity of the model to one input and one output.
    pub fn function_1d<F>(mut self, function: F) -> Self
    where
        F: Fn(f64, &[f64]) -> f64 + Send + Sync + 'static,
    {
        self.n_inputs = 1;
        self.n_outputs = 1;
        self.function(move |x, p, out| out[0] = function(x[0], p))
    }

    /// Evaluation function for a model with two inputs and a single output.
    /// This also sets the arity of the model to two inputs and one output.
    pub fn function_2d<F>(mut self, function: F) -> Self
    where
        F: Fn(f64, f64, &[f64]) -> f64 + Send + Sync + 'static,
    {
        self.n_inputs = 2;
        self.n_outputs = 1;
        self.function(move |x, p, out| out[0] = function(x[0], x[1], p))
    }

    /// The general element-wise derivative function. It receives the inputs and
    /// parameters at one element position and writes the partial derivative with
    /// respect to each parameter (in order).
    pub fn fit_deriv<F>(mut self, derivative: F) -> Self
    where
        F: Fn(&[f64], &[f64], &mut [f64]) + Send + Sync + 'static,
    {
        self.derivative = Some(Arc::new(derivative));
        self
    }

    /// derivative function for a model with a single input
    pub fn fit_deriv_1d<F>(self, derivative: F) -> Self
    where
        F: Fn(f64, &[f64], &mut [f64]) + Send + Sync + 'static,
    {
        self.fit_deriv(move |x, p, d| derivative(x[0], p, d))
    }

    /// derivative function for a model with two inputs
    pub fn fit_deriv_2d<F>(self, derivative: F) -> Self
    where
        F: Fn(f64, f64, &[f64], &mut [f64]) + Send + Sync + 'static,
    {
        self.fit_deriv(move |x, p, d| derivative(x[0], x[1], p, d))
    }

    /// a function that creates the inverse model from the model
    pub fn inverse<F>(mut self, inverse: F) -> Self
    where
        F: Fn(&ParametricModel) -> Result<ParametricModel, ModelError> + Send + Sync + 'static,
    {
        self.inverse = Some(Arc::new(inverse));
        self
    }

    /// Build the model.
    ///
    /// # Errors
    /// Fails if the tag is empty, the parameter names are invalid, no function was
    /// given, the model has no inputs or outputs, or if a derivative was given for a
    /// model with more than one output.
    pub fn build(mut self) -> Result<ParametricModel, ModelBuildError> {
        if self.tag.is_empty() {
            return Err(ModelBuildError::EmptyTag);
        }
        if self.n_inputs == 0 || self.n_outputs == 0 {
            return Err(ModelBuildError::InvalidArity {
                inputs: self.n_inputs,
                outputs: self.n_outputs,
            });
        }
        check_parameter_names(self.parameters.iter().map(|(name, _)| name.as_str()))?;
        let function = self
            .function
            .take()
            .ok_or_else(|| ModelBuildError::MissingFunction {
                tag: self.tag.clone(),
            })?;
        if self.derivative.is_some() && self.n_outputs != 1 {
            return Err(ModelBuildError::DerivativeRequiresSingleOutput {
                outputs: self.n_outputs,
            });
        }
        Ok(self.assemble(function))
    }

    /// Build a model whose definition is known to be valid, like the models of the catalog.
    /// A missing function produces a model that evaluates to NaN.
    pub(crate) fn build_known(mut self) -> ParametricModel {
        debug_assert!(self.function.is_some(), "model '{}' has no function", self.tag);
        let function: ModelFunction = match self.function.take() {
            Some(function) => function,
            None => Arc::new(|_: &[f64], _: &[f64], out: &mut [f64]| out.fill(f64::NAN)),
        };
        self.assemble(function)
    }

    fn assemble(self, function: ModelFunction) -> ParametricModel {
        ParametricModel {
            tag: self.tag,
            kind: self.kind,
            hyper_parameters: self.hyper_parameters,
            n_inputs: self.n_inputs,
            n_outputs: self.n_outputs,
            parameters: self
                .parameters
                .into_iter()
                .map(|(name, default)| Parameter::new(name, default))
                .collect(),
            n_models: 1,
            function,
            derivative: self.derivative,
            inverse: self.inverse,
        }
    }
}

/// check that the parameter names are not empty, contain no commas and are unique
fn check_parameter_names<'a>(
    names: impl Iterator<Item = &'a str> + Clone,
) -> Result<(), ModelBuildError> {
    let mut seen = HashSet::new();
    for name in names.clone() {
        if name.is_empty() {
            return Err(ModelBuildError::EmptyParameterName);
        }
        if name.contains(',') {
            return Err(ModelBuildError::CommaInParameterNameNotAllowed {
                param_name: name.to_string(),
            });
        }
        if !seen.insert(name) {
            return Err(ModelBuildError::DuplicateParameterNames {
                parameters: names.map(str::to_string).collect(),
            });
        }
    }
    Ok(())
}
