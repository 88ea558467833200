use crate::array::{Array, IntoArray};
use crate::model::composite::{SerialCompositeModel, SummedCompositeModel};
use crate::model::errors::ModelError;
use std::fmt;

/// contains the builder code for parametric model creation
pub mod builder;
/// serial and summed composite models
pub mod composite;
/// contains the error structure that belongs to model evaluation
pub mod errors;
mod labeled;
mod parameter;
mod parametric;

pub use labeled::{LabeledInput, LabeledInputError};
pub use parameter::Parameter;
pub use parametric::{InverseFunction, ModelFunction, ParameterDerivative, ParametricModel};

/// A capability tag that tells which family a parametric model belongs to.
///
/// Consumers use this instead of type checks to decide e.g. whether
/// it makes sense to compare analytical and numerical derivatives of a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ModelKind {
    /// power series polynomials
    Polynomial,
    /// polynomials built from orthogonal basis polynomials (e.g. Chebyshev)
    OrthogonalPolynomial,
    /// any other model
    #[default]
    General,
}

impl ModelKind {
    /// whether this is any kind of polynomial
    pub fn is_polynomial(self) -> bool {
        matches!(self, ModelKind::Polynomial | ModelKind::OrthogonalPolynomial)
    }
}

/// How the inputs of a model set relate to its members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelSetAxis {
    /// The leading axis of each input indexes the member of the model set. Scalar inputs
    /// (and inputs with a leading axis of length one) are broadcast to all members.
    #[default]
    Leading,
    /// Every member of the model set sees the complete input. The outputs get an
    /// additional leading axis of length `n_models`.
    Shared,
}

/// Options for evaluating a model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EvalOptions {
    /// how inputs are distributed over the members of a model set.
    /// This has no effect for models that are not model sets.
    pub model_set_axis: ModelSetAxis,
}

impl EvalOptions {
    /// options that pass the complete input to each member of a model set
    pub fn shared() -> Self {
        Self {
            model_set_axis: ModelSetAxis::Shared,
        }
    }
}

/// The common interface of everything that maps input arrays to output arrays.
///
/// Evaluating a model never changes its parameters.
pub trait Evaluate {
    /// a descriptive name of the model, e.g. `"Gaussian1D"`
    fn name(&self) -> &str;

    /// number of inputs that the model takes
    fn n_inputs(&self) -> usize;

    /// number of outputs that the model produces
    fn n_outputs(&self) -> usize;

    /// Evaluate the model for the given positional inputs with the given options.
    ///
    /// The inputs are broadcast against each other (and against the parameters). The
    /// result contains one array per output.
    fn evaluate_with(
        &self,
        inputs: &[Array],
        options: EvalOptions,
    ) -> Result<Vec<Array>, ModelError>;

    /// Evaluate the model for the given positional inputs using default options.
    fn evaluate(&self, inputs: &[Array]) -> Result<Vec<Array>, ModelError> {
        self.evaluate_with(inputs, EvalOptions::default())
    }

    /// convenience function to evaluate a model with one input and one output
    fn eval1(&self, x: impl IntoArray) -> Result<Array, ModelError>
    where
        Self: Sized,
    {
        if self.n_outputs() != 1 {
            return Err(ModelError::OutputCountMismatch {
                model: self.name().to_string(),
                expected: 1,
                actual: self.n_outputs(),
            });
        }
        let mut outputs = self.evaluate(&[x.into_array()])?;
        outputs.pop().ok_or_else(|| ModelError::OutputCountMismatch {
            model: self.name().to_string(),
            expected: 1,
            actual: 0,
        })
    }

    /// convenience function to evaluate a model with two inputs. Returns all outputs.
    fn eval2(&self, x: impl IntoArray, y: impl IntoArray) -> Result<Vec<Array>, ModelError>
    where
        Self: Sized,
    {
        self.evaluate(&[x.into_array(), y.into_array()])
    }
}

/// Any model: either a parametric model or a composition of models.
///
/// Composite models contain other models, so compositions can be nested
/// arbitrarily, e.g. a summed composite model can contain a serial composite model.
#[derive(Debug, Clone)]
pub enum Model {
    /// a single parametric model
    Parametric(ParametricModel),
    /// models evaluated in series
    Serial(SerialCompositeModel),
    /// models evaluated in parallel, with their outputs summed
    Summed(SummedCompositeModel),
}

impl Model {
    /// Evaluate the model on named channels.
    ///
    /// Only composite models with channel maps can do this. The returned labeled
    /// input contains the channels of the input with the results written to the
    /// output channels of the model.
    pub fn evaluate_labeled(&self, input: &LabeledInput) -> Result<LabeledInput, ModelError> {
        match self {
            Model::Parametric(model) => Err(ModelError::MissingChannelMap {
                model: model.name().to_string(),
            }),
            Model::Serial(model) => model.evaluate_labeled(input),
            Model::Summed(model) => model.evaluate_labeled(input),
        }
    }

    /// Create the inverse of this model, if it exists.
    pub fn inverse(&self) -> Result<Model, ModelError> {
        match self {
            Model::Parametric(model) => model.inverse().map(Model::from),
            Model::Serial(model) => model.inverse().map(Model::from),
            Model::Summed(model) => model.inverse().map(Model::from),
        }
    }

    /// the parametric model, if this is one
    pub fn as_parametric(&self) -> Option<&ParametricModel> {
        match self {
            Model::Parametric(model) => Some(model),
            _ => None,
        }
    }
}

impl Evaluate for Model {
    fn name(&self) -> &str {
        match self {
            Model::Parametric(model) => model.name(),
            Model::Serial(model) => model.name(),
            Model::Summed(model) => model.name(),
        }
    }

    fn n_inputs(&self) -> usize {
        match self {
            Model::Parametric(model) => model.n_inputs(),
            Model::Serial(model) => model.n_inputs(),
            Model::Summed(model) => model.n_inputs(),
        }
    }

    fn n_outputs(&self) -> usize {
        match self {
            Model::Parametric(model) => model.n_outputs(),
            Model::Serial(model) => model.n_outputs(),
            Model::Summed(model) => model.n_outputs(),
        }
    }

    fn evaluate_with(
        &self,
        inputs: &[Array],
        options: EvalOptions,
    ) -> Result<Vec<Array>, ModelError> {
        match self {
            Model::Parametric(model) => model.evaluate_with(inputs, options),
            Model::Serial(model) => model.evaluate_with(inputs, options),
            Model::Summed(model) => model.evaluate_with(inputs, options),
        }
    }
}

impl From<ParametricModel> for Model {
    fn from(model: ParametricModel) -> Self {
        Model::Parametric(model)
    }
}

impl From<SerialCompositeModel> for Model {
    fn from(model: SerialCompositeModel) -> Self {
        Model::Serial(model)
    }
}

impl From<SummedCompositeModel> for Model {
    fn from(model: SummedCompositeModel) -> Self {
        Model::Summed(model)
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Model::Parametric(model) => write!(f, "{}", model),
            Model::Serial(model) => write!(f, "{}", model),
            Model::Summed(model) => write!(f, "{}", model),
        }
    }
}
