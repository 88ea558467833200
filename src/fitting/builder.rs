use crate::array::{Array, IntoArray};
use crate::fitting::problem::FitProblem;
use crate::fitting::weights::Weights;
use crate::model::errors::ModelError;
use crate::model::ParametricModel;
use nalgebra::DVector;
use thiserror::Error as ThisError;

/// Errors pertaining to use errors of the [FitProblemBuilder]
#[derive(Debug, Clone, ThisError)]
pub enum FitProblemBuilderError {
    /// the values of the independent variables were not given to the builder
    #[error("Inputs not provided")]
    InputsMissing,

    /// the observed data was not given to the builder
    #[error("Observations not provided")]
    ObservationsMissing,

    /// only models with a single output can be fitted
    #[error("Only models with a single output can be fitted, but model '{}' has {} outputs.", model, n_outputs)]
    MultipleOutputs {
        /// name of the model
        model: String,
        /// number of outputs of the model
        n_outputs: usize,
    },

    /// model sets can not be fitted
    #[error("Model '{}' is a set of {} models. Only single models can be fitted.", model, n_models)]
    ModelSetNotSupported {
        /// name of the model
        model: String,
        /// number of models in the set
        n_models: usize,
    },

    /// the number of inputs does not match the model
    #[error("Model '{}' takes {} inputs, but {} were given.", model, expected, actual)]
    InputCountMismatch {
        /// name of the model
        model: String,
        /// number of inputs the model takes
        expected: usize,
        /// number of inputs given
        actual: usize,
    },

    /// an input can not be broadcast to the shape of the observations
    #[error(
        "Input with shape {:?} can not be broadcast to the shape {:?} of the observations.",
        input,
        observations
    )]
    ObservationShapeMismatch {
        /// shape of the offending input
        input: Vec<usize>,
        /// shape of the observations
        observations: Vec<usize>,
    },

    /// the observations must not be empty
    #[error("Observations must have a nonzero number of elements.")]
    ZeroLengthData,

    /// all parameters of the model are fixed
    #[error("Model '{}' has no free parameters.", model)]
    NoFreeParameters {
        /// name of the model
        model: String,
    },

    /// there are fewer data points than free parameters
    #[error(
        "Problem is underdetermined: {} data points for {} free parameters.",
        data_points,
        free_parameters
    )]
    Underdetermined {
        /// number of observed data points
        data_points: usize,
        /// number of free parameters
        free_parameters: usize,
    },

    /// observations and weights have different lengths
    #[error("The weights must have the same length as the observations. Given {} weights for {} observations.", weights, observations)]
    InvalidLengthOfWeights {
        /// number of weights
        weights: usize,
        /// number of observations
        observations: usize,
    },

    /// the model could not be evaluated at the initial parameters
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// A builder structure to create a [FitProblem], which can be used for fitting a
/// parametric model to data.
///
/// # Example
///
/// The following code creates an unweighted problem to fit the two dimensional model
/// `model` to observations `z` at the coordinates `x` and `y`. The parameters of the
/// model serve as the initial guess.
///
/// ```rust
/// # use modelfit::catalog::gaussian2d;
/// # use modelfit::array::grid::mgrid;
/// # use modelfit::fitting::FitProblemBuilder;
/// # use modelfit::model::Evaluate;
/// let (y, x) = mgrid(10, 12);
/// let z = gaussian2d(3., 5., 4., 2., 1., 0.).eval2(&x, &y).unwrap().remove(0);
/// let guess = gaussian2d(1., 5.5, 4.5, 1., 1., 0.);
/// let problem = FitProblemBuilder::new(&guess)
///     .inputs(vec![x.into_dyn(), y.into_dyn()])
///     .observations(z)
///     .build()
///     .unwrap();
/// assert_eq!(problem.data_len(), 120);
/// ```
///
/// # Building a Problem
///
/// A new builder is constructed with the [new](FitProblemBuilder::new) constructor. The inputs
/// and observations are mandatory. After they have been set, the [build](FitProblemBuilder::build)
/// method can be called. This returns a [Result](std::result::Result) that contains the finished
/// problem iff all mandatory fields have been set with valid values.
///
/// The inputs are broadcast to the shape of the observations, so that e.g. a one dimensional
/// coordinate vector can be combined with a grid of observations.
#[derive(Clone)]
#[must_use]
pub struct FitProblemBuilder {
    /// Required: the model whose parameters are fitted, its parameters are the initial guess
    model: ParametricModel,
    /// Required: the values of the independent variables
    inputs: Option<Vec<Array>>,
    /// Required: the data that we want to fit
    observations: Option<Array>,
    /// Optional: one weight per data point, unweighted if not given
    weights: Option<Array>,
}

impl FitProblemBuilder {
    /// Create a new builder for the given model. The current parameter values
    /// of the model are the initial guess of the fit.
    pub fn new(model: &ParametricModel) -> Self {
        Self {
            model: model.clone(),
            inputs: None,
            observations: None,
            weights: None,
        }
    }

    /// **Mandatory**: the values of the independent variables, one array per model input.
    pub fn inputs(self, inputs: Vec<Array>) -> Self {
        Self {
            inputs: Some(inputs),
            ..self
        }
    }

    /// **Mandatory**: the observed data that the model output is fitted to.
    pub fn observations(self, observations: impl IntoArray) -> Self {
        Self {
            observations: Some(observations.into_array()),
            ..self
        }
    }

    /// **Optional** Add one weight per data point to the problem. If this is not given, the
    /// problem is unweighted, i.e. each data point has unit weight. The weights are matched
    /// with the observations in their logical (row major) order.
    ///
    /// **Note** The weighted residual is calculated as `$||W(\vec{f}(\vec{p})-\vec{y})||^2$`, so
    /// to make weights that have a statistical meaning, they should be set to
    /// `$w_j = 1/\sigma_j$` where `$\sigma_j$` is the (estimated) standard deviation associated
    /// with data point `$y_j$`.
    pub fn weights(self, weights: impl IntoArray) -> Self {
        Self {
            weights: Some(weights.into_array()),
            ..self
        }
    }

    /// build the fitting problem from the builder.
    /// # Prerequisites
    /// * All mandatory fields have been set
    /// * the model has a single output and is not a model set
    /// * the number of inputs matches the model and every input broadcasts to the shape of
    ///   the observations
    /// * there is at least one free parameter and at least as many data points as free parameters
    /// * the weights, if given, have the same number of elements as the observations
    pub fn build(self) -> Result<FitProblem, FitProblemBuilderError> {
        let model = self.model;
        let inputs = self.inputs.ok_or(FitProblemBuilderError::InputsMissing)?;
        let observations = self
            .observations
            .ok_or(FitProblemBuilderError::ObservationsMissing)?;

        if model.n_outputs != 1 {
            return Err(FitProblemBuilderError::MultipleOutputs {
                model: model.tag().to_string(),
                n_outputs: model.n_outputs,
            });
        }
        if model.n_models() != 1 {
            return Err(FitProblemBuilderError::ModelSetNotSupported {
                model: model.tag().to_string(),
                n_models: model.n_models(),
            });
        }
        if inputs.len() != model.n_inputs {
            return Err(FitProblemBuilderError::InputCountMismatch {
                model: model.tag().to_string(),
                expected: model.n_inputs,
                actual: inputs.len(),
            });
        }

        let shape = observations.shape().to_vec();
        let inputs = inputs
            .iter()
            .map(|input| {
                input
                    .broadcast(shape.as_slice())
                    .map(|view| view.to_owned())
                    .ok_or_else(|| FitProblemBuilderError::ObservationShapeMismatch {
                        input: input.shape().to_vec(),
                        observations: shape.clone(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let data_len = observations.len();
        if data_len == 0 {
            return Err(FitProblemBuilderError::ZeroLengthData);
        }

        let free = model.free_parameter_indices();
        if free.is_empty() {
            return Err(FitProblemBuilderError::NoFreeParameters {
                model: model.tag().to_string(),
            });
        }
        if data_len < free.len() {
            return Err(FitProblemBuilderError::Underdetermined {
                data_points: data_len,
                free_parameters: free.len(),
            });
        }

        let weights = match self.weights {
            None => Weights::Unit,
            Some(weights) if weights.len() == data_len => {
                Weights::diagonal(DVector::from_iterator(data_len, weights.iter().copied()))
            }
            Some(weights) => {
                return Err(FitProblemBuilderError::InvalidLengthOfWeights {
                    weights: weights.len(),
                    observations: data_len,
                })
            }
        };

        let observations = DVector::from_iterator(data_len, observations.iter().copied());
        Ok(FitProblem::new(model, inputs, shape, observations, weights, free)?)
    }
}
