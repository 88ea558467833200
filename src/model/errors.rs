use crate::model::builder::error::ModelBuildError;
use crate::model::labeled::LabeledInputError;
use thiserror::Error as ThisError;

/// Errors that occur when evaluating models or when changing the
/// parameters of an existing model.
#[derive(Debug, Clone, ThisError)]
pub enum ModelError {
    /// The arrays given to a model can not be broadcast against each other
    #[error("Arrays with shapes {:?} can not be broadcast to a common shape.", shapes)]
    IncompatibleShapes {
        /// the shapes of the arrays involved
        shapes: Vec<Vec<usize>>,
    },

    /// An array could not be created from the calculated values
    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),

    /// The model was called with the wrong number of inputs
    #[error("Model '{}' takes {} inputs, but {} were given.", model, expected, actual)]
    InputCountMismatch {
        /// name of the model
        model: String,
        /// number of inputs the model takes
        expected: usize,
        /// number of inputs that were given
        actual: usize,
    },

    /// A convenience evaluation method was used on a model with an unsuitable number of outputs
    #[error("Model '{}' has {} outputs, but exactly {} are required here.", model, actual, expected)]
    OutputCountMismatch {
        /// name of the model
        model: String,
        /// number of outputs required
        expected: usize,
        /// number of outputs of the model
        actual: usize,
    },

    /// The leading axis of an input does not match the number of models in a model set
    #[error(
        "Input with shape {:?} does not match a model set of {} models along its leading axis.",
        shape,
        n_models
    )]
    ModelSetMismatch {
        /// number of models in the set
        n_models: usize,
        /// the offending input shape
        shape: Vec<usize>,
    },

    /// A model set was given parameter values of inconsistent lengths
    #[error(
        "Parameter '{}' was given {} values, but the model set has {} models.",
        parameter,
        actual,
        expected
    )]
    InconsistentModelSet {
        /// the parameter name
        parameter: String,
        /// number of models in the set
        expected: usize,
        /// number of values given
        actual: usize,
    },

    /// The requested parameter does not exist in the model
    #[error("Model '{}' has no parameter named '{}'.", model, parameter)]
    UnknownParameter {
        /// name of the model
        model: String,
        /// the requested parameter name
        parameter: String,
    },

    /// A flat parameter vector had the wrong length
    #[error("Expected {} parameter values, but {} were given.", expected, actual)]
    ParameterCountMismatch {
        /// number of values expected
        expected: usize,
        /// number of values given
        actual: usize,
    },

    /// A labeled input does not contain a channel that a model requires
    #[error("Labeled input has no channel named '{}'.", name)]
    MissingChannel {
        /// the channel name
        name: String,
    },

    /// A model was called with a labeled input but it has no channel maps
    #[error("Model '{}' has no input and output channel maps and can not evaluate labeled inputs.", model)]
    MissingChannelMap {
        /// name of the model
        model: String,
    },

    /// The model can not be inverted
    #[error("Model '{}' has no inverse.", model)]
    NoInverse {
        /// name of the model
        model: String,
    },

    /// A model that was derived from another model (e.g. an inverse) could not be constructed
    #[error(transparent)]
    Construction(#[from] ModelBuildError),

    /// Error from a labeled input
    #[error(transparent)]
    Labeled(#[from] LabeledInputError),
}
