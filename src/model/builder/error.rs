use thiserror::Error as ThisError;

/// An error structure that contains error variants that occur when building a
/// parametric model or when composing models into a composite model.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum ModelBuildError {
    /// The model was given an empty type tag
    #[error("The model tag must not be empty.")]
    EmptyTag,

    /// Model parameters contain duplicates
    #[error("Parameter list {:?} contains duplicates! Parameter lists must comprise only unique elements.", parameters)]
    DuplicateParameterNames {
        /// the given parameter list containing duplicates
        parameters: Vec<String>,
    },

    /// Parameter names may not contain a comma separator, because this is most likely caused by a typo, i.e.
    /// `"tau,phi"`, instead of actually `"tau","phi"`. So this is forbidden in order to help spotting these
    /// hard to find errors.
    #[error("Parameter names may not contain comma separator: '{}'. Did you want to give two parameters?", param_name)]
    CommaInParameterNameNotAllowed {
        /// the parameter name
        param_name: String,
    },

    /// Parameter names must not be empty
    #[error("Parameter names must not be empty.")]
    EmptyParameterName,

    /// No evaluation function was given to the builder
    #[error("Tried to construct model '{}' without an evaluation function.", tag)]
    MissingFunction {
        /// the tag of the model
        tag: String,
    },

    /// A model must have at least one input and one output
    #[error("A model must have at least one input and one output, but got {} inputs and {} outputs.", inputs, outputs)]
    InvalidArity {
        /// number of inputs
        inputs: usize,
        /// number of outputs
        outputs: usize,
    },

    /// Derivatives with respect to the parameters can only be given for models with a single output
    #[error("Parameter derivatives require a model with exactly one output, but the model has {}.", outputs)]
    DerivativeRequiresSingleOutput {
        /// number of outputs of the model
        outputs: usize,
    },

    /// Tried to construct a composite model without members
    #[error("A composite model must contain at least one model.")]
    EmptyComposite,

    /// The channel maps do not have one entry per member model
    #[error(
        "Got {} models, but {:?} input maps and {:?} output maps. Give both maps with one entry per model, or neither.",
        models,
        inmap,
        outmap
    )]
    MapLengthMismatch {
        /// number of member models
        models: usize,
        /// number of entries in the input map (if given)
        inmap: Option<usize>,
        /// number of entries in the output map (if given)
        outmap: Option<usize>,
    },

    /// A channel map entry lists a different number of channels than the member model takes or produces
    #[error(
        "Channel map for model {} lists {} channels, but the model has {} {}.",
        index,
        actual,
        expected,
        direction
    )]
    ChannelArityMismatch {
        /// index of the member model
        index: usize,
        /// "inputs" or "outputs"
        direction: &'static str,
        /// arity of the model
        expected: usize,
        /// number of channels in the map
        actual: usize,
    },

    /// Adjacent members of a serial composite model can not be chained positionally
    #[error(
        "Model {} produces {} outputs, but the next model takes {} inputs.",
        index,
        outputs,
        next_inputs
    )]
    SerialArityMismatch {
        /// index of the producing model
        index: usize,
        /// number of outputs of the producing model
        outputs: usize,
        /// number of inputs of the consuming model
        next_inputs: usize,
    },

    /// A member of a summed composite model has more than one output
    #[error("Members of a summed composite model must have exactly one output, but model {} has {}.", index, outputs)]
    SummedOutputArity {
        /// index of the member model
        index: usize,
        /// number of outputs of the member
        outputs: usize,
    },

    /// The members of a summed composite model take different numbers of inputs
    #[error("Members of a summed composite model must take the same number of inputs: expected {}, but model {} takes {}.", expected, index, actual)]
    SummedInputArity {
        /// index of the member model
        index: usize,
        /// number of inputs of the first member
        expected: usize,
        /// number of inputs of this member
        actual: usize,
    },

    /// Without channel maps, the outputs of a summed composite model must have the same arity as its inputs
    #[error(
        "Model {} of a summed composite maps {} inputs to {} outputs. This requires explicit channel maps.",
        index,
        inputs,
        outputs
    )]
    SummedRequiresMaps {
        /// index of the member model
        index: usize,
        /// number of inputs of the member
        inputs: usize,
        /// number of outputs of the member
        outputs: usize,
    },
}
