pub use crate::array::{Array, IntoArray};
pub use crate::fitting::{FitProblemBuilder, LevMarFitter};
pub use crate::model::builder::ParametricModelBuilder;
pub use crate::model::composite::{SerialCompositeModel, SummedCompositeModel};
pub use crate::model::{
    EvalOptions, Evaluate, LabeledInput, Model, ModelKind, ModelSetAxis, ParametricModel,
};
