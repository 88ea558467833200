use super::{gather_channels, to_owned_names};
use crate::array::Array;
use crate::model::builder::error::ModelBuildError;
use crate::model::errors::ModelError;
use crate::model::{EvalOptions, Evaluate, LabeledInput, Model};
use std::fmt;

const NAME: &str = "SerialCompositeModel";

/// Models that are evaluated in series, each member consuming the outputs of the previous one.
///
/// Without a labeled input, the outputs of each member are passed positionally as the
/// inputs of the next member. With a [`LabeledInput`], every member reads its inputs from
/// the channels named in its input map and writes its outputs to the channels named in its
/// output map, so that members can work on individual channels.
///
/// ```rust
/// # use modelfit::catalog::{rotation2d, shift};
/// # use modelfit::model::composite::SerialCompositeModel;
/// # use modelfit::model::{LabeledInput, Model};
/// # use modelfit::array::IntoArray;
/// let model = SerialCompositeModel::with_maps(
///     vec![rotation2d(90.).into(), shift(1.).into()],
///     &[&["x", "y"], &["x"]],
///     &[&["x", "y"], &["x"]],
/// )
/// .unwrap();
/// let input = LabeledInput::new(vec![1f64.into_array(), 0f64.into_array()], ["x", "y"]).unwrap();
/// let result = Model::from(model).evaluate_labeled(&input).unwrap();
/// assert!((result.get("x").unwrap().sum() - 1.).abs() < 1e-12);
/// assert!((result.get("y").unwrap().sum() - 1.).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct SerialCompositeModel {
    members: Vec<Model>,
    inmap: Option<Vec<Vec<String>>>,
    outmap: Option<Vec<Vec<String>>>,
}

impl SerialCompositeModel {
    /// Chain the given models positionally.
    ///
    /// # Errors
    /// Fails if no models are given or if the number of outputs of a member does not
    /// match the number of inputs of the next member.
    pub fn new(members: Vec<Model>) -> Result<Self, ModelBuildError> {
        Self::from_parts(members, None, None)
    }

    /// Chain the given models with channel maps. The input and output maps contain the
    /// names of the channels that each member reads from and writes to.
    ///
    /// # Errors
    /// Fails if no models are given, if the maps do not have one entry for each member,
    /// or if an entry does not list as many channels as the member has inputs (outputs).
    pub fn with_maps(
        members: Vec<Model>,
        inmap: &[&[&str]],
        outmap: &[&[&str]],
    ) -> Result<Self, ModelBuildError> {
        Self::from_parts(
            members,
            Some(inmap.iter().map(|names| to_owned_names(names)).collect()),
            Some(outmap.iter().map(|names| to_owned_names(names)).collect()),
        )
    }

    pub(crate) fn from_parts(
        members: Vec<Model>,
        inmap: Option<Vec<Vec<String>>>,
        outmap: Option<Vec<Vec<String>>>,
    ) -> Result<Self, ModelBuildError> {
        if members.is_empty() {
            return Err(ModelBuildError::EmptyComposite);
        }
        match (&inmap, &outmap) {
            (Some(inmap), Some(outmap))
                if inmap.len() == members.len() && outmap.len() == members.len() =>
            {
                for (index, ((member, inputs), outputs)) in
                    members.iter().zip(inmap).zip(outmap).enumerate()
                {
                    check_channels(index, "inputs", member.n_inputs(), inputs.len())?;
                    check_channels(index, "outputs", member.n_outputs(), outputs.len())?;
                }
            }
            (None, None) => {
                for (index, pair) in members.windows(2).enumerate() {
                    if pair[0].n_outputs() != pair[1].n_inputs() {
                        return Err(ModelBuildError::SerialArityMismatch {
                            index,
                            outputs: pair[0].n_outputs(),
                            next_inputs: pair[1].n_inputs(),
                        });
                    }
                }
            }
            _ => {
                return Err(ModelBuildError::MapLengthMismatch {
                    models: members.len(),
                    inmap: inmap.as_ref().map(Vec::len),
                    outmap: outmap.as_ref().map(Vec::len),
                })
            }
        }
        Ok(Self {
            members,
            inmap,
            outmap,
        })
    }

    /// the member models in evaluation order
    pub fn members(&self) -> &[Model] {
        &self.members
    }

    /// the input channel names of each member, if channel maps were given
    pub fn inmap(&self) -> Option<&[Vec<String>]> {
        self.inmap.as_deref()
    }

    /// the output channel names of each member, if channel maps were given
    pub fn outmap(&self) -> Option<&[Vec<String>]> {
        self.outmap.as_deref()
    }

    /// Evaluate the members on the channels of a labeled input.
    ///
    /// The result holds all channels of the input, with the outputs of each member
    /// written to (or overwriting) the channels of its output map.
    pub fn evaluate_labeled(&self, input: &LabeledInput) -> Result<LabeledInput, ModelError> {
        let (Some(inmap), Some(outmap)) = (&self.inmap, &self.outmap) else {
            return Err(ModelError::MissingChannelMap {
                model: NAME.to_string(),
            });
        };
        let mut state = input.clone();
        for ((member, inputs), outputs) in self.members.iter().zip(inmap).zip(outmap) {
            let values = member.evaluate(&gather_channels(&state, inputs)?)?;
            for (name, value) in outputs.iter().zip(values) {
                state.set(name.clone(), value);
            }
        }
        Ok(state)
    }

    /// The inverse model, which applies the inverses of the members in reverse order.
    ///
    /// # Errors
    /// Fails if any of the members has no inverse.
    pub fn inverse(&self) -> Result<Self, ModelError> {
        let members = self
            .members
            .iter()
            .rev()
            .map(Model::inverse)
            .collect::<Result<Vec<_>, _>>()?;
        let reversed = |map: &Option<Vec<Vec<String>>>| {
            map.as_ref()
                .map(|map| map.iter().rev().cloned().collect::<Vec<_>>())
        };
        Ok(Self::from_parts(
            members,
            reversed(&self.outmap),
            reversed(&self.inmap),
        )?)
    }
}

fn check_channels(
    index: usize,
    direction: &'static str,
    expected: usize,
    actual: usize,
) -> Result<(), ModelBuildError> {
    if expected != actual {
        return Err(ModelBuildError::ChannelArityMismatch {
            index,
            direction,
            expected,
            actual,
        });
    }
    Ok(())
}

impl Evaluate for SerialCompositeModel {
    fn name(&self) -> &str {
        NAME
    }

    fn n_inputs(&self) -> usize {
        self.members.first().map_or(0, Evaluate::n_inputs)
    }

    fn n_outputs(&self) -> usize {
        self.members.last().map_or(0, Evaluate::n_outputs)
    }

    fn evaluate_with(
        &self,
        inputs: &[Array],
        options: EvalOptions,
    ) -> Result<Vec<Array>, ModelError> {
        let mut current = inputs.to_vec();
        for member in &self.members {
            if current.len() != member.n_inputs() {
                return Err(ModelError::InputCountMismatch {
                    model: member.name().to_string(),
                    expected: member.n_inputs(),
                    actual: current.len(),
                });
            }
            current = member.evaluate_with(&current, options)?;
        }
        Ok(current)
    }
}

impl fmt::Display for SerialCompositeModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}([", NAME)?;
        for (idx, member) in self.members.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", member)?;
        }
        write!(f, "])>")
    }
}
