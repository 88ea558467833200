use super::{gather_channels, to_owned_names};
use crate::array::{add_broadcast, Array};
use crate::model::builder::error::ModelBuildError;
use crate::model::errors::ModelError;
use crate::model::{EvalOptions, Evaluate, LabeledInput, Model};
use std::fmt;

const NAME: &str = "SummedCompositeModel";

/// Models that are evaluated on the same inputs, with their outputs summed element-wise.
///
/// Every member must have exactly one output and all members must take the same number
/// of inputs. Without channel maps, the members must also map as many inputs to as many
/// outputs, i.e. they must be one dimensional. With channel maps, the members read the
/// channels of the input map and the sum is written to the single channel of the output map.
#[derive(Debug, Clone)]
pub struct SummedCompositeModel {
    members: Vec<Model>,
    inmap: Option<Vec<String>>,
    outmap: Option<Vec<String>>,
}

impl SummedCompositeModel {
    /// Sum the given models.
    ///
    /// # Errors
    /// Fails if the members have more than one output, take different numbers of inputs
    /// or have different numbers of inputs and outputs.
    pub fn new(members: Vec<Model>) -> Result<Self, ModelBuildError> {
        Self::from_parts(members, None, None)
    }

    /// Sum the given models, which read their inputs from the channels of `inmap`
    /// and write the sum to the single channel in `outmap`.
    pub fn with_maps(
        members: Vec<Model>,
        inmap: &[&str],
        outmap: &[&str],
    ) -> Result<Self, ModelBuildError> {
        Self::from_parts(
            members,
            Some(to_owned_names(inmap)),
            Some(to_owned_names(outmap)),
        )
    }

    pub(crate) fn from_parts(
        members: Vec<Model>,
        inmap: Option<Vec<String>>,
        outmap: Option<Vec<String>>,
    ) -> Result<Self, ModelBuildError> {
        let first = members.first().ok_or(ModelBuildError::EmptyComposite)?;
        let n_inputs = first.n_inputs();
        for (index, member) in members.iter().enumerate() {
            if member.n_outputs() != 1 {
                return Err(ModelBuildError::SummedOutputArity {
                    index,
                    outputs: member.n_outputs(),
                });
            }
            if member.n_inputs() != n_inputs {
                return Err(ModelBuildError::SummedInputArity {
                    index,
                    expected: n_inputs,
                    actual: member.n_inputs(),
                });
            }
        }

        match (&inmap, &outmap) {
            (Some(inmap), Some(outmap)) => {
                if inmap.len() != n_inputs {
                    return Err(ModelBuildError::ChannelArityMismatch {
                        index: 0,
                        direction: "inputs",
                        expected: n_inputs,
                        actual: inmap.len(),
                    });
                }
                if outmap.len() != 1 {
                    return Err(ModelBuildError::ChannelArityMismatch {
                        index: 0,
                        direction: "outputs",
                        expected: 1,
                        actual: outmap.len(),
                    });
                }
            }
            (None, None) => {
                if let Some((index, member)) = members
                    .iter()
                    .enumerate()
                    .find(|(_, member)| member.n_inputs() != member.n_outputs())
                {
                    return Err(ModelBuildError::SummedRequiresMaps {
                        index,
                        inputs: member.n_inputs(),
                        outputs: member.n_outputs(),
                    });
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

    /// the member models
    pub fn members(&self) -> &[Model] {
        &self.members
    }

    /// the input channel names, if channel maps were given
    pub fn inmap(&self) -> Option<&[String]> {
        self.inmap.as_deref()
    }

    /// the output channel name, if channel maps were given
    pub fn outmap(&self) -> Option<&[String]> {
        self.outmap.as_deref()
    }

    /// Evaluate all members on the channels of the input map and write
    /// the sum to the channel of the output map.
    pub fn evaluate_labeled(&self, input: &LabeledInput) -> Result<LabeledInput, ModelError> {
        let (Some(inmap), Some(outmap)) = (&self.inmap, &self.outmap) else {
            return Err(ModelError::MissingChannelMap {
                model: NAME.to_string(),
            });
        };
        let inputs = gather_channels(input, inmap)?;
        let mut state = input.clone();
        for (name, value) in outmap.iter().zip(self.evaluate(&inputs)?) {
            state.set(name.clone(), value);
        }
        Ok(state)
    }

    /// Summed composite models can not be inverted.
    pub fn inverse(&self) -> Result<Self, ModelError> {
        Err(ModelError::NoInverse {
            model: NAME.to_string(),
        })
    }
}

impl Evaluate for SummedCompositeModel {
    fn name(&self) -> &str {
        NAME
    }

    fn n_inputs(&self) -> usize {
        self.members.first().map_or(0, Evaluate::n_inputs)
    }

    fn n_outputs(&self) -> usize {
        1
    }

    fn evaluate_with(
        &self,
        inputs: &[Array],
        options: EvalOptions,
    ) -> Result<Vec<Array>, ModelError> {
        let mut sum: Option<Array> = None;
        for member in &self.members {
            let mut outputs = member.evaluate_with(inputs, options)?;
            let output = outputs.pop().ok_or_else(|| ModelError::OutputCountMismatch {
                model: member.name().to_string(),
                expected: 1,
                actual: 0,
            })?;
            sum = Some(match sum {
                Some(sum) => add_broadcast(&sum, &output)?,
                None => output,
            });
        }
        Ok(sum.into_iter().collect())
    }
}

impl fmt::Display for SummedCompositeModel {
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
