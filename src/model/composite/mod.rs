use crate::array::Array;
use crate::model::errors::ModelError;
use crate::model::LabeledInput;

mod serial;
mod summed;

pub use serial::SerialCompositeModel;
pub use summed::SummedCompositeModel;

/// collect the arrays of the given channels in order
fn gather_channels(state: &LabeledInput, names: &[String]) -> Result<Vec<Array>, ModelError> {
    names
        .iter()
        .map(|name| {
            state
                .get(name)
                .cloned()
                .ok_or_else(|| ModelError::MissingChannel { name: name.clone() })
        })
        .collect()
}

fn to_owned_names(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}
