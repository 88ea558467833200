use crate::array::Array;
use thiserror::Error as ThisError;

/// Errors when creating or changing a [`LabeledInput`]
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum LabeledInputError {
    /// The number of values and names differ
    #[error("Got {} values, but {} names.", values, names)]
    LengthMismatch {
        /// number of values
        values: usize,
        /// number of names
        names: usize,
    },
    /// A channel name was given more than once
    #[error("Channel name '{}' is not unique.", name)]
    DuplicateName {
        /// the duplicate name
        name: String,
    },
}

/// A collection of arrays where each array is addressed by a unique channel name.
///
/// Composite models with channel maps use labeled inputs to route named signals
/// (e.g. `x` and `y`) between their members. The order of the names is the order
/// in which they were given, lookup is by name.
///
/// ```rust
/// # use modelfit::model::LabeledInput;
/// # use modelfit::array::IntoArray;
/// let labeled = LabeledInput::new(vec![1f64.into_array(), 2f64.into_array()], ["x", "y"]).unwrap();
/// assert_eq!(labeled.names(), vec!["x", "y"]);
/// assert_eq!(labeled.get("y").unwrap().sum(), 2.);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LabeledInput {
    channels: Vec<(String, Array)>,
}

impl LabeledInput {
    /// Create a labeled input from parallel sequences of values and names.
    ///
    /// # Errors
    /// Fails if the number of values and names differ or if the names are not unique.
    pub fn new<I, S>(values: Vec<Array>, names: I) -> Result<Self, LabeledInputError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.len() != values.len() {
            return Err(LabeledInputError::LengthMismatch {
                values: values.len(),
                names: names.len(),
            });
        }
        let mut labeled = Self::default();
        for (name, value) in names.into_iter().zip(values) {
            labeled.add(name, value)?;
        }
        Ok(labeled)
    }

    /// the array in the channel with the given name
    pub fn get(&self, name: &str) -> Option<&Array> {
        self.channels
            .iter()
            .find(|(channel, _)| channel == name)
            .map(|(_, value)| value)
    }

    /// the channel names in order
    pub fn names(&self) -> Vec<&str> {
        self.channels.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// iterate over `(name, array)` pairs in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Array)> {
        self.channels
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    /// number of channels
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// whether there are no channels
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Add a new channel at the end.
    ///
    /// # Errors
    /// Fails if a channel with this name exists already.
    pub fn add(&mut self, name: impl Into<String>, value: Array) -> Result<(), LabeledInputError> {
        let name = name.into();
        if self.get(&name).is_some() {
            return Err(LabeledInputError::DuplicateName { name });
        }
        self.channels.push((name, value));
        Ok(())
    }

    /// Write a channel. An existing channel with this name is overwritten in
    /// place, otherwise the channel is appended.
    pub fn set(&mut self, name: impl Into<String>, value: Array) {
        let name = name.into();
        match self.channels.iter_mut().find(|(channel, _)| *channel == name) {
            Some((_, existing)) => *existing = value,
            None => self.channels.push((name, value)),
        }
    }
}
