/// A named parameter of a parametric model.
///
/// A parameter holds one value for each member of a model set (so exactly one value
/// for an ordinary model), the default value it was declared with, a flag that marks
/// it as fixed and optional lower and upper bounds. Fixed parameters are never changed
/// by a fitter. Bounds are enforced by the fitter by clamping.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub(crate) name: String,
    pub(crate) values: Vec<f64>,
    pub(crate) default: f64,
    pub(crate) fixed: bool,
    pub(crate) bounds: (Option<f64>, Option<f64>),
}

impl Parameter {
    pub(crate) fn new(name: impl Into<String>, default: f64) -> Self {
        Self {
            name: name.into(),
            values: vec![default],
            default,
            fixed: false,
            bounds: (None, None),
        }
    }

    /// the name of the parameter
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The value of the parameter. For a model set this is the value of the first model.
    pub fn value(&self) -> f64 {
        self.values[0]
    }

    /// the values of this parameter, one for each member of the model set
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// the default value that the parameter was declared with
    pub fn default_value(&self) -> f64 {
        self.default
    }

    /// whether the parameter is excluded from fitting
    pub fn is_fixed(&self) -> bool {
        self.fixed
    }

    /// lower and upper bound of the parameter, if any
    pub fn bounds(&self) -> (Option<f64>, Option<f64>) {
        self.bounds
    }

    /// clamp the given value into the bounds of this parameter
    pub(crate) fn clamp(&self, value: f64) -> f64 {
        let (min, max) = self.bounds;
        let value = min.map_or(value, |min| value.max(min));
        max.map_or(value, |max| value.min(max))
    }
}

/// A parameter compares equal to a number if it belongs to a single model
/// and its value equals the number.
impl PartialEq<f64> for Parameter {
    fn eq(&self, other: &f64) -> bool {
        self.values.len() == 1 && self.values[0] == *other
    }
}
