//! An explicit byte format for models.
//!
//! Models are converted into [`ModelRecord`]s, which store the type tag, the
//! hyper parameters and the parameter values of every parametric model together
//! with the structure and channel maps of composite models. The records are
//! encoded as JSON. Since the evaluation functions of models can not be stored,
//! deserialization recreates every parametric model from its tag using a
//! [`ModelRegistry`] and then restores the stored parameters.
//!
//! ```rust
//! # use modelfit::catalog::{gaussian1d, polynomial1d};
//! # use modelfit::model::composite::SerialCompositeModel;
//! # use modelfit::model::{Evaluate, Model};
//! # use modelfit::serialization::{from_bytes, to_bytes};
//! let model = Model::from(
//!     SerialCompositeModel::new(vec![polynomial1d(3).into(), gaussian1d(10.3, 5.4, 1.2).into()])
//!         .unwrap(),
//! );
//! let bytes = to_bytes(&model).unwrap();
//! let restored = from_bytes(&bytes).unwrap();
//! assert_eq!(restored.eval1(3.).unwrap(), model.eval1(3.).unwrap());
//! ```

use crate::catalog;
use crate::model::builder::error::ModelBuildError;
use crate::model::composite::{SerialCompositeModel, SummedCompositeModel};
use crate::model::errors::ModelError;
use crate::model::{Model, Parameter, ParametricModel};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error as ThisError;

mod float;

/// Errors during serialization and deserialization of models
#[derive(Debug, ThisError)]
pub enum SerializationError {
    /// The bytes are not a valid encoding of a model record
    #[error("Malformed model record: {0}")]
    Encoding(#[from] serde_json::Error),

    /// The registry knows no constructor for the stored tag
    #[error("No constructor is registered for model tag '{}'.", tag)]
    UnknownTag {
        /// the stored tag
        tag: String,
    },

    /// The stored hyper parameters are not accepted by the constructor of the tag
    #[error("Model '{}' can not be constructed with hyper parameters {:?}.", tag, hyper_parameters)]
    InvalidHyperParameters {
        /// the stored tag
        tag: String,
        /// the stored hyper parameters
        hyper_parameters: Vec<usize>,
    },

    /// The stored parameters do not match the parameters of the constructed model
    #[error("Stored parameters do not fit model '{}': {}", tag, source)]
    ParameterMismatch {
        /// the stored tag
        tag: String,
        /// what did not match
        source: ModelError,
    },

    /// The stored structure of a composite model is invalid
    #[error(transparent)]
    Composite(#[from] ModelBuildError),
}

/// The stored state of a single parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterRecord {
    /// parameter name
    pub name: String,
    /// one value per member of the model set
    #[serde(with = "float::list")]
    pub values: Vec<f64>,
    /// the declared default value
    #[serde(with = "float::scalar")]
    pub default: f64,
    /// whether the parameter is fixed
    pub fixed: bool,
    /// lower and upper bounds
    #[serde(with = "float::bounds")]
    pub bounds: (Option<f64>, Option<f64>),
}

/// The stored form of a model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelRecord {
    /// a parametric model
    Parametric {
        /// the type tag that selects the constructor
        tag: String,
        /// the hyper parameters that are passed to the constructor
        hyper_parameters: Vec<usize>,
        /// number of members of the model set
        n_models: usize,
        /// the parameters in order
        parameters: Vec<ParameterRecord>,
    },
    /// a serial composite model
    Serial {
        /// the member records in order
        members: Vec<ModelRecord>,
        /// input channel names per member
        inmap: Option<Vec<Vec<String>>>,
        /// output channel names per member
        outmap: Option<Vec<Vec<String>>>,
    },
    /// a summed composite model
    Summed {
        /// the member records in order
        members: Vec<ModelRecord>,
        /// input channel names
        inmap: Option<Vec<String>>,
        /// output channel name
        outmap: Option<Vec<String>>,
    },
}

impl From<&Parameter> for ParameterRecord {
    fn from(parameter: &Parameter) -> Self {
        Self {
            name: parameter.name().to_string(),
            values: parameter.values().to_vec(),
            default: parameter.default_value(),
            fixed: parameter.is_fixed(),
            bounds: parameter.bounds(),
        }
    }
}

impl From<ParameterRecord> for Parameter {
    fn from(record: ParameterRecord) -> Self {
        Self {
            name: record.name,
            values: record.values,
            default: record.default,
            fixed: record.fixed,
            bounds: record.bounds,
        }
    }
}

impl From<&ParametricModel> for ModelRecord {
    fn from(model: &ParametricModel) -> Self {
        ModelRecord::Parametric {
            tag: model.tag().to_string(),
            hyper_parameters: model.hyper_parameters().to_vec(),
            n_models: model.n_models(),
            parameters: model.parameter_list().iter().map(Into::into).collect(),
        }
    }
}

impl From<&Model> for ModelRecord {
    fn from(model: &Model) -> Self {
        match model {
            Model::Parametric(model) => model.into(),
            Model::Serial(model) => ModelRecord::Serial {
                members: model.members().iter().map(Into::into).collect(),
                inmap: model.inmap().map(<[_]>::to_vec),
                outmap: model.outmap().map(<[_]>::to_vec),
            },
            Model::Summed(model) => ModelRecord::Summed {
                members: model.members().iter().map(Into::into).collect(),
                inmap: model.inmap().map(<[_]>::to_vec),
                outmap: model.outmap().map(<[_]>::to_vec),
            },
        }
    }
}

/// A constructor that creates a parametric model with default parameters from the hyper
/// parameters and the number of stored parameters
pub type ModelConstructor = Arc<dyn Fn(&[usize], usize) -> Option<ParametricModel> + Send + Sync>;

/// The dispatch table from model tags to model constructors.
///
/// The registry returned by [`ModelRegistry::with_catalog`] knows every model of the
/// [catalog](crate::catalog). Custom models must be registered to be deserializable.
#[derive(Clone, Default)]
pub struct ModelRegistry {
    constructors: HashMap<String, ModelConstructor>,
}

impl ModelRegistry {
    /// an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// a registry that contains all models of the catalog
    pub fn with_catalog() -> Self {
        let mut registry = Self::new();
        registry.register_without_hyper_parameters("Gaussian1D", || catalog::gaussian1d(1., 0., 1.));
        registry.register_without_hyper_parameters("Sine1D", || catalog::sine1d(1., 1.));
        registry.register_without_hyper_parameters("Linear1D", || catalog::linear1d(1., 0.));
        registry.register_without_hyper_parameters("Lorentz1D", || catalog::lorentz1d(1., 0., 1.));
        registry.register_without_hyper_parameters("Const1D", || catalog::const1d(1.));
        registry.register_without_hyper_parameters("Const2D", || catalog::const2d(1.));
        registry.register_without_hyper_parameters("Gaussian2D", || {
            catalog::gaussian2d(1., 0., 0., 1., 1., 0.)
        });
        registry.register_without_hyper_parameters("Shift", || catalog::shift(0.));
        registry.register_without_hyper_parameters("Scale", || catalog::scale(1.));
        registry.register_without_hyper_parameters("Rotation2D", || catalog::rotation2d(0.));
        // the degrees are only trusted if they imply the number of stored coefficients
        registry.register_with_parameter_count("Polynomial1D", |hyper, n_parameters| match hyper {
            &[degree] if coefficients_1d(degree) == Some(n_parameters) => {
                Some(catalog::polynomial1d(degree))
            }
            _ => None,
        });
        registry.register_with_parameter_count("Polynomial2D", |hyper, n_parameters| match hyper {
            &[degree] if coefficients_2d(degree) == Some(n_parameters) => {
                Some(catalog::polynomial2d(degree))
            }
            _ => None,
        });
        registry.register_with_parameter_count("Chebyshev1D", |hyper, n_parameters| match hyper {
            &[degree] if coefficients_1d(degree) == Some(n_parameters) => {
                Some(catalog::chebyshev1d(degree))
            }
            _ => None,
        });
        registry.register_with_parameter_count("Chebyshev2D", |hyper, n_parameters| match hyper {
            &[x_degree, y_degree]
                if coefficients_1d(x_degree)
                    .zip(coefficients_1d(y_degree))
                    .and_then(|(nx, ny)| nx.checked_mul(ny))
                    == Some(n_parameters) =>
            {
                Some(catalog::chebyshev2d(x_degree, y_degree))
            }
            _ => None,
        });
        registry
    }

    /// Register a constructor for a tag, replacing any previous constructor for it.
    ///
    /// The constructor receives the stored hyper parameters and returns `None` if it
    /// does not accept them.
    pub fn register<F>(&mut self, tag: impl Into<String>, constructor: F)
    where
        F: Fn(&[usize]) -> Option<ParametricModel> + Send + Sync + 'static,
    {
        self.register_with_parameter_count(tag, move |hyper, _| constructor(hyper));
    }

    /// Register a constructor that also receives the number of stored parameters, so it can
    /// reject hyper parameters that do not match the stored record before allocating a model.
    pub fn register_with_parameter_count<F>(&mut self, tag: impl Into<String>, constructor: F)
    where
        F: Fn(&[usize], usize) -> Option<ParametricModel> + Send + Sync + 'static,
    {
        self.constructors.insert(tag.into(), Arc::new(constructor));
    }

    /// Register a constructor for a model without hyper parameters.
    pub fn register_without_hyper_parameters<F>(&mut self, tag: impl Into<String>, constructor: F)
    where
        F: Fn() -> ParametricModel + Send + Sync + 'static,
    {
        self.register(tag, move |hyper| hyper.is_empty().then(&constructor));
    }

    /// whether a constructor for the tag is registered
    pub fn contains(&self, tag: &str) -> bool {
        self.constructors.contains_key(tag)
    }

    /// Recreate a model from its record.
    pub fn restore(&self, record: ModelRecord) -> Result<Model, SerializationError> {
        match record {
            ModelRecord::Parametric {
                tag,
                hyper_parameters,
                n_models,
                parameters,
            } => {
                let constructor =
                    self.constructors
                        .get(&tag)
                        .ok_or_else(|| SerializationError::UnknownTag {
                            tag: tag.clone(),
                        })?;
                let Some(mut model) = constructor(&hyper_parameters, parameters.len()) else {
                    return Err(SerializationError::InvalidHyperParameters {
                        tag,
                        hyper_parameters,
                    });
                };
                model
                    .restore(n_models, parameters.into_iter().map(Into::into).collect())
                    .map_err(|source| SerializationError::ParameterMismatch {
                        tag: tag.clone(),
                        source,
                    })?;
                Ok(model.into())
            }
            ModelRecord::Serial {
                members,
                inmap,
                outmap,
            } => {
                let members = self.restore_all(members)?;
                Ok(SerialCompositeModel::from_parts(members, inmap, outmap)?.into())
            }
            ModelRecord::Summed {
                members,
                inmap,
                outmap,
            } => {
                let members = self.restore_all(members)?;
                Ok(SummedCompositeModel::from_parts(members, inmap, outmap)?.into())
            }
        }
    }

    fn restore_all(&self, records: Vec<ModelRecord>) -> Result<Vec<Model>, SerializationError> {
        records
            .into_iter()
            .map(|record| self.restore(record))
            .collect()
    }

    /// Decode a model from bytes created by [`to_bytes`].
    pub fn from_bytes(&self, bytes: &[u8]) -> Result<Model, SerializationError> {
        let record: ModelRecord = serde_json::from_slice(bytes)?;
        self.restore(record)
    }
}

/// number of coefficients of a one dimensional series of the given degree
fn coefficients_1d(degree: usize) -> Option<usize> {
    degree.checked_add(1)
}

/// number of coefficients of a two dimensional polynomial of the given total degree
fn coefficients_2d(degree: usize) -> Option<usize> {
    let terms = degree.checked_add(1)?.checked_mul(degree.checked_add(2)?)?;
    Some(terms / 2)
}

impl fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<_> = self.constructors.keys().collect();
        tags.sort();
        f.debug_struct("ModelRegistry").field("tags", &tags).finish()
    }
}

/// Encode a model as bytes.
pub fn to_bytes(model: &Model) -> Result<Vec<u8>, SerializationError> {
    Ok(serde_json::to_vec(&ModelRecord::from(model))?)
}

/// Decode a model that consists only of catalog models from bytes created by [`to_bytes`].
/// Use [`ModelRegistry::from_bytes`] for models that contain custom models.
pub fn from_bytes(bytes: &[u8]) -> Result<Model, SerializationError> {
    ModelRegistry::with_catalog().from_bytes(bytes)
}
