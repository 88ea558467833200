//! Encodings for floating point values that keep non-finite values.
//!
//! JSON has no representation for infinities and NaN, so they are stored as the
//! strings `"inf"`, `"-inf"` and `"nan"`. Finite values are stored as numbers.

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy)]
struct StoredFloat(f64);

#[derive(Deserialize)]
#[serde(untagged)]
enum Repr {
    Number(f64),
    Text(String),
}

impl Serialize for StoredFloat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let value = self.0;
        if value.is_finite() {
            serializer.serialize_f64(value)
        } else if value.is_nan() {
            serializer.serialize_str("nan")
        } else if value > 0. {
            serializer.serialize_str("inf")
        } else {
            serializer.serialize_str("-inf")
        }
    }
}

impl<'de> Deserialize<'de> for StoredFloat {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(value) => Ok(Self(value)),
            Repr::Text(text) => match text.as_str() {
                "inf" => Ok(Self(f64::INFINITY)),
                "-inf" => Ok(Self(f64::NEG_INFINITY)),
                "nan" => Ok(Self(f64::NAN)),
                other => Err(de::Error::invalid_value(
                    de::Unexpected::Str(other),
                    &"a number, \"inf\", \"-inf\" or \"nan\"",
                )),
            },
        }
    }
}

/// a single value
pub(super) mod scalar {
    use super::*;

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        StoredFloat(*value).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        StoredFloat::deserialize(deserializer).map(|stored| stored.0)
    }
}

/// a list of values
pub(super) mod list {
    use super::*;

    pub fn serialize<S: Serializer>(values: &[f64], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(values.iter().copied().map(StoredFloat))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<f64>, D::Error> {
        let stored = Vec::<StoredFloat>::deserialize(deserializer)?;
        Ok(stored.into_iter().map(|stored| stored.0).collect())
    }
}

/// a pair of optional lower and upper bounds
pub(super) mod bounds {
    use super::*;

    type Bounds = (Option<f64>, Option<f64>);

    pub fn serialize<S: Serializer>(bounds: &Bounds, serializer: S) -> Result<S::Ok, S::Error> {
        (bounds.0.map(StoredFloat), bounds.1.map(StoredFloat)).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Bounds, D::Error> {
        let (lower, upper) = <(Option<StoredFloat>, Option<StoredFloat>)>::deserialize(deserializer)?;
        Ok((lower.map(|stored| stored.0), upper.map(|stored| stored.0)))
    }
}
