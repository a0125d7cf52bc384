//! Bridge between [`Value`] and `serde_json`.
//!
//! JSON covers a subset of the value model, so the conversion into `Value`
//! is total while the conversion out is lossy: non-finite numbers, symbols
//! and functions become `null`, big integers become decimal strings, maps
//! become arrays of `[key, value]` pairs and sets become arrays.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map as JsonMap, Number as JsonNumber, Value as Json};

use crate::value::{Object, Value};

/// Largest integer a double represents exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

impl From<Json> for Value {
    fn from(json: Json) -> Self {
        match json {
            Json::Null => Self::Null,
            Json::Bool(b) => Self::Bool(b),
            Json::Number(n) => Self::Number(n.as_f64().unwrap_or(f64::NAN)),
            Json::String(s) => Self::String(s),
            Json::Array(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            Json::Object(map) => Self::Object(
                map.into_iter()
                    .map(|(k, v)| (k, Self::from(v)))
                    .collect::<Object>(),
            ),
        }
    }
}

impl Value {
    /// Lossy JSON rendering.
    #[must_use]
    pub fn to_json(&self) -> Json {
        match self {
            Self::Undefined | Self::Null | Self::Symbol(_) | Self::Function(_) => Json::Null,
            Self::Bool(b) => Json::Bool(*b),
            Self::Number(n) => number_to_json(*n),
            Self::BigInt(i) => Json::String(i.to_string()),
            Self::String(s) => Json::String(s.clone()),
            Self::Array(items) | Self::Set(items) => {
                Json::Array(items.iter().map(Self::to_json).collect())
            }
            Self::TypedArray(arr) => {
                Json::Array(arr.elements().iter().map(|n| number_to_json(*n)).collect())
            }
            Self::Map(pairs) => Json::Array(
                pairs
                    .iter()
                    .map(|(k, v)| Json::Array(vec![k.to_json(), v.to_json()]))
                    .collect(),
            ),
            Self::Object(obj) => Json::Object(
                obj.iter()
                    .map(|(k, v)| (k.to_owned(), v.to_json()))
                    .collect::<JsonMap<_, _>>(),
            ),
        }
    }
}

fn number_to_json(n: f64) -> Json {
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        return Json::Number(JsonNumber::from(n as i64));
    }
    JsonNumber::from_f64(n).map_or(Json::Null, Json::Number)
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Json::deserialize(deserializer).map(Self::from)
    }
}
