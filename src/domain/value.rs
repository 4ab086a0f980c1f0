// SPDX-License-Identifier: MIT OR Apache-2.0

//! Caller-owned configuration values.
//!
//! `Value` is what callers hand to `set`/`extend` and what `get` hands back. It
//! is an ordinary owned tree with no links into the store, so a caller can
//! mutate whatever it receives without affecting anything stored.

use crate::domain::errors::{ConfigError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub use serde_json::Number;

/// A mapping from key to value.
pub type Mapping = BTreeMap<String, Value>;

/// A configuration value: a scalar, an ordered sequence, or a keyed mapping.
///
/// # Examples
///
/// ```
/// use immutmem::domain::Value;
///
/// let value = Value::from(serde_json::json!({ "port": 8080, "hosts": ["a", "b"] }));
/// let map = value.as_mapping().unwrap();
/// assert_eq!(map["port"].as_i64("server:port").unwrap(), 8080);
/// assert_eq!(map["hosts"].as_sequence().unwrap().len(), 2);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// The absence of a value.
    #[default]
    Null,
    /// A boolean.
    Bool(bool),
    /// An integer or finite floating point number.
    Number(Number),
    /// A UTF-8 string.
    String(String),
    /// An ordered list of values.
    Sequence(Vec<Value>),
    /// A keyed collection of values.
    Mapping(Mapping),
}

impl Value {
    /// Returns an empty mapping value.
    pub fn mapping() -> Self {
        Value::Mapping(Mapping::new())
    }

    /// Returns a short name for the kind of value, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Sequence(_) => "sequence",
            Value::Mapping(_) => "mapping",
        }
    }

    /// Returns `true` for `Null`, `Bool`, `Number` and `String`.
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Value::Sequence(_) | Value::Mapping(_))
    }

    /// Returns `true` if the value is `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` if the value is a mapping.
    pub fn is_mapping(&self) -> bool {
        matches!(self, Value::Mapping(_))
    }

    /// Returns `true` if the value is a sequence.
    pub fn is_sequence(&self) -> bool {
        matches!(self, Value::Sequence(_))
    }

    /// Returns the string if this is a `String`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the elements if this is a `Sequence`.
    pub fn as_sequence(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Sequence(seq) => Some(seq),
            _ => None,
        }
    }

    /// Returns the elements mutably if this is a `Sequence`.
    pub fn as_sequence_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::Sequence(seq) => Some(seq),
            _ => None,
        }
    }

    /// Returns the entries if this is a `Mapping`.
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Value::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the entries mutably if this is a `Mapping`.
    pub fn as_mapping_mut(&mut self) -> Option<&mut Mapping> {
        match self {
            Value::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Consumes the value, returning the entries if this is a `Mapping`.
    pub fn into_mapping(self) -> Option<Mapping> {
        match self {
            Value::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Consumes a parsed document, returning its root mapping.
    ///
    /// Fails with `ConfigError::InvalidRoot` for any other kind of root.
    pub fn into_root(self) -> Result<Mapping> {
        match self {
            Value::Mapping(map) => Ok(map),
            other => Err(ConfigError::InvalidRoot {
                found: other.kind(),
            }),
        }
    }

    /// Returns the value as a boolean.
    ///
    /// Strings are accepted too, since configuration often arrives as text:
    /// "true", "yes", "1", "on" and their negatives, case-insensitively.
    ///
    /// # Arguments
    ///
    /// * `key` - The key this value was read from, used in error messages
    pub fn as_bool(&self, key: &str) -> Result<bool> {
        match self {
            Value::Bool(b) => Ok(*b),
            Value::String(s) => match s.to_lowercase().as_str() {
                "true" | "yes" | "1" | "on" => Ok(true),
                "false" | "no" | "0" | "off" => Ok(false),
                _ => s
                    .parse::<bool>()
                    .map_err(|e| self.conversion_error(key, "boolean", e)),
            },
            other => Err(other.kind_mismatch(key, "boolean")),
        }
    }

    /// Returns the value as a signed 64-bit integer.
    ///
    /// Numeric strings are parsed.
    pub fn as_i64(&self, key: &str) -> Result<i64> {
        match self {
            Value::Number(n) => n
                .as_i64()
                .ok_or_else(|| self.kind_mismatch(key, "i64")),
            Value::String(s) => s
                .parse::<i64>()
                .map_err(|e| self.conversion_error(key, "integer", e)),
            other => Err(other.kind_mismatch(key, "i64")),
        }
    }

    /// Returns the value as an unsigned 64-bit integer.
    pub fn as_u64(&self, key: &str) -> Result<u64> {
        match self {
            Value::Number(n) => n
                .as_u64()
                .ok_or_else(|| self.kind_mismatch(key, "u64")),
            Value::String(s) => s
                .parse::<u64>()
                .map_err(|e| self.conversion_error(key, "integer", e)),
            other => Err(other.kind_mismatch(key, "u64")),
        }
    }

    /// Returns the value as a 64-bit float.
    pub fn as_f64(&self, key: &str) -> Result<f64> {
        match self {
            Value::Number(n) => n.as_f64().ok_or_else(|| self.kind_mismatch(key, "f64")),
            Value::String(s) => s
                .parse::<f64>()
                .map_err(|e| self.conversion_error(key, "float", e)),
            other => Err(other.kind_mismatch(key, "f64")),
        }
    }

    /// Deserializes the value into any `DeserializeOwned` type.
    ///
    /// # Examples
    ///
    /// ```
    /// use immutmem::domain::Value;
    /// use serde::Deserialize;
    ///
    /// #[derive(Deserialize)]
    /// struct Server {
    ///     host: String,
    ///     port: u16,
    /// }
    ///
    /// let value = Value::from(serde_json::json!({ "host": "localhost", "port": 8080 }));
    /// let server: Server = value.deserialize_into("server").unwrap();
    /// assert_eq!(server.host, "localhost");
    /// assert_eq!(server.port, 8080);
    /// ```
    pub fn deserialize_into<T: DeserializeOwned>(self, key: &str) -> Result<T> {
        serde_json::from_value(serde_json::Value::from(self)).map_err(|e| {
            ConfigError::TypeConversionError {
                key: key.to_string(),
                target_type: std::any::type_name::<T>().to_string(),
                source: Box::new(e),
            }
        })
    }

    /// Serializes any `Serialize` type into a `Value`.
    ///
    /// Fails with `InvalidValue` when the type does not serialize to a plain
    /// tree, e.g. a map with non-string keys.
    pub fn from_serialize<T: Serialize + ?Sized>(key: &str, value: &T) -> Result<Value> {
        serde_json::to_value(value)
            .map(Value::from)
            .map_err(|e| ConfigError::invalid_value(key, e.to_string()))
    }

    fn kind_mismatch(&self, key: &str, target: &str) -> ConfigError {
        ConfigError::TypeConversionError {
            key: key.to_string(),
            target_type: target.to_string(),
            source: format!("cannot convert {} value", self.kind()).into(),
        }
    }

    fn conversion_error<E>(&self, key: &str, target: &str, err: E) -> ConfigError
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ConfigError::TypeConversionError {
            key: key.to_string(),
            target_type: target.to_string(),
            source: Box::new(err),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", s),
            other => write!(f, "{}", serde_json::Value::from(other.clone())),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n.into())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n.into())
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(n.into())
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Number(n.into())
    }
}

impl TryFrom<f64> for Value {
    type Error = ConfigError;

    fn try_from(n: f64) -> Result<Self> {
        Number::from_f64(n)
            .map(Value::Number)
            .ok_or_else(|| ConfigError::invalid_value("", format!("{} is not a finite number", n)))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl From<Mapping> for Value {
    fn from(map: Mapping) -> Self {
        Value::Mapping(map)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Sequence(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Mapping(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Number(n) => serde_json::Value::Number(n),
            Value::String(s) => serde_json::Value::String(s),
            Value::Sequence(items) => {
                serde_json::Value::Array(items.into_iter().map(Into::into).collect())
            }
            Value::Mapping(map) => {
                serde_json::Value::Object(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

#[cfg(feature = "yaml")]
impl TryFrom<serde_yaml::Value> for Value {
    type Error = ConfigError;

    /// Converts a YAML tree. Mapping keys must be scalars; tagged values are
    /// unwrapped to their inner value.
    fn try_from(value: serde_yaml::Value) -> Result<Self> {
        Ok(match value {
            serde_yaml::Value::Null => Value::Null,
            serde_yaml::Value::Bool(b) => Value::Bool(b),
            serde_yaml::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::from(i)
                } else if let Some(u) = n.as_u64() {
                    Value::from(u)
                } else {
                    let f = n.as_f64().unwrap_or(f64::NAN);
                    Value::try_from(f)?
                }
            }
            serde_yaml::Value::String(s) => Value::String(s),
            serde_yaml::Value::Sequence(items) => Value::Sequence(
                items
                    .into_iter()
                    .map(Value::try_from)
                    .collect::<Result<Vec<_>>>()?,
            ),
            serde_yaml::Value::Mapping(map) => {
                let mut out = Mapping::new();
                for (k, v) in map {
                    let key = match k {
                        serde_yaml::Value::String(s) => s,
                        serde_yaml::Value::Bool(b) => b.to_string(),
                        serde_yaml::Value::Number(n) => n.to_string(),
                        other => {
                            return Err(ConfigError::invalid_value(
                                "",
                                format!("unsupported mapping key: {:?}", other),
                            ))
                        }
                    };
                    out.insert(key, Value::try_from(v)?);
                }
                Value::Mapping(out)
            }
            serde_yaml::Value::Tagged(tagged) => Value::try_from(tagged.value)?,
        })
    }
}
