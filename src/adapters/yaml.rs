// SPDX-License-Identifier: MIT OR Apache-2.0

//! YAML parser adapter.
//!
//! Unlike a flattening parser, this keeps the document's nesting intact so
//! that `database:host` in the store addresses `host` inside `database`.

use crate::domain::{ConfigError, Mapping, Result, Value};
use crate::ports::ConfigParser;

/// YAML parser implementation.
///
/// Scalar mapping keys (strings, numbers, booleans) become string keys; other
/// key kinds are rejected with `ConfigError::InvalidValue`. Tagged values are
/// stored as their untagged content.
///
/// # Examples
///
/// ```rust
/// use immutmem::adapters::YamlParser;
/// use immutmem::domain::Value;
/// use immutmem::ports::ConfigParser;
///
/// let parser = YamlParser::new();
/// let root = parser.parse("database:\n  host: localhost\n  port: 5432").unwrap();
/// let database = root["database"].as_mapping().unwrap();
/// assert_eq!(database["port"], Value::from(5432));
/// ```
#[derive(Debug, Clone, Default)]
pub struct YamlParser;

impl YamlParser {
    /// Creates a new YAML parser.
    pub fn new() -> Self {
        YamlParser
    }
}

impl ConfigParser for YamlParser {
    fn parse(&self, content: &str) -> Result<Mapping> {
        let value: serde_yaml::Value =
            serde_yaml::from_str(content).map_err(|e| ConfigError::parse("YAML", e))?;
        Value::try_from(value)?.into_root()
    }

    fn supported_extensions(&self) -> &[&str] {
        &["yaml", "yml"]
    }
}
