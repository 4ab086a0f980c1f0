// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON parser adapter.

use crate::domain::{ConfigError, Mapping, Result, Value};
use crate::ports::ConfigParser;

/// JSON parser implementation.
///
/// # Examples
///
/// ```rust
/// use immutmem::adapters::JsonParser;
/// use immutmem::domain::Value;
/// use immutmem::ports::ConfigParser;
///
/// let parser = JsonParser::new();
/// let root = parser.parse(r#"{"database": {"host": "localhost", "port": 5432}}"#).unwrap();
/// let database = root["database"].as_mapping().unwrap();
/// assert_eq!(database["host"], Value::from("localhost"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct JsonParser;

impl JsonParser {
    /// Creates a new JSON parser.
    pub fn new() -> Self {
        JsonParser
    }
}

impl ConfigParser for JsonParser {
    fn parse(&self, content: &str) -> Result<Mapping> {
        let value: serde_json::Value =
            serde_json::from_str(content).map_err(|e| ConfigError::parse("JSON", e))?;
        Value::from(value).into_root()
    }

    fn supported_extensions(&self) -> &[&str] {
        &["json"]
    }
}
