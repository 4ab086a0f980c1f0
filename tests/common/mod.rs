// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared fixtures for integration tests.

use immutmem::domain::{ConfigError, Mapping, Result, Value};
use immutmem::ports::ConfigSource;
use immutmem::service::PersistentStore;
use serde_json::json;

/// The configuration most scenarios start from.
#[allow(dead_code)]
pub fn fixture_value() -> Value {
    Value::from(json!({
        "foo": { "bar": "baz" },
        "aaa": { "bbb": "ccc" },
        "ddd": { "eee": { "fff": { "ggg": "test" } } },
    }))
}

/// Creates a store loaded with [`fixture_value`].
#[allow(dead_code)]
pub fn fixture_store() -> PersistentStore {
    let store = PersistentStore::new();
    store.load_value(fixture_value()).unwrap();
    store
}

/// Shorthand for building a `Value` from JSON.
#[allow(dead_code)]
pub fn v(value: serde_json::Value) -> Value {
    Value::from(value)
}

/// Creates a temporary file with the given suffix and content.
///
/// Returns a NamedTempFile that will be automatically deleted when dropped.
#[allow(dead_code)]
pub fn create_temp_config(suffix: &str, content: &str) -> tempfile::NamedTempFile {
    use std::io::Write;
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    write!(file, "{}", content).unwrap();
    file.flush().unwrap();
    file
}

/// A source that always fails to read.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct BrokenSource;

impl ConfigSource for BrokenSource {
    fn name(&self) -> &str {
        "broken"
    }

    fn read(&self) -> Result<Mapping> {
        Err(ConfigError::SourceError {
            source_name: self.name().to_string(),
            message: "Mock read failure".to_string(),
            source: None,
        })
    }
}
