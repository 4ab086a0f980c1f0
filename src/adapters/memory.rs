// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory configuration source adapter.
//!
//! This adapter holds an already-parsed root mapping. It is the way to `load`
//! configuration built in code, and is useful in tests.

use crate::domain::{Mapping, Result, Value};
use crate::ports::ConfigSource;
use serde::Serialize;

/// Configuration source backed by a mapping held in memory.
///
/// # Examples
///
/// ```rust
/// use immutmem::adapters::MemorySource;
/// use immutmem::domain::{ConfigStore, Value};
/// use immutmem::service::PersistentStore;
///
/// # fn main() -> immutmem::domain::Result<()> {
/// let source = MemorySource::from_value(Value::from(serde_json::json!({
///     "foo": { "bar": "baz" }
/// })))?;
///
/// let store = PersistentStore::new();
/// store.load(&source)?;
/// assert_eq!(store.get("foo:bar")?, Some(Value::from("baz")));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    entries: Mapping,
}

impl MemorySource {
    /// Creates a source from a root mapping.
    pub fn new(entries: Mapping) -> Self {
        Self {
            name: "memory".to_string(),
            entries,
        }
    }

    /// Creates a source from a value, which must be a mapping.
    pub fn from_value(value: Value) -> Result<Self> {
        Ok(Self::new(value.into_root()?))
    }

    /// Creates a source by serializing `value`, which must serialize to a mapping.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        Self::from_value(Value::from_serialize("", value)?)
    }

    /// Sets the name reported in logs and errors.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Adds or replaces a top-level entry.
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }
}

impl Default for MemorySource {
    fn default() -> Self {
        Self::new(Mapping::new())
    }
}

impl From<Mapping> for MemorySource {
    fn from(entries: Mapping) -> Self {
        Self::new(entries)
    }
}

impl ConfigSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn read(&self) -> Result<Mapping> {
        Ok(self.entries.clone())
    }
}
