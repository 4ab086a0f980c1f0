// SPDX-License-Identifier: MIT OR Apache-2.0

//! Store trait definition.
//!
//! This module defines the `ConfigStore` trait, the public operation surface of
//! a path-addressable configuration store: `load`, `get`, `set` and `extend`.
//! Every method takes `&self` so a single store can be shared between threads
//! behind an `Arc`.

use crate::domain::{ConfigError, Result, Value};
use crate::ports::ConfigSource;

/// The main store trait.
///
/// Keys are colon-delimited paths (`"database:primary:host"`). Values returned
/// by [`get`](ConfigStore::get) are owned by the caller outright; nothing a
/// caller does to them is visible through the store.
///
/// # Examples
///
/// ```rust
/// use immutmem::domain::{ConfigStore, Value};
/// use immutmem::service::PersistentStore;
///
/// # fn main() -> immutmem::domain::Result<()> {
/// let store = PersistentStore::new();
/// store.set("server:port", Value::from(8080))?;
///
/// assert_eq!(store.get("server:port")?, Some(Value::from(8080)));
/// assert!(store.has("server"));
/// assert_eq!(store.get("server:host")?, None);
/// # Ok(())
/// # }
/// ```
pub trait ConfigStore: Send + Sync {
    /// Retrieves an independent copy of the value at `key`.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(value))` - The value stored at `key`
    /// * `Ok(None)` - Nothing is stored at `key`, or the path runs through a non-mapping
    /// * `Err(ConfigError::InvalidKey)` - `key` is not a valid path
    fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Stores `value` at `key`, creating intermediate mappings as needed.
    ///
    /// Any non-mapping value sitting on an intermediate segment is replaced by a
    /// mapping. On error the store is left unchanged.
    fn set(&self, key: &str, value: Value) -> Result<()>;

    /// Deep-merges the mapping `value` into the value at `key`.
    ///
    /// Mappings present on both sides merge recursively; anything else in
    /// `value` replaces what was there. A missing target is treated as an empty
    /// mapping. Fails with `ConfigError::InvalidValue` if `value` is not a
    /// mapping, leaving the store unchanged.
    fn extend(&self, key: &str, value: Value) -> Result<()>;

    /// Loads every top-level entry of `source`, replacing existing entries with
    /// the same key.
    ///
    /// The source is read in full before the store is touched, so a source
    /// error leaves the store unchanged.
    fn load(&self, source: &dyn ConfigSource) -> Result<()>;

    /// Checks whether a value exists at `key`. Invalid keys are never present.
    fn has(&self, key: &str) -> bool {
        matches!(self.get(key), Ok(Some(_)))
    }

    /// Retrieves the value at `key`, or `default` if it is missing or `key` is invalid.
    fn get_or_default(&self, key: &str, default: Value) -> Value {
        self.lookup(key).unwrap_or(default)
    }

    /// Retrieves the value at `key`, reporting an invalid key as absent.
    ///
    /// The invalid key is logged at `warn` level.
    fn lookup(&self, key: &str) -> Option<Value> {
        match self.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Ignoring lookup of '{}': {}", key, e);
                None
            }
        }
    }

    /// Retrieves the value at `key`, treating absence as an error.
    fn require(&self, key: &str) -> Result<Value> {
        self.get(key)?.ok_or_else(|| ConfigError::KeyNotFound {
            key: key.to_string(),
        })
    }
}
