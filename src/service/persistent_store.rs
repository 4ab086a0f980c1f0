// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistent store implementation.
//!
//! This module provides `PersistentStore`, the default implementation of the
//! `ConfigStore` trait, together with a builder that loads a list of sources
//! at startup.

use crate::domain::{ConfigError, ConfigPath, ConfigStore, Mapping, Result, Value};
use crate::ports::{ConfigParser, ConfigSource};
use crate::service::snapshot::Snapshot;
use crate::service::tree::{self, Branch, Node};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::sync::{PoisonError, RwLock, RwLockReadGuard};

/// Logs a rejected operation and hands the error back.
fn rejected(operation: &str, key: &str, err: ConfigError) -> ConfigError {
    tracing::warn!("Rejected {} of '{}': {}", operation, key, err);
    err
}

/// Default implementation of the store.
///
/// The store holds its current [`Snapshot`] behind a lock. Readers clone the
/// snapshot, which only bumps a reference count, and materialize values
/// outside the lock. Writers derive the next version from the current one
/// while holding the write lock, so concurrent writes are applied one at a
/// time and readers always observe a complete version.
///
/// # Examples
///
/// ```rust
/// use immutmem::domain::{ConfigStore, Value};
/// use immutmem::service::PersistentStore;
/// use serde_json::json;
///
/// # fn main() -> immutmem::domain::Result<()> {
/// let store = PersistentStore::new();
/// store.load_value(Value::from(json!({ "aaa": { "bbb": "ccc" } })))?;
///
/// store.set("aaa:c:d", Value::from("vegas"))?;
/// assert_eq!(
///     store.get("aaa")?,
///     Some(Value::from(json!({ "bbb": "ccc", "c": { "d": "vegas" } })))
/// );
/// # Ok(())
/// # }
/// ```
pub struct PersistentStore {
    current: RwLock<Snapshot>,
}

impl PersistentStore {
    /// Creates a new empty store at version 0.
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Snapshot::empty()),
        }
    }

    /// Creates a new store builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use immutmem::domain::ConfigStore;
    /// use immutmem::service::PersistentStore;
    ///
    /// # fn main() -> immutmem::domain::Result<()> {
    /// let store = PersistentStore::builder()
    ///     .with_value(serde_json::json!({ "log": { "level": "info" } }).into())?
    ///     .build()?;
    /// assert!(store.has("log:level"));
    /// # Ok(())
    /// # }
    /// ```
    pub fn builder() -> StoreBuilder {
        StoreBuilder::new()
    }

    // Versions are immutable and swapped whole, so a panic while the lock
    // was held cannot have left a partial version behind.
    fn read_lock(&self) -> RwLockReadGuard<'_, Snapshot> {
        self.current.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replaces the current version with one derived from it.
    fn commit<F>(&self, update: F) -> u64
    where
        F: FnOnce(&Snapshot) -> Branch,
    {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let previous: &Snapshot = &current;
        let next = previous.succeed(update(previous));
        *current = next;
        current.version()
    }

    /// Returns the current version as a snapshot.
    pub fn snapshot(&self) -> Snapshot {
        self.read_lock().clone()
    }

    /// Returns the current version number.
    pub fn version(&self) -> u64 {
        self.read_lock().version()
    }

    /// Returns the current top-level keys in sorted order.
    pub fn keys(&self) -> Vec<String> {
        self.read_lock().keys()
    }

    /// Returns the number of top-level entries.
    pub fn len(&self) -> usize {
        self.read_lock().len()
    }

    /// Returns `true` if the store has no entries.
    pub fn is_empty(&self) -> bool {
        self.read_lock().is_empty()
    }

    /// Materializes the whole store as a mapping value.
    pub fn to_value(&self) -> Value {
        self.snapshot().to_value()
    }

    /// Loads an already parsed root mapping.
    ///
    /// Each entry replaces the store's entry with the same top-level key;
    /// other top-level keys are left alone. Nothing is merged below the top
    /// level.
    pub fn load_mapping(&self, entries: Mapping) {
        self.load_entries("mapping", entries);
    }

    /// Loads a value, which must be a mapping.
    pub fn load_value(&self, value: Value) -> Result<()> {
        let entries = value
            .into_root()
            .map_err(|e| rejected("load", "<root>", e))?;
        self.load_entries("value", entries);
        Ok(())
    }

    /// Parses `content` with `parser` and loads the result.
    ///
    /// Fails with `ParseError` or `InvalidRoot` without touching the store.
    pub fn load_str(&self, content: &str, parser: &dyn ConfigParser) -> Result<()> {
        let entries = parser
            .parse(content)
            .map_err(|e| rejected("load", "<text>", e))?;
        self.load_entries("text", entries);
        Ok(())
    }

    /// Reads, parses and loads a configuration file synchronously.
    ///
    /// The parser is chosen from the file's extension.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let source = crate::adapters::FileSource::from_file(path)?;
        self.load(&source)
    }

    /// Reads, parses and loads a configuration file asynchronously.
    ///
    /// The store is only touched after the whole file has been read and
    /// parsed; a failed read or parse leaves it unchanged.
    #[cfg(feature = "async")]
    pub async fn load_file_async<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let source = crate::adapters::FileSource::from_file(path)?;
        let entries = source.read_async().await.map_err(|e| {
            rejected("load", &source.path().display().to_string(), e)
        })?;
        self.load_entries(source.name(), entries);
        Ok(())
    }

    fn load_entries(&self, origin: &str, entries: Mapping) {
        let count = entries.len();
        let version = self.commit(|current| tree::replace_top_level(current.root(), entries));
        tracing::debug!(
            "Loaded {} top-level keys from '{}' (version {})",
            count,
            origin,
            version
        );
    }

    /// Serializes `value` and stores it at `key`.
    ///
    /// Fails with `InvalidValue` if `value` does not serialize to a plain tree.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use immutmem::service::PersistentStore;
    /// use serde::{Deserialize, Serialize};
    ///
    /// #[derive(Serialize, Deserialize, Debug, PartialEq)]
    /// struct Retry {
    ///     attempts: u32,
    ///     backoff_ms: u64,
    /// }
    ///
    /// # fn main() -> immutmem::domain::Result<()> {
    /// let store = PersistentStore::new();
    /// store.set_serialized("http:retry", &Retry { attempts: 3, backoff_ms: 250 })?;
    ///
    /// let retry: Option<Retry> = store.get_as("http:retry")?;
    /// assert_eq!(retry, Some(Retry { attempts: 3, backoff_ms: 250 }));
    /// # Ok(())
    /// # }
    /// ```
    pub fn set_serialized<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let value = Value::from_serialize(key, value).map_err(|e| rejected("set", key, e))?;
        self.set(key, value)
    }

    /// Retrieves the value at `key` deserialized into `T`.
    ///
    /// Fails with `TypeConversionError` if the stored value does not fit `T`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        self.get(key)?
            .map(|value| value.deserialize_into(key))
            .transpose()
    }

    fn parse_key(operation: &str, key: &str) -> Result<ConfigPath> {
        ConfigPath::parse(key).map_err(|e| rejected(operation, key, e))
    }
}

impl Default for PersistentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PersistentStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let current = self.read_lock();
        f.debug_struct("PersistentStore")
            .field("version", &current.version())
            .field("keys", &current.keys())
            .finish()
    }
}

impl ConfigStore for PersistentStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let path = Self::parse_key("get", key)?;
        Ok(self.snapshot().get_path(&path))
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        let path = Self::parse_key("set", key)?;
        let leaf = Node::from(value);
        let version = self.commit(|current| tree::assoc_in(current.root(), path.segments(), leaf));
        tracing::trace!("Set '{}' (version {})", path, version);
        Ok(())
    }

    fn extend(&self, key: &str, value: Value) -> Result<()> {
        let path = Self::parse_key("extend", key)?;
        if !value.is_mapping() {
            return Err(rejected(
                "extend",
                key,
                ConfigError::invalid_value(
                    key,
                    format!("expected a mapping, found {}", value.kind()),
                ),
            ));
        }

        let patch = Node::from(value);
        let version = self.commit(|current| {
            let merged = match current.node(&path) {
                Some(existing) => tree::merge_deep(existing, &patch),
                None => patch,
            };
            tree::assoc_in(current.root(), path.segments(), merged)
        });
        tracing::trace!("Extended '{}' (version {})", path, version);
        Ok(())
    }

    fn load(&self, source: &dyn ConfigSource) -> Result<()> {
        let entries = source
            .read()
            .map_err(|e| rejected("load", source.name(), e))?;
        self.load_entries(source.name(), entries);
        Ok(())
    }
}

/// Builder for constructing a `PersistentStore` from a list of sources.
///
/// Sources are loaded in the order they were added, so a later source's
/// top-level entries replace an earlier one's.
///
/// # Examples
///
/// ```rust
/// use immutmem::adapters::MemorySource;
/// use immutmem::domain::{ConfigStore, Value};
/// use immutmem::service::StoreBuilder;
///
/// # fn main() -> immutmem::domain::Result<()> {
/// let store = StoreBuilder::new()
///     .with_source(Box::new(MemorySource::default().with_entry("mode", "dev")))
///     .with_source(Box::new(MemorySource::default().with_entry("mode", "prod")))
///     .build()?;
/// assert_eq!(store.get("mode")?, Some(Value::from("prod")));
/// # Ok(())
/// # }
/// ```
pub struct StoreBuilder {
    sources: Vec<Box<dyn ConfigSource>>,
}

impl StoreBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Adds a configuration source to the builder.
    pub fn with_source(mut self, source: Box<dyn ConfigSource>) -> Self {
        self.sources.push(source);
        self
    }

    /// Adds an already parsed root mapping.
    pub fn with_mapping(self, entries: Mapping) -> Self {
        self.with_source(Box::new(crate::adapters::MemorySource::new(entries)))
    }

    /// Adds a value, which must be a mapping.
    pub fn with_value(self, value: Value) -> Result<Self> {
        let source = crate::adapters::MemorySource::from_value(value)?;
        Ok(self.with_source(Box::new(source)))
    }

    /// Adds a configuration file, with the parser chosen from its extension.
    ///
    /// The file is read when [`build`](StoreBuilder::build) is called.
    pub fn with_file(self, path: impl AsRef<Path>) -> Result<Self> {
        let source = crate::adapters::FileSource::from_file(path)?;
        Ok(self.with_source(Box::new(source)))
    }

    /// Builds the store, loading every source in order.
    ///
    /// Fails on the first source that cannot be read.
    pub fn build(self) -> Result<PersistentStore> {
        let store = PersistentStore::new();

        for source in &self.sources {
            store.load(source.as_ref())?;
        }

        Ok(store)
    }
}

impl Default for StoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}
