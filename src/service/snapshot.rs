// SPDX-License-Identifier: MIT OR Apache-2.0

//! Immutable store versions.

use crate::domain::{ConfigPath, Result, Value};
use crate::service::tree::{self, Branch, Node};

/// One version of a store's contents.
///
/// A snapshot never changes after it is created; later writes to the store
/// produce new snapshots that share unchanged subtrees with this one. Cloning
/// is cheap, so a snapshot can be handed to a worker to read a consistent view
/// for as long as it needs.
///
/// # Examples
///
/// ```rust
/// use immutmem::domain::{ConfigStore, Value};
/// use immutmem::service::PersistentStore;
///
/// # fn main() -> immutmem::domain::Result<()> {
/// let store = PersistentStore::new();
/// store.set("mode", Value::from("blue"))?;
/// let before = store.snapshot();
///
/// store.set("mode", Value::from("green"))?;
///
/// assert_eq!(before.get("mode")?, Some(Value::from("blue")));
/// assert_eq!(store.get("mode")?, Some(Value::from("green")));
/// assert_eq!(store.version(), before.version() + 1);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Snapshot {
    root: Branch,
    version: u64,
}

impl Snapshot {
    pub(crate) fn empty() -> Self {
        Self {
            root: tree::empty_branch(),
            version: 0,
        }
    }

    pub(crate) fn root(&self) -> &Branch {
        &self.root
    }

    /// Builds the version that follows this one.
    pub(crate) fn succeed(&self, root: Branch) -> Self {
        Self {
            root,
            version: self.version + 1,
        }
    }

    pub(crate) fn node(&self, path: &ConfigPath) -> Option<&Node> {
        tree::lookup(&self.root, path.segments())
    }

    /// Returns the version number. An empty store is version 0 and every
    /// successful write adds one.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Retrieves an independent copy of the value at `key`.
    ///
    /// Fails only when `key` is not a valid path; a missing value is `Ok(None)`.
    pub fn get(&self, key: &str) -> Result<Option<Value>> {
        let path = ConfigPath::parse(key)?;
        Ok(self.get_path(&path))
    }

    /// Retrieves an independent copy of the value at an already parsed path.
    pub fn get_path(&self, path: &ConfigPath) -> Option<Value> {
        self.node(path).map(Node::to_value)
    }

    /// Checks whether a value exists at `key`.
    pub fn contains(&self, key: &str) -> bool {
        ConfigPath::parse(key)
            .map(|path| self.node(&path).is_some())
            .unwrap_or(false)
    }

    /// Returns the top-level keys in sorted order.
    pub fn keys(&self) -> Vec<String> {
        self.root.keys().cloned().collect()
    }

    /// Returns the number of top-level entries.
    pub fn len(&self) -> usize {
        self.root.len()
    }

    /// Returns `true` if there are no top-level entries.
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Materializes the whole version as a mapping value.
    pub fn to_value(&self) -> Value {
        Value::Mapping(tree::branch_to_mapping(&self.root))
    }
}
