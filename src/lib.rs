// SPDX-License-Identifier: MIT OR Apache-2.0

//! An in-process, path-addressable configuration store.
//!
//! This crate keeps hierarchical configuration in a persistent tree. Values are
//! addressed with colon-delimited paths such as `"database:primary:host"`.
//! Every read hands back an independent copy, and every write produces a new
//! version of the tree that shares its unchanged parts with the previous one,
//! so nothing a caller holds can be changed by the store and nothing the store
//! holds can be changed by a caller.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: Core types (`ConfigPath`, `Value`, errors) and the `ConfigStore` trait
//! - **Ports**: Trait definitions for collaborators (`ConfigParser`, `ConfigSource`)
//! - **Adapters**: Implementations for specific formats and sources (JSON, YAML, files, memory)
//! - **Service**: `PersistentStore`, the persistent engine behind the trait
//!
//! # Operations
//!
//! - **load**: replace top-level entries from a parsed mapping, text, or file
//! - **get**: read an independent copy of the value at a path
//! - **set**: store a value at a path, creating intermediate mappings
//! - **extend**: deep-merge a mapping into the value at a path
//!
//! # Feature Flags
//!
//! - `json`: Enable JSON parsing (default)
//! - `yaml`: Enable YAML parsing (default)
//! - `async`: Enable asynchronous file loading on tokio
//! - `full`: Enable all features
//!
//! # Quick Start
//!
//! ```rust
//! use immutmem::prelude::*;
//! use serde_json::json;
//!
//! # fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//! let store = PersistentStore::new();
//! store.load_value(Value::from(json!({
//!     "ddd": { "eee": { "fff": { "ggg": "test" } } }
//! })))?;
//!
//! store.extend("ddd:eee", Value::from(json!({ "quux": false, "fff": { "baaz": "vegas" } })))?;
//!
//! assert_eq!(
//!     store.get("ddd")?,
//!     Some(Value::from(json!({
//!         "eee": { "quux": false, "fff": { "baaz": "vegas", "ggg": "test" } }
//!     })))
//! );
//!
//! // Values handed out are the caller's own.
//! let mut eee = store.get("ddd:eee")?.unwrap_or_default();
//! if let Some(map) = eee.as_mapping_mut() {
//!     map.clear();
//! }
//! assert!(store.has("ddd:eee:fff:ggg"));
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::domain::{ConfigError, ConfigPath, ConfigStore, Mapping, Result, Value};
    pub use crate::ports::{ConfigParser, ConfigSource};
    pub use crate::service::{PersistentStore, Snapshot, StoreBuilder};

    pub use crate::adapters::{FileSource, MemorySource};
    // Re-export adapters based on feature flags
    #[cfg(feature = "json")]
    pub use crate::adapters::JsonParser;
    #[cfg(feature = "yaml")]
    pub use crate::adapters::YamlParser;
}
