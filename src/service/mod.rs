// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer containing the store implementation.
//!
//! This module contains the persistent node tree, immutable snapshots of it,
//! and `PersistentStore`, the implementation of the `ConfigStore` trait.

pub mod persistent_store;
pub mod snapshot;
mod tree;

// Re-export commonly used types
pub use persistent_store::{PersistentStore, StoreBuilder};
pub use snapshot::Snapshot;
