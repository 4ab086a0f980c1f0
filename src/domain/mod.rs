// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing core types.
//!
//! This module contains the core domain types for the store: validated paths,
//! caller-owned values, errors, and the `ConfigStore` trait. It is independent
//! of any file format or storage strategy.

pub mod config_path;
pub mod errors;
pub mod store;
pub mod value;

// Re-export commonly used types
pub use config_path::{ConfigPath, PATH_DELIMITER};
pub use errors::{ConfigError, Result};
pub use store::ConfigStore;
pub use value::{Mapping, Number, Value};
