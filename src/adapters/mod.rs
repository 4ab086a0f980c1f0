// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing parser and source implementations.
//!
//! This module contains concrete implementations of the traits defined in the
//! ports layer: parsers for the supported text formats, and sources that hand
//! a root mapping to the store's `load`.

pub mod file;
#[cfg(feature = "json")]
pub mod json;
pub mod memory;
#[cfg(feature = "yaml")]
pub mod yaml;

pub use file::FileSource;
#[cfg(feature = "json")]
pub use json::JsonParser;
pub use memory::MemorySource;
#[cfg(feature = "yaml")]
pub use yaml::YamlParser;
