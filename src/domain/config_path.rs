// SPDX-License-Identifier: MIT OR Apache-2.0

//! Validated colon-delimited paths into the store.
//!
//! This module provides the `ConfigPath` type. A path is parsed once from a key
//! string such as `"database:primary:host"` and can then be walked segment by
//! segment. Parsing is where every key is validated: an empty key, or a key with
//! an empty segment (`"a::b"`, `":a"`, `"a:"`), is rejected with
//! [`ConfigError::InvalidKey`].

use crate::domain::errors::{ConfigError, Result};
use std::fmt;
use std::str::FromStr;

/// The character separating path segments in a key.
pub const PATH_DELIMITER: char = ':';

/// A non-empty sequence of non-empty key segments.
///
/// # Examples
///
/// ```
/// use immutmem::domain::ConfigPath;
///
/// let path = ConfigPath::parse("database:primary:host").unwrap();
/// assert_eq!(path.segments(), ["database", "primary", "host"]);
/// assert_eq!(path.as_str(), "database:primary:host");
///
/// assert!(ConfigPath::parse("").is_err());
/// assert!(ConfigPath::parse("database::host").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ConfigPath {
    raw: String,
    segments: Vec<String>,
}

impl ConfigPath {
    /// Parses and validates a colon-delimited key.
    pub fn parse(key: &str) -> Result<Self> {
        if key.is_empty() {
            return Err(ConfigError::invalid_key(key, "key must not be empty"));
        }

        let segments: Vec<String> = key.split(PATH_DELIMITER).map(str::to_owned).collect();
        if let Some(position) = segments.iter().position(String::is_empty) {
            return Err(ConfigError::invalid_key(
                key,
                format!("segment {} is empty", position),
            ));
        }

        Ok(Self {
            raw: key.to_string(),
            segments,
        })
    }

    /// Builds a path from already separated segments.
    ///
    /// Each segment must be non-empty and must not itself contain the delimiter.
    pub fn from_segments<I, S>(segments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        let raw = segments.join(&PATH_DELIMITER.to_string());
        if segments.iter().any(|s| s.contains(PATH_DELIMITER)) {
            return Err(ConfigError::invalid_key(
                raw,
                format!("segments must not contain '{}'", PATH_DELIMITER),
            ));
        }
        Self::parse(&raw)
    }

    /// Returns the original key string.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the path segments in order, from the root down.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns the number of segments. Always at least one.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Returns the path one level up, or `None` for a top-level path.
    pub fn parent(&self) -> Option<ConfigPath> {
        let (_, init) = self.segments.split_last()?;
        if init.is_empty() {
            return None;
        }
        Some(Self {
            raw: init.join(&PATH_DELIMITER.to_string()),
            segments: init.to_vec(),
        })
    }

    /// Returns a new path with `segment` appended.
    pub fn child(&self, segment: &str) -> Result<ConfigPath> {
        Self::from_segments(self.segments.iter().map(String::as_str).chain([segment]))
    }
}

impl FromStr for ConfigPath {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for ConfigPath {
    type Error = ConfigError;

    fn try_from(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ConfigPath {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl AsRef<str> for ConfigPath {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for ConfigPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}
