// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration parser trait definition.
//!
//! This module defines the `ConfigParser` trait, which provides an interface for
//! turning configuration text (JSON, YAML, ...) into the nested `Mapping` whose
//! top-level entries are handed to the store's `load`.

use crate::domain::{Mapping, Result};
use std::path::Path;

/// A trait for parsing configuration text.
///
/// Parsers produce a full tree, not a flat key/value list. The root of the
/// parsed document must be a mapping; anything else is reported as
/// [`ConfigError::InvalidRoot`](crate::domain::ConfigError::InvalidRoot), and
/// malformed text as [`ConfigError::ParseError`](crate::domain::ConfigError::ParseError).
///
/// # Examples
///
/// ```rust
/// use immutmem::ports::ConfigParser;
/// use immutmem::domain::{Mapping, Result, Value};
///
/// struct KeyEqualsValue;
///
/// impl ConfigParser for KeyEqualsValue {
///     fn parse(&self, content: &str) -> Result<Mapping> {
///         Ok(content
///             .lines()
///             .filter_map(|line| line.split_once('='))
///             .map(|(k, v)| (k.trim().to_string(), Value::from(v.trim())))
///             .collect())
///     }
///
///     fn supported_extensions(&self) -> &[&str] {
///         &["env"]
///     }
/// }
///
/// let parsed = KeyEqualsValue.parse("name = demo").unwrap();
/// assert_eq!(parsed["name"], Value::from("demo"));
/// ```
pub trait ConfigParser: Send + Sync {
    /// Parses configuration content into a root mapping.
    ///
    /// # Arguments
    ///
    /// * `content` - The raw content of the configuration file
    fn parse(&self, content: &str) -> Result<Mapping>;

    /// Returns the file extensions this parser handles, without the dot.
    fn supported_extensions(&self) -> &[&str];

    /// Checks whether this parser handles the extension of `path`.
    ///
    /// The comparison is case-insensitive.
    fn supports(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                self.supported_extensions()
                    .iter()
                    .any(|s| s.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Value;

    struct TestParser;

    impl ConfigParser for TestParser {
        fn parse(&self, content: &str) -> Result<Mapping> {
            let mut map = Mapping::new();
            map.insert("content".to_string(), Value::from(content));
            Ok(map)
        }

        fn supported_extensions(&self) -> &[&str] {
            &["test", "tst"]
        }
    }

    #[test]
    fn test_parser_parse() {
        let result = TestParser.parse("hello").unwrap();
        assert_eq!(result.get("content"), Some(&Value::from("hello")));
    }

    #[test]
    fn test_parser_supports() {
        assert!(TestParser.supports(Path::new("config.test")));
        assert!(TestParser.supports(Path::new("/etc/app/config.TST")));
        assert!(!TestParser.supports(Path::new("config.json")));
        assert!(!TestParser.supports(Path::new("config")));
    }
}
