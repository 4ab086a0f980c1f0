// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration source trait definition.
//!
//! This module defines the `ConfigSource` trait, the port through which the
//! store receives configuration to `load`. A source could be a file on disk, an
//! in-memory mapping, or anything else that can produce a root mapping.

use crate::domain::{Mapping, Result};

/// A trait for configuration sources.
///
/// A source yields a complete root mapping on each [`read`](ConfigSource::read).
/// The store replaces its top-level entries with the entries of that mapping;
/// it never looks inside the source beyond this call.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow for use in multi-threaded contexts.
///
/// # Examples
///
/// ```rust
/// use immutmem::ports::ConfigSource;
/// use immutmem::domain::{Mapping, Result, Value};
///
/// struct Defaults;
///
/// impl ConfigSource for Defaults {
///     fn name(&self) -> &str {
///         "defaults"
///     }
///
///     fn read(&self) -> Result<Mapping> {
///         let mut map = Mapping::new();
///         map.insert("log_level".to_string(), Value::from("info"));
///         Ok(map)
///     }
/// }
///
/// assert_eq!(Defaults.read().unwrap().len(), 1);
/// ```
pub trait ConfigSource: Send + Sync {
    /// Returns the name of this configuration source.
    ///
    /// This name is used for logging and error messages. It should be a short,
    /// descriptive identifier like "file" or "memory".
    fn name(&self) -> &str;

    /// Reads the source into a root mapping.
    ///
    /// # Returns
    ///
    /// * `Ok(Mapping)` - The top-level entries to load
    /// * `Err(ConfigError)` - The source could not be read or parsed
    fn read(&self) -> Result<Mapping>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConfigError, Value};

    struct TestSource {
        fail: bool,
    }

    impl ConfigSource for TestSource {
        fn name(&self) -> &str {
            "test"
        }

        fn read(&self) -> Result<Mapping> {
            if self.fail {
                return Err(ConfigError::SourceError {
                    source_name: self.name().to_string(),
                    message: "unavailable".to_string(),
                    source: None,
                });
            }
            let mut map = Mapping::new();
            map.insert("key".to_string(), Value::from("value"));
            Ok(map)
        }
    }

    #[test]
    fn test_source_name() {
        assert_eq!(TestSource { fail: false }.name(), "test");
    }

    #[test]
    fn test_source_read() {
        let map = TestSource { fail: false }.read().unwrap();
        assert_eq!(map.get("key"), Some(&Value::from("value")));
    }

    #[test]
    fn test_source_read_failure() {
        let err = TestSource { fail: true }.read().unwrap_err();
        assert!(matches!(err, ConfigError::SourceError { .. }));
    }

    #[test]
    fn test_source_as_trait_object() {
        let source: Box<dyn ConfigSource> = Box::new(TestSource { fail: false });
        assert_eq!(source.name(), "test");
        assert!(source.read().is_ok());
    }
}
