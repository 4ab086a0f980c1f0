// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the store.
//!
//! This module defines the error types that can occur when loading, reading, or
//! updating the store. All errors use `thiserror` for proper error handling and conversion.

use thiserror::Error;

/// The main error type for store operations.
///
/// Every mutating operation validates its input before touching the store, so
/// receiving any of these errors means the store still holds the version it had
/// before the call. It is marked as `#[non_exhaustive]` to allow for future
/// additions without breaking backwards compatibility.
///
/// # Examples
///
/// ```
/// use immutmem::domain::errors::ConfigError;
///
/// fn read_host() -> Result<String, ConfigError> {
///     Err(ConfigError::KeyNotFound {
///         key: "database:host".to_string(),
///     })
/// }
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The key is not a usable colon-delimited path.
    #[error("Invalid key '{key}': {reason}")]
    InvalidKey {
        /// The rejected key
        key: String,
        /// Why it was rejected
        reason: String,
    },

    /// The value is not acceptable for the requested operation.
    #[error("Invalid value for key '{key}': {message}")]
    InvalidValue {
        /// The key the value was destined for
        key: String,
        /// The error message
        message: String,
    },

    /// Failed to parse configuration text.
    #[error("Failed to parse configuration: {message}")]
    ParseError {
        /// The error message
        message: String,
        /// The underlying parsing error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Parsed input does not have a mapping at its root.
    #[error("Configuration root must be a mapping, found {found}")]
    InvalidRoot {
        /// The kind of value found at the root
        found: &'static str,
    },

    /// The requested key holds no value.
    #[error("Configuration key not found: {key}")]
    KeyNotFound {
        /// The key that was not found
        key: String,
    },

    /// Failed to convert a stored value to the requested type.
    #[error(
        "Failed to convert configuration value for key '{key}' to type {target_type}: {source}"
    )]
    TypeConversionError {
        /// The key being converted
        key: String,
        /// The target type name
        target_type: String,
        /// The underlying conversion error
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An error occurred in a configuration source.
    #[error("Configuration source '{source_name}' error: {message}")]
    SourceError {
        /// The name of the source that encountered the error
        source_name: String,
        /// The error message
        message: String,
        /// The underlying error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An I/O error occurred while reading configuration.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ConfigError {
    /// Creates an `InvalidKey` error.
    pub fn invalid_key(key: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidKey {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Creates an `InvalidValue` error.
    pub fn invalid_value(key: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Creates a `ParseError` wrapping the underlying parser error.
    pub fn parse<E>(format: &str, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ConfigError::ParseError {
            message: format!("Failed to parse {}: {}", format, err),
            source: Some(Box::new(err)),
        }
    }

    /// Returns `true` if the error was caused by the caller's input rather than
    /// by a source or the environment.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ConfigError::InvalidKey { .. }
                | ConfigError::InvalidValue { .. }
                | ConfigError::InvalidRoot { .. }
        )
    }
}

/// A specialized Result type for store operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_key_error() {
        let error = ConfigError::invalid_key("", "key must not be empty");
        assert_eq!(error.to_string(), "Invalid key '': key must not be empty");
        assert!(error.is_validation());
    }

    #[test]
    fn test_invalid_value_error() {
        let error = ConfigError::invalid_value("aaa", "expected a mapping, found string");
        assert_eq!(
            error.to_string(),
            "Invalid value for key 'aaa': expected a mapping, found string"
        );
    }

    #[test]
    fn test_invalid_root_error() {
        let error = ConfigError::InvalidRoot { found: "sequence" };
        assert_eq!(
            error.to_string(),
            "Configuration root must be a mapping, found sequence"
        );
        assert!(error.is_validation());
    }

    #[test]
    fn test_key_not_found_error() {
        let error = ConfigError::KeyNotFound {
            key: "foo:bar".to_string(),
        };
        assert_eq!(error.to_string(), "Configuration key not found: foo:bar");
        assert!(!error.is_validation());
    }

    #[test]
    fn test_parse_error() {
        let source_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error = ConfigError::parse("JSON", source_error);
        assert!(matches!(error, ConfigError::ParseError { .. }));
        assert!(error
            .to_string()
            .starts_with("Failed to parse configuration: Failed to parse JSON"));
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn test_source_error() {
        let error = ConfigError::SourceError {
            source_name: "file".to_string(),
            message: "Failed to read configuration file".to_string(),
            source: None,
        };
        assert_eq!(
            error.to_string(),
            "Configuration source 'file' error: Failed to read configuration file"
        );
    }

    #[test]
    fn test_type_conversion_error() {
        let source_error = "invalid value".parse::<i32>().unwrap_err();
        let error = ConfigError::TypeConversionError {
            key: "server:port".to_string(),
            target_type: "i32".to_string(),
            source: Box::new(source_error),
        };
        assert!(error.to_string().contains("server:port"));
        assert!(error.to_string().contains("i32"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = ConfigError::from(io_error);
        assert!(matches!(error, ConfigError::IoError(_)));
    }
}
