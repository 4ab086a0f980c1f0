// SPDX-License-Identifier: MIT OR Apache-2.0

//! File configuration source adapter.
//!
//! This module provides a source that reads a configuration file and parses it
//! with a parser chosen from the file's extension. Reading is synchronous by
//! default; with the `async` feature the file can also be read on a tokio
//! runtime.

use crate::domain::{ConfigError, Mapping, Result};
use crate::ports::{ConfigParser, ConfigSource};
use directories::ProjectDirs;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Maximum allowed size for configuration files (10MB)
const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// File names probed by [`FileSource::from_default_location`], in order.
const DEFAULT_FILE_NAMES: &[&str] = &["config.json", "config.yaml", "config.yml"];

const SOURCE_NAME: &str = "file";

/// Returns every parser compiled into this build.
fn builtin_parsers() -> Vec<Arc<dyn ConfigParser>> {
    let mut parsers: Vec<Arc<dyn ConfigParser>> = Vec::new();
    #[cfg(feature = "json")]
    parsers.push(Arc::new(crate::adapters::JsonParser::new()));
    #[cfg(feature = "yaml")]
    parsers.push(Arc::new(crate::adapters::YamlParser::new()));
    parsers
}

fn display_name(path: &Path) -> &str {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<unknown>")
}

fn source_error(message: String, err: Option<std::io::Error>) -> ConfigError {
    ConfigError::SourceError {
        source_name: SOURCE_NAME.to_string(),
        message,
        source: err.map(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>),
    }
}

fn check_size(path: &Path, len: u64) -> Result<()> {
    if len > MAX_FILE_SIZE {
        return Err(source_error(
            format!(
                "Configuration file too large: {} ({} bytes, max {} bytes)",
                display_name(path),
                len,
                MAX_FILE_SIZE
            ),
            None,
        ));
    }
    Ok(())
}

/// Configuration source adapter for files.
///
/// Nothing is read until [`read`](ConfigSource::read) is called, so a
/// `FileSource` can be created before the file exists.
///
/// # Examples
///
/// ```rust,no_run
/// use immutmem::adapters::FileSource;
/// use immutmem::domain::ConfigStore;
/// use immutmem::service::PersistentStore;
///
/// # fn main() -> immutmem::domain::Result<()> {
/// let store = PersistentStore::new();
/// store.load(&FileSource::from_file("/etc/myapp/config.json")?)?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct FileSource {
    /// Path to the configuration file
    path: PathBuf,
    /// Parser for the file's format
    parser: Arc<dyn ConfigParser>,
}

impl FileSource {
    /// Creates a source for `path`, choosing the parser from its extension.
    ///
    /// Fails with `ConfigError::SourceError` if no compiled-in parser handles
    /// the extension.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let parser = builtin_parsers()
            .into_iter()
            .find(|p| p.supports(&path))
            .ok_or_else(|| {
                source_error(
                    format!("No parser for configuration file: {}", display_name(&path)),
                    None,
                )
            })?;

        Ok(Self { path, parser })
    }

    /// Creates a source for `path` that always uses `parser`.
    pub fn with_parser<P: AsRef<Path>>(path: P, parser: Arc<dyn ConfigParser>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            parser,
        }
    }

    /// Creates a source for the first existing `config.json`, `config.yaml`
    /// or `config.yml` in the OS-appropriate configuration directory.
    ///
    /// # Arguments
    ///
    /// * `app_name` - The application name (e.g., "myapp")
    /// * `qualifier` - The organization/qualifier (e.g., "com.example")
    pub fn from_default_location(app_name: &str, qualifier: &str) -> Result<Self> {
        let proj_dirs = ProjectDirs::from(qualifier, "", app_name).ok_or_else(|| {
            source_error("Failed to determine project directories".to_string(), None)
        })?;

        Self::first_existing(proj_dirs.config_dir(), DEFAULT_FILE_NAMES)
    }

    /// Creates a source for the first of `names` that exists in `dir` and has
    /// a supported extension.
    pub fn first_existing(dir: &Path, names: &[&str]) -> Result<Self> {
        names
            .iter()
            .map(|name| dir.join(name))
            .filter(|candidate| candidate.is_file())
            .find_map(|candidate| Self::from_file(candidate).ok())
            .ok_or_else(|| {
                source_error(
                    format!("No configuration file found in {}", dir.display()),
                    None,
                )
            })
    }

    /// Returns the path to the configuration file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and parses the file asynchronously.
    ///
    /// The file is read in full and parsed before anything is returned, so a
    /// store loading from this future is only touched once it resolves.
    #[cfg(feature = "async")]
    pub async fn read_async(&self) -> Result<Mapping> {
        let metadata = tokio::fs::metadata(&self.path).await.map_err(|e| {
            source_error(
                format!("Failed to read file metadata: {}", display_name(&self.path)),
                Some(e),
            )
        })?;
        check_size(&self.path, metadata.len())?;

        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            source_error(
                format!(
                    "Failed to read configuration file: {}",
                    display_name(&self.path)
                ),
                Some(e),
            )
        })?;

        tracing::debug!("Read {} bytes from '{}'", content.len(), self.path.display());
        self.parser.parse(&content)
    }
}

impl fmt::Debug for FileSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileSource")
            .field("path", &self.path)
            .field("extensions", &self.parser.supported_extensions())
            .finish()
    }
}

impl ConfigSource for FileSource {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    fn read(&self) -> Result<Mapping> {
        // Canonicalize path to prevent directory traversal attacks
        let canonical_path = self.path.canonicalize().map_err(|e| {
            source_error(
                format!("Invalid or inaccessible path: {}", display_name(&self.path)),
                Some(e),
            )
        })?;

        let metadata = fs::metadata(&canonical_path).map_err(|e| {
            source_error(
                format!(
                    "Failed to read file metadata: {}",
                    display_name(&canonical_path)
                ),
                Some(e),
            )
        })?;
        check_size(&canonical_path, metadata.len())?;

        let content = fs::read_to_string(&canonical_path).map_err(|e| {
            source_error(
                format!(
                    "Failed to read configuration file: {}",
                    display_name(&canonical_path)
                ),
                Some(e),
            )
        })?;

        tracing::debug!(
            "Read {} bytes from '{}'",
            content.len(),
            canonical_path.display()
        );
        self.parser.parse(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Value;
    use std::io::Write;
    use tempfile::{Builder, TempDir};

    fn temp_config(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_file_source_json() {
        let file = temp_config(".json", r#"{"database": {"host": "localhost"}}"#);
        let source = FileSource::from_file(file.path()).unwrap();

        assert_eq!(source.name(), "file");
        let root = source.read().unwrap();
        assert_eq!(
            root["database"].as_mapping().unwrap()["host"],
            Value::from("localhost")
        );
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn test_file_source_yaml() {
        let file = temp_config(".yml", "database:\n  port: 5432\n");
        let source = FileSource::from_file(file.path()).unwrap();
        let root = source.read().unwrap();
        assert_eq!(
            root["database"].as_mapping().unwrap()["port"],
            Value::from(5432)
        );
    }

    #[test]
    fn test_file_source_unknown_extension() {
        let err = FileSource::from_file("/tmp/config.ini").unwrap_err();
        assert!(matches!(err, ConfigError::SourceError { .. }));
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_file_source_missing_file() {
        let source = FileSource::from_file("/nonexistent/path/to/config.json").unwrap();
        let err = source.read().unwrap_err();
        assert!(matches!(err, ConfigError::SourceError { .. }));
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_file_source_parse_error() {
        let file = temp_config(".json", "{ not json");
        let err = FileSource::from_file(file.path()).unwrap().read().unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_file_source_invalid_root() {
        let file = temp_config(".json", "[1, 2, 3]");
        let err = FileSource::from_file(file.path()).unwrap().read().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRoot { .. }));
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_file_source_with_parser_ignores_extension() {
        let file = temp_config(".conf", r#"{"a": 1}"#);
        let source = FileSource::with_parser(file.path(), Arc::new(crate::adapters::JsonParser));
        assert_eq!(source.read().unwrap()["a"], Value::from(1));
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_first_existing() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.json"), r#"{"found": true}"#).unwrap();

        let source = FileSource::first_existing(dir.path(), DEFAULT_FILE_NAMES).unwrap();
        assert_eq!(source.path(), dir.path().join("config.json"));
        assert_eq!(source.read().unwrap()["found"], Value::from(true));
    }

    #[test]
    fn test_first_existing_none_found() {
        let dir = TempDir::new().unwrap();
        let err = FileSource::first_existing(dir.path(), DEFAULT_FILE_NAMES).unwrap_err();
        assert!(matches!(err, ConfigError::SourceError { .. }));
    }

    #[test]
    fn test_check_size() {
        let path = Path::new("big.json");
        assert!(check_size(path, MAX_FILE_SIZE).is_ok());
        assert!(check_size(path, MAX_FILE_SIZE + 1).is_err());
    }

    #[cfg(all(feature = "async", feature = "json"))]
    #[tokio::test]
    async fn test_file_source_read_async() {
        let file = temp_config(".json", r#"{"async": "yes"}"#);
        let source = FileSource::from_file(file.path()).unwrap();
        let root = source.read_async().await.unwrap();
        assert_eq!(root["async"], Value::from("yes"));
    }
}
