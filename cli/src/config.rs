//! Console configuration.
//!
//! Settings are read from YAML. Every field is optional and falls back to
//! its default.
//!
//! # Example YAML
//!
//! ```yaml
//! extension: sqlite3
//! truncate_phrase: WIPE
//! page_size: 25
//! export_dir: exports
//! log_file: tabula.log
//! ```

use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = ".tabula.yml";

/// Errors raised while loading or saving a [`ConsoleConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// A field holds a value the console cannot work with.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Convenience alias for results with [`ConfigError`].
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Settings for one console session.
///
/// # Examples
///
/// ```
/// use tabula_cli::ConsoleConfig;
///
/// let config: ConsoleConfig = serde_yaml::from_str("page_size: 10").unwrap();
/// assert_eq!(config.page_size, 10);
/// assert_eq!(config.extension, "db");
/// assert_eq!(config.truncate_phrase, "DELETE ALL");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Extension appended to the store name.
    pub extension: String,
    /// Text the user must type to empty a table.
    pub truncate_phrase: String,
    /// Rows per page when browsing.
    pub page_size: usize,
    /// Directory for exports; the working directory when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,
    /// Log destination; stderr when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            extension: "db".to_string(),
            truncate_phrase: "DELETE ALL".to_string(),
            page_size: 50,
            export_dir: None,
            log_file: None,
        }
    }
}

impl ConsoleConfig {
    /// Loads and validates configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::IoError`] if the file cannot be read,
    /// [`ConfigError::YamlError`] if parsing fails, or
    /// [`ConfigError::Invalid`] if a field is out of range.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config: Self = serde_yaml::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::IoError`] if the file cannot be written, or
    /// [`ConfigError::YamlError`] if serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Loads `.tabula.yml` from `dir` if it exists, otherwise returns the
    /// defaults.
    pub fn discover(dir: &Path) -> Result<Self> {
        let path = dir.join(DEFAULT_CONFIG_FILE);
        if path.is_file() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Rejects settings the console cannot honor.
    pub fn validate(&self) -> Result<()> {
        let extension = self.extension.trim_start_matches('.');
        if extension.is_empty() || extension.contains(['/', '\\']) {
            return Err(ConfigError::Invalid(format!(
                "extension {:?} is not a file extension",
                self.extension
            )));
        }
        if self.truncate_phrase.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "truncate_phrase must not be empty".to_string(),
            ));
        }
        if self.page_size == 0 {
            return Err(ConfigError::Invalid(
                "page_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Extension without a leading dot.
    pub fn extension(&self) -> &str {
        self.extension.trim_start_matches('.')
    }

    /// Directory exports are written to, resolved against `cwd`.
    pub fn export_dir(&self, cwd: &Path) -> PathBuf {
        match &self.export_dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => cwd.join(dir),
            None => cwd.to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        let config: ConsoleConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, ConsoleConfig::default());
        config.validate().unwrap();
    }

    #[test]
    fn test_deserialize_complete() {
        let yaml = r#"
extension: .sqlite3
truncate_phrase: WIPE
page_size: 5
export_dir: out
log_file: /tmp/tabula.log
"#;
        let config: ConsoleConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.extension(), "sqlite3");
        assert_eq!(config.truncate_phrase, "WIPE");
        assert_eq!(config.page_size, 5);
        assert_eq!(config.export_dir(Path::new("/work")), Path::new("/work/out"));
        assert_eq!(config.log_file.as_deref(), Some(Path::new("/tmp/tabula.log")));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        for yaml in ["extension: ''", "truncate_phrase: '  '", "page_size: 0", "extension: a/b"] {
            let config: ConsoleConfig = serde_yaml::from_str(yaml).unwrap();
            assert!(
                matches!(config.validate(), Err(ConfigError::Invalid(_))),
                "{yaml}"
            );
        }
    }

    #[test]
    fn test_load_save_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        let original = ConsoleConfig {
            page_size: 7,
            export_dir: Some(PathBuf::from("exports")),
            ..ConsoleConfig::default()
        };
        original.save(&path).unwrap();
        assert_eq!(ConsoleConfig::load(&path).unwrap(), original);
    }

    #[test]
    fn test_discover_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            ConsoleConfig::discover(dir.path()).unwrap(),
            ConsoleConfig::default()
        );
        std::fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "page_size: 3\n").unwrap();
        assert_eq!(ConsoleConfig::discover(dir.path()).unwrap().page_size, 3);
    }

    #[test]
    fn test_load_invalid_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yml");
        std::fs::write(&path, "page_size: [1, 2]\n").unwrap();
        assert!(matches!(
            ConsoleConfig::load(&path),
            Err(ConfigError::YamlError(_))
        ));
    }
}
