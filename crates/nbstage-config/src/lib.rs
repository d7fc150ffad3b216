//! Project configuration for nbstage.
//!
//! Parses the YAML project file naming the processors to apply and their
//! arguments:
//!
//! ```yaml
//! processors:
//!   - basic
//!   - explain
//! post_processors:
//!   - header-inject
//! processor_args:
//!   header-inject:
//!     header: "<!-- built by nbstage -->"
//! remove_directives: true
//! documentation_source: nbs
//! output_folder: docs
//! ```
//!
//! Processor arguments are carried as opaque JSON values; resolving
//! processor names against a registry is the caller's concern.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Value};

/// Default directory holding source notebooks.
const DEFAULT_SOURCE: &str = "nbs";

/// Default output directory when the config names none.
pub const DEFAULT_OUTPUT: &str = "processed";

/// Project configuration.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Processor names to apply, in order.
    pub processors: Vec<String>,
    /// Post-processor names to apply, in order.
    pub post_processors: Vec<String>,
    /// Per-processor argument mappings, passed through opaquely.
    pub processor_args: BTreeMap<String, Map<String, Value>>,
    /// Whether directive lines are stripped from cell sources.
    pub remove_directives: bool,
    /// Whether dispatch runs during pipeline construction.
    pub process_immediately: bool,
    /// Directory the source notebooks live in; output paths are laid out
    /// relative to it.
    pub documentation_source: PathBuf,
    /// Directory processed documents are written to.
    pub output_folder: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            processors: Vec::new(),
            post_processors: Vec::new(),
            processor_args: BTreeMap::new(),
            remove_directives: true,
            process_immediately: false,
            documentation_source: PathBuf::from(DEFAULT_SOURCE),
            output_folder: None,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] when the file does not exist,
    /// [`ConfigError::Io`] for other read failures, and
    /// [`ConfigError::Parse`] for malformed YAML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed YAML.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// The arguments configured for `name`, if any.
    #[must_use]
    pub fn args_for(&self, name: &str) -> Option<&Map<String, Value>> {
        self.processor_args.get(name)
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// YAML parsing error.
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_yaml("").unwrap();
        assert!(config.processors.is_empty());
        assert!(config.post_processors.is_empty());
        assert!(config.remove_directives);
        assert!(!config.process_immediately);
        assert_eq!(config.documentation_source, PathBuf::from("nbs"));
        assert_eq!(config.output_folder, None);
    }

    #[test]
    fn test_full_config() {
        let yaml = r#"
processors:
  - basic
  - explain
post_processors:
  - header-inject
processor_args:
  header-inject:
    header: "<!-- banner -->"
remove_directives: false
documentation_source: notebooks
output_folder: docs
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.processors, vec!["basic", "explain"]);
        assert_eq!(config.post_processors, vec!["header-inject"]);
        assert!(!config.remove_directives);
        assert_eq!(config.documentation_source, PathBuf::from("notebooks"));
        assert_eq!(config.output_folder, Some(PathBuf::from("docs")));

        let args = config.args_for("header-inject").unwrap();
        assert_eq!(args["header"], "<!-- banner -->");
        assert_eq!(config.args_for("basic"), None);
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(Config::from_yaml("procesors: [basic]").is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load("/does/not/exist.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nbstage.yaml");
        fs::write(&path, "processors: [basic]\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.processors, vec!["basic"]);
    }
}
