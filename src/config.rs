//! Harness configuration, read from YAML.
//!
//! ```yaml
//! name: my-suites
//! root: tests/scripts
//! engine: sutra
//! suites: [Math, Strings]
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::SetupError;

/// Looked up in the working directory when no config file is given.
pub const DEFAULT_CONFIG_FILE: &str = "scriptunit.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    /// Name of the root of the description tree.
    pub name: String,
    /// Directory suites are resolved against.
    pub root: PathBuf,
    /// Forces one engine instead of the preferred/fallback selection.
    pub engine: Option<String>,
    /// Suites in run order. Empty means every script under `root`.
    pub suites: Vec<String>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            name: "scripts".to_string(),
            root: PathBuf::from("."),
            engine: None,
            suites: Vec::new(),
        }
    }
}

impl HarnessConfig {
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }

    /// Reads a config file. A relative `root` is taken relative to the file.
    pub fn load(path: &Path) -> Result<Self, SetupError> {
        let text = std::fs::read_to_string(path).map_err(|source| SetupError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_yaml(&text).map_err(|source| SetupError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        if config.root.is_relative() {
            if let Some(dir) = path.parent() {
                config.root = dir.join(&config.root);
            }
        }
        tracing::debug!(path = %path.display(), root = %config.root.display(), "loaded config");
        Ok(config)
    }
}
