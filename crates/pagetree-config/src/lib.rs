//! Pagetree configuration
//!
//! Settings for the `pagetree` command are read from `pagetree.toml`, then
//! overridden by `PAGETREE_*` environment variables. Command-line flags are
//! applied last by the binary.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default configuration file name, looked up in the current directory.
pub const CONFIG_FILE_NAME: &str = "pagetree.toml";

/// Errors raised while loading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for [`PageTreeConfig`].
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct PageTreeConfig {
    /// Where and how the JSON is written
    pub output: OutputConfig,
    /// Parser settings
    pub parse: ParseConfig,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Indent the JSON (default: true)
    pub pretty: bool,
    /// File to write instead of stdout
    pub file_name: Option<PathBuf>,
    /// Also place the JSON on the system clipboard
    pub copy_to_clipboard: bool,
}

/// Parser configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ParseConfig {
    /// Counter-based ids for reproducible output
    pub stable_ids: bool,
    /// Styleguide JSON file used instead of the embedded one
    pub styleguide: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            file_name: None,
            copy_to_clipboard: false,
        }
    }
}

fn flag(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

impl PageTreeConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `pagetree.toml` from the current directory, or defaults if it is
    /// missing or unreadable.
    pub fn load_or_default() -> Self {
        Self::load_from_file(CONFIG_FILE_NAME).unwrap_or_default()
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    pub fn merge_with_env(&mut self) {
        self.merge_with_lookup(|name| std::env::var(name).ok());
    }

    /// Applies overrides read through `lookup`, which maps a variable name
    /// to its value.
    pub fn merge_with_lookup(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("PAGETREE_PRETTY") {
            self.output.pretty = flag(&val);
        }
        if let Some(path) = lookup("PAGETREE_OUTPUT").filter(|path| !path.is_empty()) {
            self.output.file_name = Some(PathBuf::from(path));
        }
        if let Some(val) = lookup("PAGETREE_COPY") {
            self.output.copy_to_clipboard = flag(&val);
        }
        if let Some(val) = lookup("PAGETREE_STABLE_IDS") {
            self.parse.stable_ids = flag(&val);
        }
        if let Some(path) = lookup("PAGETREE_STYLEGUIDE").filter(|path| !path.is_empty()) {
            self.parse.styleguide = Some(PathBuf::from(path));
        }
    }

    /// Load configuration with environment variable overrides
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }
}
