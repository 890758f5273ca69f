//! Expander configuration
//!
//! The defaults describe the `.qllt` -> `.qll` convention: templates carry a
//! `/*template ... */` metadata block and expand into sibling library files.
//! A TOML file can override any of these settings.

use std::path::Path;
use std::str::FromStr;

use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

/// Default extension of template files
pub const DEFAULT_TEMPLATE_EXTENSION: &str = "qllt";

/// Default extension of generated files
pub const DEFAULT_OUTPUT_EXTENSION: &str = "qll";

/// Line that opens the metadata block
pub const DEFAULT_BEGIN_MARKER: &str = r"^/\*template\s*$";

/// Line that closes the metadata block
pub const DEFAULT_END_MARKER: &str = r"^\*/\s*$";

/// Errors that can occur when loading or parsing a config file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid {field} pattern: {source}")]
    InvalidPattern {
        field: &'static str,
        #[source]
        source: regex::Error,
    },
}

/// Settings shared by discovery, parsing and generation
#[derive(Debug, Clone)]
pub struct ExpandConfig {
    /// Extension (without the dot) identifying template files
    pub template_extension: String,
    /// Extension (without the dot) appended to generated files
    pub output_extension: String,
    /// Pattern matching the line that opens the metadata block
    pub begin_marker: Regex,
    /// Pattern matching the line that closes the metadata block
    pub end_marker: Regex,
}

/// TOML structure for deserializing a config file
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    template_extension: Option<String>,
    output_extension: Option<String>,
    begin_marker: Option<String>,
    end_marker: Option<String>,
}

impl Default for ExpandConfig {
    fn default() -> Self {
        Self {
            template_extension: DEFAULT_TEMPLATE_EXTENSION.to_string(),
            output_extension: DEFAULT_OUTPUT_EXTENSION.to_string(),
            begin_marker: Regex::new(DEFAULT_BEGIN_MARKER).expect("default begin marker is valid"),
            end_marker: Regex::new(DEFAULT_END_MARKER).expect("default end marker is valid"),
        }
    }
}

impl FromStr for ExpandConfig {
    type Err = ConfigError;

    fn from_str(content: &str) -> Result<Self, Self::Err> {
        let parsed: TomlConfig = toml::from_str(content)?;
        let mut config = Self::default();

        if let Some(ext) = parsed.template_extension {
            config.template_extension = trim_dot(ext);
        }
        if let Some(ext) = parsed.output_extension {
            config.output_extension = trim_dot(ext);
        }
        if let Some(pattern) = parsed.begin_marker {
            config.begin_marker = compile("begin_marker", &pattern)?;
        }
        if let Some(pattern) = parsed.end_marker {
            config.end_marker = compile("end_marker", &pattern)?;
        }

        Ok(config)
    }
}

impl ExpandConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        content.parse()
    }

    /// Set both metadata block markers
    pub fn with_markers(mut self, begin: &str, end: &str) -> Result<Self, ConfigError> {
        self.begin_marker = compile("begin_marker", begin)?;
        self.end_marker = compile("end_marker", end)?;
        Ok(self)
    }

    /// Check whether `path` names a template file
    pub fn is_template_path(&self, path: &Path) -> bool {
        path.extension()
            .is_some_and(|ext| ext == self.template_extension.as_str())
    }
}

fn compile(field: &'static str, pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern { field, source })
}

fn trim_dot(ext: String) -> String {
    match ext.strip_prefix('.') {
        Some(stripped) => stripped.to_string(),
        None => ext,
    }
}
