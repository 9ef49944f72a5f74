//! Configuration file loading for sitecfg.
//!
//! Reads TOML, YAML and JSON files into [`SourceDocument`]s for the
//! resolution engine and provides auto-discovery of a config file in the
//! current directory and its parents.
//!
//! The format is picked from the file extension. Parsing only checks
//! syntax; structural problems are left to the engine so they are reported
//! with field paths like any other diagnostic.
//!
//! ## Environment Variable Expansion
//!
//! Every string value of a loaded document supports environment variable
//! expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Keys are never expanded.

mod expand;

use std::fmt;
use std::path::{Path, PathBuf};

use serde_json::Value;
use sitecfg_engine::SourceDocument;

/// File names searched by [`discover_config`], in order of preference.
pub const CONFIG_FILENAMES: &[&str] = &[
    "sitecfg.toml",
    "sitecfg.yaml",
    "sitecfg.yml",
    "sitecfg.json",
];

/// Syntax of a configuration file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceFormat {
    Toml,
    Yaml,
    Json,
}

impl SourceFormat {
    /// Pick the format from a file extension.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::UnsupportedFormat`] for unknown or missing
    /// extensions.
    pub fn from_path(path: &Path) -> Result<Self, SourceError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("toml") => Ok(Self::Toml),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            _ => Err(SourceError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Toml => "TOML",
            Self::Yaml => "YAML",
            Self::Json => "JSON",
        })
    }
}

/// Source loading error.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error in {origin}: {source}")]
    Toml {
        origin: String,
        source: toml::de::Error,
    },
    /// YAML parsing error.
    #[error("YAML parse error in {origin}: {source}")]
    Yaml {
        origin: String,
        source: serde_yaml::Error,
    },
    /// JSON parsing error.
    #[error("JSON parse error in {origin}: {source}")]
    Json {
        origin: String,
        source: serde_json::Error,
    },
    /// Extension is not one of `.toml`, `.yaml`, `.yml`, `.json`.
    #[error("Unsupported configuration format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Document field path (e.g., "`editLink.pattern`").
        field: String,
        /// Error message (e.g., "${`DOCS_REPO`} not set").
        message: String,
    },
}

/// Load a configuration file.
///
/// The document's origin is the path as given.
///
/// # Errors
///
/// Returns error if the file is missing, has an unsupported extension,
/// cannot be parsed, or references an unset environment variable.
pub fn load_file(path: &Path) -> Result<SourceDocument, SourceError> {
    if !path.exists() {
        return Err(SourceError::NotFound(path.to_path_buf()));
    }
    let format = SourceFormat::from_path(path)?;
    let content = std::fs::read_to_string(path)?;
    load_str(&path.display().to_string(), &content, format)
}

/// Parse configuration text.
///
/// # Errors
///
/// Returns error if the text cannot be parsed or references an unset
/// environment variable.
pub fn load_str(
    origin: &str,
    content: &str,
    format: SourceFormat,
) -> Result<SourceDocument, SourceError> {
    let mut value: Value = match format {
        SourceFormat::Toml => toml::from_str(content).map_err(|source| SourceError::Toml {
            origin: origin.to_owned(),
            source,
        })?,
        // An empty YAML stream is an empty document, not a null one
        SourceFormat::Yaml if content.trim().is_empty() => Value::Object(serde_json::Map::new()),
        SourceFormat::Yaml => {
            serde_yaml::from_str(content).map_err(|source| SourceError::Yaml {
                origin: origin.to_owned(),
                source,
            })?
        }
        SourceFormat::Json => {
            serde_json::from_str(content).map_err(|source| SourceError::Json {
                origin: origin.to_owned(),
                source,
            })?
        }
    };

    expand::expand_value(&mut value, "")?;

    tracing::debug!(origin, %format, "Loaded configuration source");
    Ok(SourceDocument::new(origin, value))
}

/// Search for a config file in the current directory and parents.
pub fn discover_config() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    discover_from(&cwd)
}

/// Search for a config file in `start` and its parents.
pub fn discover_from(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        for name in CONFIG_FILENAMES {
            let candidate = current.join(name);
            if candidate.is_file() {
                tracing::debug!(path = %candidate.display(), "Discovered configuration file");
                return Some(candidate);
            }
        }
        if !current.pop() {
            return None;
        }
    }
}
