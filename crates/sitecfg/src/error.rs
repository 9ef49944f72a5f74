//! CLI error types.

use sitecfg_engine::ResolveError;
use sitecfg_source::SourceError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Source(#[from] SourceError),

    #[error("{0}")]
    Resolve(#[from] ResolveError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML serialization error: {0}")]
    Toml(#[from] toml::ser::Error),

    #[error("{0}")]
    Validation(String),
}
