//! Error types for relay-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from registry and configuration operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Underlying I/O failure (file not found, permission denied, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error (write/save path).
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// YAML parse error on load, with file path and line context from serde_yaml.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The same team name appears twice in a registry.
    #[error("team '{0}' is registered more than once")]
    DuplicateTeam(String),

    /// A team filter named a team the registry does not know.
    #[error("unknown team '{0}'")]
    UnknownTeam(String),

    /// `relay init` refuses to overwrite an existing config file.
    #[error("config already exists at {path}")]
    ConfigExists { path: PathBuf },
}
