//! `relay.yaml`: optional per-root configuration.
//!
//! # Layout
//!
//! ```text
//! <communication_root>/
//!   relay.yaml        (optional, every field has a default)
//!   sync_log.txt      (default log file)
//!   <team>/send/{Request,Completed}/*.md
//!   <team>/receive/{Request,Completed}/*.md
//! <project_root>/      (defaults to the communication root's grand-parent)
//!   <sibling project>/Communication/Frontend/{send,receive}/...
//! ```
//!
//! Relative paths in the file are resolved against the communication root.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::RegistryError;
use crate::registry::TeamRegistry;
use crate::types::{SyncMode, TeamEntry};

pub const CONFIG_FILE: &str = "relay.yaml";
pub const DEFAULT_LOG_FILE: &str = "sync_log.txt";

/// On-disk shape of `relay.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_root: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<SyncMode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub teams: Vec<TeamEntry>,
}

/// Fully resolved configuration for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    /// Frontend communication folder (`<root>/<team>/{send,receive}`).
    pub communication_root: PathBuf,
    /// Directory holding the sibling team projects.
    pub project_root: PathBuf,
    pub log_file: PathBuf,
    pub mode: SyncMode,
    pub registry: TeamRegistry,
}

impl RelayConfig {
    /// Defaults for `root` with no config file present.
    pub fn defaults_at(root: &Path) -> Self {
        Self {
            communication_root: root.to_path_buf(),
            project_root: default_project_root(root),
            log_file: root.join(DEFAULT_LOG_FILE),
            mode: SyncMode::default(),
            registry: TeamRegistry::default(),
        }
    }

    fn from_file(root: &Path, file: ConfigFile) -> Result<Self, RegistryError> {
        let mut config = Self::defaults_at(root);
        if let Some(project_root) = file.project_root {
            config.project_root = root.join(project_root);
        }
        if let Some(log_file) = file.log_file {
            config.log_file = root.join(log_file);
        }
        if let Some(mode) = file.mode {
            config.mode = mode;
        }
        if !file.teams.is_empty() {
            config.registry = TeamRegistry::new(file.teams)?;
        }
        Ok(config)
    }
}

/// `<root>/relay.yaml`: pure, no I/O.
pub fn config_path_at(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

/// Load `<root>/relay.yaml`, falling back to defaults when it is absent.
///
/// Returns `RegistryError::Parse` (with path + line context) if malformed.
pub fn load_at(root: &Path) -> Result<RelayConfig, RegistryError> {
    let path = config_path_at(root);
    if !path.exists() {
        return Ok(RelayConfig::defaults_at(root));
    }
    let contents = std::fs::read_to_string(&path)?;
    let file: ConfigFile = if contents.trim().is_empty() {
        ConfigFile::default()
    } else {
        serde_yaml::from_str(&contents).map_err(|e| RegistryError::Parse { path, source: e })?
    };
    RelayConfig::from_file(root, file)
}

/// Write a starter `relay.yaml` listing the default mode and teams.
///
/// Write flow: serialize → `relay.yaml.tmp` sibling → `rename`.
/// Refuses to overwrite an existing config.
pub fn init_at(root: &Path) -> Result<PathBuf, RegistryError> {
    let path = config_path_at(root);
    if path.exists() {
        return Err(RegistryError::ConfigExists { path });
    }
    std::fs::create_dir_all(root)?;

    let file = ConfigFile {
        project_root: None,
        log_file: Some(PathBuf::from(DEFAULT_LOG_FILE)),
        mode: Some(SyncMode::default()),
        teams: TeamRegistry::default().into_entries(),
    };
    let yaml = serde_yaml::to_string(&file)?;
    let tmp = path.with_file_name(format!("{CONFIG_FILE}.tmp"));
    std::fs::write(&tmp, yaml)?;
    std::fs::rename(&tmp, &path)?;
    Ok(path)
}

fn default_project_root(root: &Path) -> PathBuf {
    root.parent()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| root.join("..").join(".."))
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
