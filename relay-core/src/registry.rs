//! Team registry: which sibling project each team lives in.
//!
//! The registry is a plain value handed to the sync orchestrator; nothing in
//! the workspace reads a global mapping, so tests build their own.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::RegistryError;
use crate::types::{TeamEntry, TeamName};

/// Built-in mapping used when `relay.yaml` does not list any teams.
const DEFAULT_TEAMS: &[(&str, &str)] = &[
    ("Backend", "booster-backend"),
    ("Analysis", "booster-analysis"),
    ("Infra", "booster-infra"),
    ("Pipeline", "booster-pipeline"),
    ("Manage", "booster-manage"),
];

/// Ordered team → sibling directory mapping. Read-only once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamRegistry {
    teams: Vec<TeamEntry>,
}

impl TeamRegistry {
    /// Build a registry, rejecting duplicate team names.
    pub fn new(teams: Vec<TeamEntry>) -> Result<Self, RegistryError> {
        let mut seen = HashSet::new();
        for entry in &teams {
            if !seen.insert(&entry.name) {
                return Err(RegistryError::DuplicateTeam(entry.name.0.clone()));
            }
        }
        Ok(Self { teams })
    }

    pub fn iter(&self) -> impl Iterator<Item = &TeamEntry> {
        self.teams.iter()
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn get(&self, team: &TeamName) -> Option<&TeamEntry> {
        self.teams.iter().find(|e| &e.name == team)
    }

    /// `<project_root>/<sibling dir>` for `team`, or `None` if unregistered.
    pub fn sibling_path(&self, project_root: &Path, team: &TeamName) -> Option<PathBuf> {
        self.get(team).map(|e| project_root.join(&e.project.0))
    }

    /// Keep only the named teams, preserving registry order.
    ///
    /// An empty filter returns the registry unchanged.
    pub fn filtered(&self, names: &[TeamName]) -> Result<Self, RegistryError> {
        if names.is_empty() {
            return Ok(self.clone());
        }
        for name in names {
            if self.get(name).is_none() {
                return Err(RegistryError::UnknownTeam(name.0.clone()));
            }
        }
        Ok(Self {
            teams: self
                .teams
                .iter()
                .filter(|e| names.contains(&e.name))
                .cloned()
                .collect(),
        })
    }

    pub fn into_entries(self) -> Vec<TeamEntry> {
        self.teams
    }
}

impl Default for TeamRegistry {
    fn default() -> Self {
        Self {
            teams: DEFAULT_TEAMS
                .iter()
                .map(|(name, project)| TeamEntry::new(*name, *project))
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
