//! Domain types for the communication relay.
//!
//! Direction, category and mode are closed enums; there is no string tag
//! anywhere in the sync path. All types serialize via serde + serde_yaml.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed team identifier (`Backend`, `Analysis`, …).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TeamName(pub String);

impl fmt::Display for TeamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for TeamName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TeamName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Directory name of a sibling team project, relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectDirName(pub String);

impl fmt::Display for ProjectDirName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ProjectDirName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ProjectDirName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which way a folder pair flows, seen from the frontend side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Outgoing,
    Incoming,
}

impl Direction {
    /// Both directions in run order.
    pub fn all() -> &'static [Direction] {
        &[Direction::Outgoing, Direction::Incoming]
    }

    pub fn icon(self) -> &'static str {
        match self {
            Direction::Outgoing => "📤",
            Direction::Incoming => "📥",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Outgoing => write!(f, "outgoing"),
            Direction::Incoming => write!(f, "incoming"),
        }
    }
}

/// Sub-folder category of a communication tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Request,
    Completed,
}

impl Category {
    /// Both categories in run order.
    pub fn all() -> &'static [Category] {
        &[Category::Request, Category::Completed]
    }

    /// On-disk folder name (`Request` / `Completed`).
    pub fn dir_name(self) -> &'static str {
        match self {
            Category::Request => "Request",
            Category::Completed => "Completed",
        }
    }

    /// The category a file moves into once it is done, if any.
    pub fn completion_sibling(self) -> Option<Category> {
        match self {
            Category::Request => Some(Category::Completed),
            Category::Completed => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Which folder-pair layout a run uses.
///
/// - `Mirror`: frontend `receive` → sibling `send`, sibling `receive` →
///   frontend `send`. Plain deletions.
/// - `Push`: the frontend tree is authoritative in both directions, and a
///   request that disappeared because it moved to `Completed` is labeled as
///   a completion instead of a deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SyncMode {
    #[default]
    Mirror,
    Push,
}

impl SyncMode {
    /// Whether deletions in this mode consult the `Completed` source set.
    pub fn completion_aware(self) -> bool {
        matches!(self, SyncMode::Push)
    }
}

impl fmt::Display for SyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncMode::Mirror => write!(f, "mirror"),
            SyncMode::Push => write!(f, "push"),
        }
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// One registry row: a team and the sibling project directory it lives in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamEntry {
    pub name: TeamName,
    pub project: ProjectDirName,
}

impl TeamEntry {
    pub fn new(name: impl Into<String>, project: impl Into<String>) -> Self {
        Self {
            name: TeamName(name.into()),
            project: ProjectDirName(project.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newtype_display() {
        assert_eq!(TeamName::from("Backend").to_string(), "Backend");
        assert_eq!(ProjectDirName::from("booster-backend").to_string(), "booster-backend");
    }

    #[test]
    fn direction_and_category_display() {
        assert_eq!(Direction::Outgoing.to_string(), "outgoing");
        assert_eq!(Direction::Incoming.to_string(), "incoming");
        assert_eq!(Category::Request.to_string(), "Request");
        assert_eq!(Category::Completed.to_string(), "Completed");
    }

    #[test]
    fn only_request_has_a_completion_sibling() {
        assert_eq!(Category::Request.completion_sibling(), Some(Category::Completed));
        assert_eq!(Category::Completed.completion_sibling(), None);
    }

    #[test]
    fn sync_mode_yaml_is_lowercase() {
        let yaml = serde_yaml::to_string(&SyncMode::Push).expect("serialize");
        assert_eq!(yaml.trim(), "push");
        let mode: SyncMode = serde_yaml::from_str("mirror").expect("deserialize");
        assert_eq!(mode, SyncMode::Mirror);
        assert!(SyncMode::Push.completion_aware());
        assert!(!SyncMode::Mirror.completion_aware());
    }
}
