//! Directory layout of both sides and the folder pairs a run reconciles.
//!
//! ```text
//! <communication_root>/<team>/{send,receive}/{Request,Completed}/*.md
//! <sibling project>/Communication/Frontend/{send,receive}/{Request,Completed}/*.md
//! ```

use std::path::{Path, PathBuf};

use relay_core::types::{Category, Direction, SyncMode, TeamName};

use crate::change::{ChangeKind, SyncChange};

pub const SEND_DIR: &str = "send";
pub const RECEIVE_DIR: &str = "receive";

/// `<sibling>/Communication/Frontend`: the counterpart's view of the frontend.
pub fn counterpart_root(sibling: &Path) -> PathBuf {
    sibling.join("Communication").join("Frontend")
}

/// Which side of the relay a directory belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Frontend,
    Counterpart,
}

/// A (source, target) association for one team, direction and category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderPair {
    pub team: TeamName,
    pub direction: Direction,
    pub category: Category,
    /// `.../{send,receive}` on the authoritative side.
    pub source_base: PathBuf,
    /// `.../{send,receive}` on the side being brought in line.
    pub target_base: PathBuf,
}

impl FolderPair {
    pub fn new(
        team: TeamName,
        direction: Direction,
        category: Category,
        source_base: PathBuf,
        target_base: PathBuf,
    ) -> Self {
        Self {
            team,
            direction,
            category,
            source_base,
            target_base,
        }
    }

    pub fn source(&self) -> PathBuf {
        self.source_base.join(self.category.dir_name())
    }

    pub fn target(&self) -> PathBuf {
        self.target_base.join(self.category.dir_name())
    }

    /// Source folder a request lands in once completed (`None` for `Completed`).
    pub fn completion_source(&self) -> Option<PathBuf> {
        self.category
            .completion_sibling()
            .map(|c| self.source_base.join(c.dir_name()))
    }

    pub(crate) fn change(&self, kind: ChangeKind, file_name: &str) -> SyncChange {
        SyncChange {
            team: self.team.clone(),
            direction: self.direction,
            category: self.category,
            kind,
            file_name: file_name.to_string(),
        }
    }
}

/// Source and target bases for one team and direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectionPlan {
    pub direction: Direction,
    pub source_base: PathBuf,
    pub target_base: PathBuf,
    pub source_side: Side,
}

impl DirectionPlan {
    /// One pair per category, `Request` first.
    pub fn pairs(&self, team: &TeamName) -> Vec<FolderPair> {
        Category::all()
            .iter()
            .map(|category| {
                FolderPair::new(
                    team.clone(),
                    self.direction,
                    *category,
                    self.source_base.clone(),
                    self.target_base.clone(),
                )
            })
            .collect()
    }
}

/// Resolve the bases for `team` in `mode`.
///
/// | mode   | direction | source                     | target                     |
/// |--------|-----------|----------------------------|----------------------------|
/// | mirror | outgoing  | frontend `<team>/receive`  | counterpart `send`         |
/// | mirror | incoming  | counterpart `receive`      | frontend `<team>/send`     |
/// | push   | outgoing  | frontend `<team>/send`     | counterpart `receive`      |
/// | push   | incoming  | frontend `<team>/receive`  | counterpart `send`         |
pub fn plan_direction(
    mode: SyncMode,
    direction: Direction,
    communication_root: &Path,
    team: &TeamName,
    sibling: &Path,
) -> DirectionPlan {
    let frontend = communication_root.join(&team.0);
    let counterpart = counterpart_root(sibling);

    let (source_base, target_base, source_side) = match (mode, direction) {
        (SyncMode::Mirror, Direction::Outgoing) => (
            frontend.join(RECEIVE_DIR),
            counterpart.join(SEND_DIR),
            Side::Frontend,
        ),
        (SyncMode::Mirror, Direction::Incoming) => (
            counterpart.join(RECEIVE_DIR),
            frontend.join(SEND_DIR),
            Side::Counterpart,
        ),
        (SyncMode::Push, Direction::Outgoing) => (
            frontend.join(SEND_DIR),
            counterpart.join(RECEIVE_DIR),
            Side::Frontend,
        ),
        (SyncMode::Push, Direction::Incoming) => (
            frontend.join(RECEIVE_DIR),
            counterpart.join(SEND_DIR),
            Side::Frontend,
        ),
    };

    DirectionPlan {
        direction,
        source_base,
        target_base,
        source_side,
    }
}
