//! Change records produced by reconciliation.

use std::fmt;

use relay_core::types::{Category, Direction, TeamName};

/// What happened to a single target file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Created,
    Updated,
    Deleted,
    /// The file left `Request` on the source side because it moved to
    /// `Completed`; the target copy was removed.
    CompletedTransition,
}

impl ChangeKind {
    pub fn label(self) -> &'static str {
        match self {
            ChangeKind::Created => "created",
            ChangeKind::Updated => "updated",
            ChangeKind::Deleted => "deleted",
            ChangeKind::CompletedTransition => "completed-transition",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One recorded event. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncChange {
    pub team: TeamName,
    pub direction: Direction,
    pub category: Category,
    pub kind: ChangeKind,
    pub file_name: String,
}

impl fmt::Display for SyncChange {
    /// Human-readable description, as printed to the console and the log file.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            team,
            direction,
            category,
            kind,
            file_name,
        } = self;
        match (kind, category) {
            (ChangeKind::Created, _) => {
                write!(f, "🆕 [{team}] {direction} {category} new file: {file_name}")
            }
            (ChangeKind::Updated, Category::Completed) => {
                write!(f, "✅ [{team}] {direction} completed file updated: {file_name}")
            }
            (ChangeKind::Updated, Category::Request) => {
                write!(f, "📝 [{team}] {direction} request modified: {file_name}")
            }
            (ChangeKind::Deleted, _) => {
                write!(f, "🗑️ [{team}] {direction} {category} file deleted: {file_name}")
            }
            (ChangeKind::CompletedTransition, _) => {
                write!(f, "📦 [{team}] {direction} request moved to completed: {file_name}")
            }
        }
    }
}

/// A target file that could not be removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionFailure {
    pub file_name: String,
    pub reason: String,
}

impl fmt::Display for DeletionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "❌ failed to delete {}: {}", self.file_name, self.reason)
    }
}

/// Outcome of reconciling one folder pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Changes in the order they were applied: upserts first, then deletions.
    pub changes: Vec<SyncChange>,
    /// Source files whose target copy was already byte-identical.
    pub unchanged: Vec<String>,
    pub failures: Vec<DeletionFailure>,
    /// `false` when the source directory did not exist.
    pub source_present: bool,
}

impl ReconcileReport {
    pub fn is_noop(&self) -> bool {
        self.changes.is_empty() && self.failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(kind: ChangeKind, category: Category) -> SyncChange {
        SyncChange {
            team: TeamName::from("Backend"),
            direction: Direction::Outgoing,
            category,
            kind,
            file_name: "a.md".to_string(),
        }
    }

    #[test]
    fn update_description_depends_on_category() {
        let completed = change(ChangeKind::Updated, Category::Completed).to_string();
        assert_eq!(completed, "✅ [Backend] outgoing completed file updated: a.md");
        let request = change(ChangeKind::Updated, Category::Request).to_string();
        assert_eq!(request, "📝 [Backend] outgoing request modified: a.md");
    }

    #[test]
    fn created_and_deleted_descriptions_name_the_category() {
        assert_eq!(
            change(ChangeKind::Created, Category::Request).to_string(),
            "🆕 [Backend] outgoing Request new file: a.md"
        );
        assert_eq!(
            change(ChangeKind::Deleted, Category::Completed).to_string(),
            "🗑️ [Backend] outgoing Completed file deleted: a.md"
        );
    }

    #[test]
    fn transition_is_not_described_as_deletion() {
        let text = change(ChangeKind::CompletedTransition, Category::Request).to_string();
        assert!(text.contains("moved to completed"));
        assert!(!text.contains("deleted"));
    }
}
