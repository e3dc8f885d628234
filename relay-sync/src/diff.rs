//! Unified diff preview of what a run would copy.
//!
//! Walks the same folder pairs as [`crate::pipeline::run`] but never writes.
//! Deletions are listed by name only.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use similar::TextDiff;

use relay_core::types::{Direction, SyncMode};
use relay_core::RelayConfig;

use crate::{
    change::ChangeKind,
    error::{io_err, SyncError},
    layout::{plan_direction, Side},
    reconcile::{reconcile, ReconcileOptions},
};

/// A single pending file change with its rendered diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub team: String,
    pub direction: Direction,
    pub kind: ChangeKind,
    pub target: PathBuf,
    /// Empty for deletions.
    pub unified_diff: String,
}

/// Compute the pending diffs for every team present on disk.
pub fn diff_run(config: &RelayConfig, mode: SyncMode) -> Result<Vec<FileDiff>, SyncError> {
    let options = ReconcileOptions {
        dry_run: true,
        completion_aware: mode.completion_aware(),
    };

    let mut diffs = Vec::new();
    for entry in config.registry.iter() {
        let project_dir = config.project_root.join(&entry.project.0);
        if !project_dir.is_dir() {
            continue;
        }
        for direction in Direction::all() {
            let plan = plan_direction(
                mode,
                *direction,
                &config.communication_root,
                &entry.name,
                &project_dir,
            );
            if plan.source_side == Side::Counterpart && !plan.source_base.is_dir() {
                continue;
            }
            for pair in plan.pairs(&entry.name) {
                let report = reconcile(&pair, options)?;
                for change in report.changes {
                    let source = pair.source().join(&change.file_name);
                    let target = pair.target().join(&change.file_name);
                    let unified_diff = match change.kind {
                        ChangeKind::Created | ChangeKind::Updated => {
                            render(&source, &target, pair.target_base.parent())?
                        }
                        ChangeKind::Deleted | ChangeKind::CompletedTransition => String::new(),
                    };
                    diffs.push(FileDiff {
                        team: entry.name.0.clone(),
                        direction: *direction,
                        kind: change.kind,
                        target,
                        unified_diff,
                    });
                }
            }
        }
    }
    Ok(diffs)
}

fn render(source: &Path, target: &Path, base: Option<&Path>) -> Result<String, SyncError> {
    let new = read_or_empty(source)?;
    let old = read_or_empty(target)?;

    let relative = base
        .and_then(|b| target.strip_prefix(b).ok())
        .unwrap_or(target);
    let old_header = format!("a/{}", relative.display());
    let new_header = format!("b/{}", relative.display());
    Ok(TextDiff::from_lines(&old, &new)
        .unified_diff()
        .header(&old_header, &new_header)
        .context_radius(3)
        .to_string())
}

fn read_or_empty(path: &Path) -> Result<String, SyncError> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).replace("\r\n", "\n")),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(String::new()),
        Err(err) => Err(io_err(path, err)),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use relay_core::types::TeamEntry;
    use relay_core::TeamRegistry;
    use tempfile::TempDir;

    use super::*;

    fn setup() -> (TempDir, RelayConfig) {
        let tmp = TempDir::new().expect("tmp");
        let mut cfg = RelayConfig::defaults_at(&tmp.path().join("fe").join("Communication"));
        cfg.project_root = tmp.path().to_path_buf();
        cfg.registry =
            TeamRegistry::new(vec![TeamEntry::new("Backend", "booster-backend")]).expect("reg");
        fs::create_dir_all(tmp.path().join("booster-backend")).expect("mkdir");
        (tmp, cfg)
    }

    #[test]
    fn edited_request_produces_unified_diff_and_writes_nothing() {
        let (tmp, cfg) = setup();
        let source = cfg.communication_root.join("Backend/receive/Request");
        let target = tmp
            .path()
            .join("booster-backend/Communication/Frontend/send/Request");
        fs::create_dir_all(&source).expect("mkdir");
        fs::create_dir_all(&target).expect("mkdir");
        fs::write(source.join("api.md"), "line one\nline two\n").expect("write");
        fs::write(target.join("api.md"), "line one\n").expect("write");

        let diffs = diff_run(&cfg, SyncMode::Mirror).expect("diff");
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].kind, ChangeKind::Updated);
        assert!(diffs[0].unified_diff.contains("+line two"));
        assert!(diffs[0].unified_diff.contains("@@"));
        assert_eq!(
            fs::read_to_string(target.join("api.md")).expect("read"),
            "line one\n"
        );
    }

    #[test]
    fn nothing_pending_yields_no_diffs() {
        let (_tmp, cfg) = setup();
        let diffs = diff_run(&cfg, SyncMode::Push).expect("diff");
        assert!(diffs.is_empty());
    }
}
