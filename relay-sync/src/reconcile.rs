//! Folder-pair reconciliation.
//!
//! ## `reconcile`: 4-step protocol
//!
//! 1. Ensure the target directory exists (not a reportable change).
//! 2. List tracked files directly inside the source (missing source = empty).
//! 3. Upsert each source file: copy when absent, overwrite when the bytes
//!    differ, skip when identical.
//! 4. Delete every tracked target file the source does not list, relabeling
//!    completed requests when completion awareness is on.
//!
//! Nothing is ever written into the source directory.

use std::collections::{BTreeMap, BTreeSet};
use std::ffi::OsString;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use filetime::FileTime;

use crate::change::{ChangeKind, DeletionFailure, ReconcileReport};
use crate::error::{io_err, SyncError};
use crate::layout::FolderPair;

/// The only extension reconciliation looks at.
pub const TRACKED_EXTENSION: &str = "md";

/// Knobs for a single [`reconcile`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileOptions {
    /// Report what would change without touching the filesystem.
    pub dry_run: bool,
    /// Label a `Request` deletion as a completion when the name shows up in
    /// the source's `Completed` folder.
    pub completion_aware: bool,
}

/// Make `pair.target()` match `pair.source()`.
///
/// Deletion failures are collected per file in the report; any other I/O
/// failure (listing, copying, creating the target) aborts the pair.
pub fn reconcile(pair: &FolderPair, options: ReconcileOptions) -> Result<ReconcileReport, SyncError> {
    reconcile_with(pair, options, |path| fs::remove_file(path))
}

/// [`reconcile`] with the per-file removal supplied by the caller.
fn reconcile_with<F>(
    pair: &FolderPair,
    options: ReconcileOptions,
    mut remove: F,
) -> Result<ReconcileReport, SyncError>
where
    F: FnMut(&Path) -> io::Result<()>,
{
    let source = pair.source();
    let target = pair.target();

    // Step 1: target directory.
    if !options.dry_run {
        fs::create_dir_all(&target).map_err(|e| io_err(&target, e))?;
    }

    // Step 2: enumerate source files.
    let source_present = source.is_dir();
    let source_files = list_tracked(&source)?;

    let mut report = ReconcileReport {
        source_present,
        ..ReconcileReport::default()
    };

    // Step 3: upserts.
    for (name, source_file) in &source_files {
        let target_file = target.join(name);
        let display_name = name.to_string_lossy();
        match upsert(source_file, &target_file, options.dry_run)? {
            Some(kind) => report.changes.push(pair.change(kind, &display_name)),
            None => {
                tracing::debug!("unchanged: {}", target_file.display());
                report.unchanged.push(display_name.into_owned());
            }
        }
    }

    // Step 4: deletions. Runs even when the source set is empty.
    let completed_names = if options.completion_aware {
        completion_names(pair)?
    } else {
        BTreeSet::new()
    };
    for (name, target_file) in list_tracked(&target)? {
        if source_files.contains_key(&name) {
            continue;
        }
        let kind = if completed_names.contains(&name) {
            ChangeKind::CompletedTransition
        } else {
            ChangeKind::Deleted
        };
        let display_name = name.to_string_lossy();

        if options.dry_run {
            report.changes.push(pair.change(kind, &display_name));
            continue;
        }
        match remove(&target_file) {
            Ok(()) => {
                tracing::info!("{kind}: {}", target_file.display());
                report.changes.push(pair.change(kind, &display_name));
            }
            Err(err) => {
                tracing::warn!("failed to delete {}: {err}", target_file.display());
                report.failures.push(DeletionFailure {
                    file_name: display_name.into_owned(),
                    reason: err.to_string(),
                });
            }
        }
    }

    Ok(report)
}

/// Create-or-update one target file. Returns `None` when contents already match.
fn upsert(source: &Path, target: &Path, dry_run: bool) -> Result<Option<ChangeKind>, SyncError> {
    let kind = match fs::metadata(target) {
        Ok(_) => {
            if same_contents(source, target)? {
                return Ok(None);
            }
            ChangeKind::Updated
        }
        Err(err) if err.kind() == ErrorKind::NotFound => ChangeKind::Created,
        Err(err) => return Err(io_err(target, err)),
    };

    if dry_run {
        tracing::info!("[dry-run] would copy {} → {}", source.display(), target.display());
        return Ok(Some(kind));
    }

    copy_with_metadata(source, target)?;
    tracing::info!("{kind}: {}", target.display());
    Ok(Some(kind))
}

/// Copy bytes, permissions and timestamps through a `.relay.tmp` sibling so a
/// failed copy never leaves a truncated target behind.
fn copy_with_metadata(source: &Path, target: &Path) -> Result<(), SyncError> {
    let mut tmp = target.as_os_str().to_os_string();
    tmp.push(".relay.tmp");
    let tmp = PathBuf::from(tmp);
    let meta = fs::metadata(source).map_err(|e| io_err(source, e))?;

    // fs::copy carries the permission bits along with the content.
    fs::copy(source, &tmp).map_err(|e| io_err(&tmp, e))?;
    let atime = FileTime::from_last_access_time(&meta);
    let mtime = FileTime::from_last_modification_time(&meta);
    if let Err(e) = filetime::set_file_times(&tmp, atime, mtime) {
        let _ = fs::remove_file(&tmp);
        return Err(io_err(&tmp, e));
    }

    if let Err(e) = fs::rename(&tmp, target) {
        let _ = fs::remove_file(&tmp);
        return Err(io_err(target, e));
    }
    Ok(())
}

/// Byte-for-byte comparison; sizes are checked first.
fn same_contents(a: &Path, b: &Path) -> Result<bool, SyncError> {
    let len_a = fs::metadata(a).map_err(|e| io_err(a, e))?.len();
    let len_b = fs::metadata(b).map_err(|e| io_err(b, e))?.len();
    if len_a != len_b {
        return Ok(false);
    }
    let bytes_a = fs::read(a).map_err(|e| io_err(a, e))?;
    let bytes_b = fs::read(b).map_err(|e| io_err(b, e))?;
    Ok(bytes_a == bytes_b)
}

/// Names in the source-side folder a request moves into once done.
fn completion_names(pair: &FolderPair) -> Result<BTreeSet<OsString>, SyncError> {
    match pair.completion_source() {
        Some(dir) => Ok(list_tracked(&dir)?.into_keys().collect()),
        None => Ok(BTreeSet::new()),
    }
}

/// Tracked files directly inside `dir`, keyed by raw file name.
///
/// Names are kept as `OsString` so non-UTF-8 names still match across sides.
/// A missing directory lists as empty.
pub(crate) fn list_tracked(dir: &Path) -> Result<BTreeMap<OsString, PathBuf>, SyncError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
        Err(err) => return Err(io_err(dir, err)),
    };

    let mut files = BTreeMap::new();
    for entry in entries {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        let path = entry.path();
        if !path.is_file() || !is_tracked(&path) {
            continue;
        }
        files.insert(entry.file_name(), path);
    }
    Ok(files)
}

fn is_tracked(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == TRACKED_EXTENSION)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use relay_core::types::{Category, Direction, TeamName};
    use tempfile::TempDir;

    fn pair(root: &Path, category: Category) -> FolderPair {
        FolderPair::new(
            TeamName::from("Backend"),
            Direction::Outgoing,
            category,
            root.join("src"),
            root.join("dst"),
        )
    }

    fn write(dir: &Path, name: &str, content: &str) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn non_markdown_files_are_ignored_on_both_sides() {
        let tmp = TempDir::new().unwrap();
        let p = pair(tmp.path(), Category::Request);
        write(&p.source(), "notes.txt", "x");
        write(&p.target(), "keep.json", "{}");

        let report = reconcile(&p, ReconcileOptions::default()).unwrap();
        assert!(report.is_noop());
        assert!(!p.target().join("notes.txt").exists());
        assert!(p.target().join("keep.json").exists());
    }

    #[test]
    fn subdirectories_are_not_recursed() {
        let tmp = TempDir::new().unwrap();
        let p = pair(tmp.path(), Category::Request);
        write(&p.source().join("nested"), "deep.md", "x");
        write(&p.target().join("other.md"), "inner.md", "y");

        let report = reconcile(&p, ReconcileOptions::default()).unwrap();
        assert!(report.changes.is_empty());
        assert!(!p.target().join("nested").exists());
        assert!(p.target().join("other.md").join("inner.md").exists());
    }

    #[test]
    fn target_directory_is_created_without_a_change() {
        let tmp = TempDir::new().unwrap();
        let p = pair(tmp.path(), Category::Completed);
        let report = reconcile(&p, ReconcileOptions::default()).unwrap();
        assert!(p.target().is_dir());
        assert!(report.changes.is_empty());
        assert!(!report.source_present);
    }

    #[test]
    fn dry_run_reports_but_does_not_touch_disk() {
        let tmp = TempDir::new().unwrap();
        let p = pair(tmp.path(), Category::Request);
        write(&p.source(), "new.md", "n");
        write(&p.target(), "gone.md", "g");

        let options = ReconcileOptions {
            dry_run: true,
            ..ReconcileOptions::default()
        };
        let report = reconcile(&p, options).unwrap();
        let kinds: Vec<_> = report.changes.iter().map(|c| c.kind).collect();
        assert_eq!(kinds, [ChangeKind::Created, ChangeKind::Deleted]);
        assert!(!p.target().join("new.md").exists());
        assert!(p.target().join("gone.md").exists());
    }

    #[test]
    fn copy_preserves_modification_time() {
        let tmp = TempDir::new().unwrap();
        let p = pair(tmp.path(), Category::Request);
        write(&p.source(), "a.md", "A");
        let old = FileTime::from_unix_time(1_600_000_000, 0);
        filetime::set_file_mtime(p.source().join("a.md"), old).unwrap();

        reconcile(&p, ReconcileOptions::default()).unwrap();
        let meta = fs::metadata(p.target().join("a.md")).unwrap();
        assert_eq!(FileTime::from_last_modification_time(&meta), old);
        assert!(!p.target().join("a.md.relay.tmp").exists());
    }

    #[test]
    fn deletion_failure_is_recorded_and_does_not_stop_the_batch() {
        let tmp = TempDir::new().unwrap();
        let p = pair(tmp.path(), Category::Request);
        write(&p.target(), "a.md", "a");
        write(&p.target(), "b.md", "b");

        let mut attempted = Vec::new();
        let report = reconcile_with(&p, ReconcileOptions::default(), |path| {
            attempted.push(path.to_path_buf());
            if path.ends_with("a.md") {
                Err(io::Error::new(ErrorKind::PermissionDenied, "locked"))
            } else {
                fs::remove_file(path)
            }
        })
        .unwrap();

        assert_eq!(attempted.len(), 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].file_name, "a.md");
        assert!(report.failures[0].reason.contains("locked"));
        assert!(p.target().join("a.md").exists());

        assert_eq!(report.changes.len(), 1);
        assert_eq!(report.changes[0].kind, ChangeKind::Deleted);
        assert_eq!(report.changes[0].file_name, "b.md");
        assert!(!p.target().join("b.md").exists());
    }

    #[test]
    #[cfg(unix)]
    fn non_utf8_names_are_copied_and_deleted() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let tmp = TempDir::new().unwrap();
        let p = pair(tmp.path(), Category::Request);
        let fresh = OsStr::from_bytes(b"req\xff.md");
        let stale = OsStr::from_bytes(b"old\xfe.md");
        fs::create_dir_all(p.source()).unwrap();
        fs::create_dir_all(p.target()).unwrap();
        fs::write(p.source().join(fresh), "new").unwrap();
        fs::write(p.target().join(stale), "old").unwrap();

        let report = reconcile(&p, ReconcileOptions::default()).unwrap();

        assert_eq!(fs::read_to_string(p.target().join(fresh)).unwrap(), "new");
        assert!(!p.target().join(stale).exists());
        let kinds: Vec<_> = report.changes.iter().map(|c| c.kind).collect();
        assert_eq!(kinds, [ChangeKind::Created, ChangeKind::Deleted]);
        assert!(report.changes[0].file_name.starts_with("req"));
        assert!(report.failures.is_empty());

        let again = reconcile(&p, ReconcileOptions::default()).unwrap();
        assert!(again.changes.is_empty());
        assert_eq!(again.unchanged.len(), 1);
    }
}
