//! Append-only run log.
//!
//! Each run with at least one change appends one block:
//!
//! ```text
//!
//! ========================================
//! Cross-project sync run: 2026-10-19 09:30:00
//! ========================================
//! 1. 🆕 [Backend] outgoing Request new file: a.md
//! Total: 1 change(s) processed
//! ```

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Local};

use crate::change::SyncChange;
use crate::error::{io_err, SyncError};

const RULE: &str = "========================================";

/// What [`append_at`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutcome {
    Appended { entries: usize },
    NothingToLog,
}

/// Render the block for one run.
pub fn format_entry(changes: &[SyncChange], at: DateTime<Local>) -> String {
    let mut out = format!(
        "\n{RULE}\nCross-project sync run: {}\n{RULE}\n",
        at.format("%Y-%m-%d %H:%M:%S")
    );
    for (i, change) in changes.iter().enumerate() {
        out.push_str(&format!("{}. {change}\n", i + 1));
    }
    out.push_str(&format!("Total: {} change(s) processed\n", changes.len()));
    out
}

/// Append the run's changes to `log_file`, stamped with `at`.
///
/// No-op when `changes` is empty. Open and write failures are returned to
/// the caller; they are fatal for the run.
pub fn append_at(
    log_file: &Path,
    changes: &[SyncChange],
    at: DateTime<Local>,
) -> Result<LogOutcome, SyncError> {
    if changes.is_empty() {
        tracing::debug!("no changes; {} left untouched", log_file.display());
        return Ok(LogOutcome::NothingToLog);
    }

    if let Some(parent) = log_file.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
        }
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .map_err(|e| io_err(log_file, e))?;
    file.write_all(format_entry(changes, at).as_bytes())
        .map_err(|e| io_err(log_file, e))?;

    tracing::info!("appended {} change(s) to {}", changes.len(), log_file.display());
    Ok(LogOutcome::Appended {
        entries: changes.len(),
    })
}

/// `append_at` stamped with the current local time.
pub fn append(log_file: &Path, changes: &[SyncChange]) -> Result<LogOutcome, SyncError> {
    append_at(log_file, changes, Local::now())
}
