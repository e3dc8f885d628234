//! # relay-sync
//!
//! Directory reconciliation between the frontend communication tree and the
//! sibling team projects.
//!
//! Call [`reconcile`] for a single folder pair, [`pipeline::run`] for a full
//! run over every registered team, and [`log_writer::append_at`] to persist
//! the run's changes.

pub mod change;
pub mod diff;
pub mod error;
pub mod layout;
pub mod log_writer;
pub mod pipeline;
pub mod reconcile;

pub use change::{ChangeKind, DeletionFailure, ReconcileReport, SyncChange};
pub use error::SyncError;
pub use layout::FolderPair;
pub use pipeline::{RunOptions, RunReport, TeamOutcome, TeamReport};
pub use reconcile::{reconcile, ReconcileOptions, TRACKED_EXTENSION};
