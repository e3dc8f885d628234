//! Run orchestration: every team × direction × category.
//!
//! The loop is strictly linear. A team whose sibling project is missing is
//! skipped, a direction whose counterpart source folder is missing is
//! skipped, and a team whose reconciliation hits an I/O error is marked
//! failed; in every case the remaining teams still run.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use relay_core::types::{Direction, SyncMode, TeamName};
use relay_core::RelayConfig;

use crate::change::{DeletionFailure, ReconcileReport, SyncChange};
use crate::layout::{plan_direction, FolderPair, Side};
use crate::reconcile::{reconcile, ReconcileOptions};

/// Per-run knobs; `mode` defaults to the config's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    pub mode: SyncMode,
    pub dry_run: bool,
}

impl RunOptions {
    pub fn from_config(config: &RelayConfig) -> Self {
        Self {
            mode: config.mode,
            dry_run: false,
        }
    }
}

/// Result of one reconciled folder pair.
#[derive(Debug, Clone)]
pub struct PairReport {
    pub pair: FolderPair,
    pub report: ReconcileReport,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeamOutcome {
    /// Every planned direction ran (some may have been skipped).
    Synced,
    /// The mapped sibling project directory does not exist.
    SkippedMissingProject,
    /// A reconciliation call failed; later pairs for this team did not run.
    Failed { error: String },
    /// The run was interrupted before this team finished.
    Interrupted,
}

/// Everything that happened for one team.
#[derive(Debug, Clone)]
pub struct TeamReport {
    pub team: TeamName,
    pub project_dir: PathBuf,
    pub outcome: TeamOutcome,
    pub pairs: Vec<PairReport>,
    /// Directions skipped because their counterpart source folder is missing.
    pub skipped_directions: Vec<(Direction, PathBuf)>,
}

impl TeamReport {
    pub fn changes(&self) -> impl Iterator<Item = &SyncChange> {
        self.pairs.iter().flat_map(|p| p.report.changes.iter())
    }

    pub fn failures(&self) -> impl Iterator<Item = &DeletionFailure> {
        self.pairs.iter().flat_map(|p| p.report.failures.iter())
    }
}

/// Outcome of a full run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub teams: Vec<TeamReport>,
    pub interrupted: bool,
}

impl RunReport {
    /// All changes of the run, in the order they were applied.
    pub fn changes(&self) -> Vec<SyncChange> {
        self.teams.iter().flat_map(|t| t.changes().cloned()).collect()
    }

    pub fn change_count(&self) -> usize {
        self.teams.iter().map(|t| t.changes().count()).sum()
    }
}

/// Progress notifications emitted while a run is in flight.
#[derive(Debug)]
pub enum RunEvent<'a> {
    TeamStarted { team: &'a TeamName },
    TeamSkipped { team: &'a TeamName, project_dir: &'a PathBuf },
    DirectionStarted { team: &'a TeamName, direction: Direction },
    DirectionSkipped { team: &'a TeamName, direction: Direction, missing: &'a PathBuf },
    PairReconciled { pair: &'a FolderPair, report: &'a ReconcileReport },
    TeamFailed { team: &'a TeamName, error: &'a str },
    TeamFinished { team: &'a TeamName, changes: usize },
}

/// Run without progress reporting.
pub fn run(config: &RelayConfig, options: RunOptions, cancel: &AtomicBool) -> RunReport {
    run_with(config, options, cancel, |_| {})
}

/// Reconcile every registered team, calling `on_event` as work progresses.
///
/// `cancel` is checked before each reconciliation call; once set, the run
/// stops and the report is flagged `interrupted`.
pub fn run_with<F>(
    config: &RelayConfig,
    options: RunOptions,
    cancel: &AtomicBool,
    mut on_event: F,
) -> RunReport
where
    F: FnMut(RunEvent<'_>),
{
    let reconcile_options = ReconcileOptions {
        dry_run: options.dry_run,
        completion_aware: options.mode.completion_aware(),
    };
    let mut run = RunReport::default();

    for entry in config.registry.iter() {
        let team = &entry.name;
        let project_dir = config.project_root.join(&entry.project.0);
        on_event(RunEvent::TeamStarted { team });

        let mut report = TeamReport {
            team: team.clone(),
            project_dir: project_dir.clone(),
            outcome: TeamOutcome::Synced,
            pairs: Vec::new(),
            skipped_directions: Vec::new(),
        };

        if !project_dir.is_dir() {
            tracing::warn!(
                "skipping team {team}: project folder {} not found",
                project_dir.display()
            );
            on_event(RunEvent::TeamSkipped {
                team,
                project_dir: &project_dir,
            });
            report.outcome = TeamOutcome::SkippedMissingProject;
            run.teams.push(report);
            continue;
        }

        'directions: for direction in Direction::all() {
            let plan = plan_direction(
                options.mode,
                *direction,
                &config.communication_root,
                team,
                &project_dir,
            );
            on_event(RunEvent::DirectionStarted {
                team,
                direction: *direction,
            });

            if plan.source_side == Side::Counterpart && !plan.source_base.is_dir() {
                tracing::warn!(
                    "skipping {direction} sync for {team}: {} not found",
                    plan.source_base.display()
                );
                on_event(RunEvent::DirectionSkipped {
                    team,
                    direction: *direction,
                    missing: &plan.source_base,
                });
                report
                    .skipped_directions
                    .push((*direction, plan.source_base.clone()));
                continue;
            }

            for pair in plan.pairs(team) {
                if cancel.load(Ordering::SeqCst) {
                    report.outcome = TeamOutcome::Interrupted;
                    run.interrupted = true;
                    break 'directions;
                }
                match reconcile(&pair, reconcile_options) {
                    Ok(pair_report) => {
                        on_event(RunEvent::PairReconciled {
                            pair: &pair,
                            report: &pair_report,
                        });
                        report.pairs.push(PairReport {
                            pair,
                            report: pair_report,
                        });
                    }
                    Err(err) => {
                        let error = err.to_string();
                        tracing::error!("sync failed for team {team}: {error}");
                        on_event(RunEvent::TeamFailed {
                            team,
                            error: &error,
                        });
                        report.outcome = TeamOutcome::Failed { error };
                        break 'directions;
                    }
                }
            }
        }

        let changes = report.changes().count();
        let interrupted = report.outcome == TeamOutcome::Interrupted;
        if !interrupted {
            on_event(RunEvent::TeamFinished { team, changes });
        }
        run.teams.push(report);
        if interrupted {
            break;
        }
    }

    run
}
