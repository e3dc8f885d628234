//! `relay sync`: reconcile every registered team and append to the run log.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Args;
use colored::Colorize;

use relay_core::{types::TeamName, RelayConfig};
use relay_sync::{
    log_writer::{self, LogOutcome},
    pipeline::{self, RunEvent, RunOptions},
    RunReport,
};

use crate::SyncModeArg;

/// Arguments for `relay sync`.
#[derive(Args, Debug, Default)]
pub struct SyncArgs {
    /// Folder-pair layout: mirror | push. Defaults to the config's mode.
    #[arg(long, value_name = "MODE")]
    pub mode: Option<SyncModeArg>,

    /// Show what would change without writing any files or the log.
    #[arg(long)]
    pub dry_run: bool,

    /// Only sync the named team (repeatable).
    #[arg(long = "team", short = 't', value_name = "NAME")]
    pub teams: Vec<String>,

    /// Append the run log here instead of the configured file.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Directory holding the sibling team projects (relative to `--root`).
    #[arg(long, value_name = "DIR")]
    pub project_root: Option<PathBuf>,
}

impl SyncArgs {
    pub fn run(self, root: &Path) -> Result<()> {
        let mut config = crate::load_config(root)?;
        if let Some(log_file) = self.log_file {
            config.log_file = log_file;
        }
        // Relative paths resolve against the communication root, as in relay.yaml.
        if let Some(project_root) = self.project_root {
            config.project_root = root.join(project_root);
        }
        let filter: Vec<TeamName> = self.teams.into_iter().map(TeamName::from).collect();
        config.registry = config
            .registry
            .filtered(&filter)
            .context("invalid --team filter")?;

        let options = RunOptions {
            mode: self.mode.map(Into::into).unwrap_or(config.mode),
            dry_run: self.dry_run,
        };

        // Keep the runtime alive for the whole run: it drives the Ctrl-C listener.
        let (_runtime, cancel) = install_interrupt_flag()?;

        print_header(&config, options);
        let report = pipeline::run_with(&config, options, &cancel, print_event);

        if report.interrupted {
            println!("\n\n{}", "⏹️  Interrupted by user; remaining teams were not synced.".yellow());
            return Ok(());
        }

        let changes = report.changes();
        if options.dry_run {
            println!("\n[dry-run] log not written ({} pending change(s))", changes.len());
        } else {
            match log_writer::append(&config.log_file, &changes).with_context(|| {
                format!("failed to write sync log '{}'", config.log_file.display())
            })? {
                LogOutcome::Appended { entries } => {
                    println!("\n📝 Log written: {}", config.log_file.display());
                    println!("📊 {entries} change(s) processed");
                }
                LogOutcome::NothingToLog => {
                    println!("\n📝 No changes; log not written.");
                }
            }
        }

        print_summary(&report, options.dry_run);
        Ok(())
    }
}

/// Spawn a Ctrl-C listener that flips the returned flag.
fn install_interrupt_flag() -> Result<(tokio::runtime::Runtime, Arc<AtomicBool>)> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .context("failed to start signal runtime")?;
    let cancel = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancel);
    runtime.spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            flag.store(true, Ordering::SeqCst);
        }
    });
    Ok((runtime, cancel))
}

fn print_header(config: &RelayConfig, options: RunOptions) {
    let prefix = if options.dry_run { "[dry-run] " } else { "" };
    let teams: Vec<_> = config.registry.iter().map(|e| e.name.0.as_str()).collect();
    println!("{prefix}🔄 Frontend ↔ team projects communication sync");
    println!("📁 Frontend path: {}", config.communication_root.display());
    println!("📁 Project root: {}", config.project_root.display());
    println!("🤝 Teams: {}", teams.join(", "));
    println!("🧭 Mode: {}", options.mode);
    println!("⏰ Time: {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
    println!("{}", "-".repeat(80));
}

fn print_event(event: RunEvent<'_>) {
    match event {
        RunEvent::TeamStarted { team } => println!("\n🏢 {team}"),
        RunEvent::TeamSkipped { project_dir, .. } => println!(
            "   {}",
            format!("⚠️  project folder not found: {}", project_dir.display()).yellow()
        ),
        RunEvent::DirectionStarted { team, direction } => {
            println!("   {} {direction} ({team})", direction.icon())
        }
        RunEvent::DirectionSkipped { missing, .. } => println!(
            "      {}",
            format!("⚠️  communication folder not found: {}", missing.display()).yellow()
        ),
        RunEvent::PairReconciled { pair, report } => {
            println!(
                "      {} {}: {} → {}",
                pair.direction.icon(),
                pair.category,
                pair.source().display(),
                pair.target().display()
            );
            if !report.source_present {
                println!("         📭 source folder missing");
            } else if report.changes.is_empty() && report.unchanged.is_empty() {
                println!("         📭 source folder empty");
            }
            for name in &report.unchanged {
                println!("         ⚪ unchanged: {name}");
            }
            for change in &report.changes {
                println!("         {change}");
            }
            for failure in &report.failures {
                println!("         {}", failure.to_string().red());
            }
        }
        RunEvent::TeamFailed { team, error } => {
            println!("   {}", format!("❌ {team}: {error}").red())
        }
        RunEvent::TeamFinished { team, changes } => {
            if changes > 0 {
                println!("   ✅ {team}: {changes} change(s)");
            } else {
                println!("   ⚪ {team}: no changes");
            }
        }
    }
}

fn print_summary(report: &RunReport, dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };
    println!("\n{}", "=".repeat(80));
    println!("{prefix}📊 Sync summary");
    println!("{}", "=".repeat(80));

    let changes = report.changes();
    if changes.is_empty() {
        println!("{}", "✅ All files are up to date.".green());
    } else {
        println!("🔄 Changes: {}", changes.len());
        for change in &changes {
            println!("   • {change}");
        }
    }

    let failures: usize = report.teams.iter().map(|t| t.failures().count()).sum();
    if failures > 0 {
        println!("{}", format!("❌ {failures} file(s) could not be deleted").red());
    }

    println!("\n⏰ Finished: {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
}
