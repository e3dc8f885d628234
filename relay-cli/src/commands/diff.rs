//! `relay diff`: show unified diffs for what sync would copy.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use relay_core::types::TeamName;
use relay_sync::{diff::diff_run, ChangeKind};

use crate::SyncModeArg;

/// Arguments for `relay diff`.
#[derive(Args, Debug)]
pub struct DiffArgs {
    /// Folder-pair layout: mirror | push. Defaults to the config's mode.
    #[arg(long, value_name = "MODE")]
    pub mode: Option<SyncModeArg>,

    /// Only diff the named team (repeatable).
    #[arg(long = "team", short = 't', value_name = "NAME")]
    pub teams: Vec<String>,
}

impl DiffArgs {
    pub fn run(self, root: &Path) -> Result<()> {
        let mut config = crate::load_config(root)?;
        let filter: Vec<TeamName> = self.teams.into_iter().map(TeamName::from).collect();
        config.registry = config
            .registry
            .filtered(&filter)
            .context("invalid --team filter")?;
        let mode = self.mode.map(Into::into).unwrap_or(config.mode);

        let diffs = diff_run(&config, mode).context("diff failed")?;
        if diffs.is_empty() {
            println!("No pending changes.");
            return Ok(());
        }

        for diff in diffs {
            match diff.kind {
                ChangeKind::Deleted | ChangeKind::CompletedTransition => {
                    println!(
                        "[{}] {} {}: {}",
                        diff.team,
                        diff.direction,
                        diff.kind,
                        diff.target.display()
                    );
                }
                ChangeKind::Created | ChangeKind::Updated => {
                    print!("{}", diff.unified_diff);
                    if !diff.unified_diff.ends_with('\n') {
                        println!();
                    }
                }
            }
        }

        Ok(())
    }
}
