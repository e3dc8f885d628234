//! Relay: cross-project communication folder sync.
//!
//! # Usage
//!
//! ```text
//! relay                                    # full sync run with defaults
//! relay sync [--mode mirror|push] [--dry-run] [--team <name>]...
//! relay diff [--mode mirror|push] [--team <name>]...
//! relay teams
//! relay init
//! ```
//!
//! Every command accepts `--root <dir>` (the frontend communication folder,
//! default: current directory) and `-v` / `-vv` for more log output.

mod commands;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};

use commands::{diff::DiffArgs, sync::SyncArgs};
use relay_core::{config, types::SyncMode, RelayConfig};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "relay",
    version,
    about = "Sync request/response markdown folders between the frontend and sibling team projects",
    long_about = None,
)]
struct Cli {
    /// Frontend communication folder (holds `<team>/send` and `<team>/receive`).
    #[arg(long, global = true, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Reconcile every registered team (the default when no command is given).
    Sync(SyncArgs),

    /// Show unified diffs of what a sync would copy, without writing.
    Diff(DiffArgs),

    /// List registered teams and whether their project folder exists.
    Teams,

    /// Write a starter relay.yaml into the communication root.
    Init,
}

// ---------------------------------------------------------------------------
// Shared SyncMode argument, parsed from CLI strings
// ---------------------------------------------------------------------------

/// Thin wrapper so clap can parse `SyncMode` from CLI args.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncModeArg(pub SyncMode);

impl FromStr for SyncModeArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mirror" => Ok(Self(SyncMode::Mirror)),
            "push" => Ok(Self(SyncMode::Push)),
            other => Err(format!("unknown sync mode '{other}'; expected: mirror, push")),
        }
    }
}

impl fmt::Display for SyncModeArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<SyncModeArg> for SyncMode {
    fn from(m: SyncModeArg) -> Self {
        m.0
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let root = resolve_root(cli.root.as_deref())?;
    match cli.command {
        None => SyncArgs::default().run(&root),
        Some(Commands::Sync(args)) => args.run(&root),
        Some(Commands::Diff(args)) => args.run(&root),
        Some(Commands::Teams) => commands::teams::run(&root),
        Some(Commands::Init) => commands::init::run(&root),
    }
}

/// Load `relay.yaml` (or defaults) for `root`.
pub(crate) fn load_config(root: &Path) -> Result<RelayConfig> {
    let cfg = config::load_at(root)
        .with_context(|| format!("failed to load config from '{}'", root.display()))?;
    tracing::debug!(
        root = %cfg.communication_root.display(),
        project_root = %cfg.project_root.display(),
        mode = %cfg.mode,
        "config loaded"
    );
    Ok(cfg)
}

fn resolve_root(root: Option<&Path>) -> Result<PathBuf> {
    let root = match root {
        Some(path) => path.to_path_buf(),
        None => std::env::current_dir().context("could not determine current directory")?,
    };
    root.canonicalize()
        .with_context(|| format!("cannot resolve root '{}'", root.display()))
}

fn init_tracing(verbose: u8) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
