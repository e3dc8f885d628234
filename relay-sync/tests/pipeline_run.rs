//! Full runs over a fake frontend + sibling project tree.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;

use relay_core::{
    types::{SyncMode, TeamEntry},
    RelayConfig, TeamRegistry,
};
use relay_sync::{
    log_writer::{self, LogOutcome},
    pipeline::{self, RunOptions},
    ChangeKind, TeamOutcome,
};
use tempfile::TempDir;

struct Workspace {
    _tmp: TempDir,
    config: RelayConfig,
}

impl Workspace {
    /// `<tmp>/booster-frontend/Communication` as the root, siblings in `<tmp>`.
    fn new(teams: &[(&str, &str)]) -> Self {
        let tmp = TempDir::new().expect("tmp");
        let root = tmp.path().join("booster-frontend").join("Communication");
        fs::create_dir_all(&root).expect("mkdir root");
        let mut config = RelayConfig::defaults_at(&root);
        config.registry = TeamRegistry::new(
            teams
                .iter()
                .map(|(name, project)| TeamEntry::new(*name, *project))
                .collect(),
        )
        .expect("registry");
        Self { _tmp: tmp, config }
    }

    fn frontend(&self, rel: &str) -> PathBuf {
        self.config.communication_root.join(rel)
    }

    fn sibling(&self, project: &str, rel: &str) -> PathBuf {
        self.config
            .project_root
            .join(project)
            .join("Communication")
            .join("Frontend")
            .join(rel)
    }

    fn add_project(&self, project: &str) {
        fs::create_dir_all(self.sibling(project, "receive")).expect("mkdir sibling");
    }

    fn run(&self, mode: SyncMode) -> relay_sync::RunReport {
        let options = RunOptions {
            mode,
            dry_run: false,
        };
        pipeline::run(&self.config, options, &AtomicBool::new(false))
    }
}

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    fs::write(path, content).expect("write");
}

#[test]
fn mirror_run_moves_files_both_ways() {
    let ws = Workspace::new(&[("Backend", "booster-backend")]);
    ws.add_project("booster-backend");
    write(&ws.frontend("Backend/receive/Request/need-api.md"), "please");
    write(
        &ws.sibling("booster-backend", "receive/Completed/done.md"),
        "shipped",
    );

    let report = ws.run(SyncMode::Mirror);
    assert_eq!(report.change_count(), 2);
    assert_eq!(
        fs::read_to_string(ws.sibling("booster-backend", "send/Request/need-api.md"))
            .expect("outgoing copy"),
        "please"
    );
    assert_eq!(
        fs::read_to_string(ws.frontend("Backend/send/Completed/done.md")).expect("incoming copy"),
        "shipped"
    );

    let again = ws.run(SyncMode::Mirror);
    assert_eq!(again.change_count(), 0, "second run must be a no-op");
}

#[test]
fn missing_sibling_project_is_skipped_without_error() {
    let ws = Workspace::new(&[
        ("Backend", "booster-backend"),
        ("Infra", "booster-infra"),
    ]);
    ws.add_project("booster-infra");
    write(&ws.frontend("Backend/receive/Request/a.md"), "a");
    write(&ws.frontend("Infra/receive/Request/b.md"), "b");

    let report = ws.run(SyncMode::Mirror);
    assert_eq!(report.teams.len(), 2);
    assert_eq!(report.teams[0].outcome, TeamOutcome::SkippedMissingProject);
    assert_eq!(report.teams[0].changes().count(), 0);
    assert!(!ws.config.project_root.join("booster-backend").exists());

    assert_eq!(report.teams[1].outcome, TeamOutcome::Synced);
    assert_eq!(report.teams[1].changes().count(), 1);
}

#[test]
fn push_run_relabels_completed_requests() {
    let ws = Workspace::new(&[("Pipeline", "booster-pipeline")]);
    ws.add_project("booster-pipeline");
    // The counterpart still shows the request as open.
    write(
        &ws.sibling("booster-pipeline", "receive/Request/etl.md"),
        "open",
    );
    // On the frontend it has moved to Completed.
    write(&ws.frontend("Pipeline/send/Completed/etl.md"), "done");
    fs::create_dir_all(ws.frontend("Pipeline/send/Request")).expect("mkdir");

    let report = ws.run(SyncMode::Push);
    let changes = report.changes();
    let kinds: Vec<_> = changes.iter().map(|c| (c.category, c.kind)).collect();
    assert!(kinds.contains(&(relay_core::Category::Request, ChangeKind::CompletedTransition)));
    assert!(kinds.contains(&(relay_core::Category::Completed, ChangeKind::Created)));
    assert!(!ws
        .sibling("booster-pipeline", "receive/Request/etl.md")
        .exists());
    assert!(ws
        .sibling("booster-pipeline", "receive/Completed/etl.md")
        .exists());
}

#[test]
fn push_run_never_writes_to_the_frontend() {
    let ws = Workspace::new(&[("Manage", "booster-manage")]);
    ws.add_project("booster-manage");
    write(&ws.sibling("booster-manage", "send/Request/theirs.md"), "x");

    ws.run(SyncMode::Push);
    assert!(!ws.frontend("Manage/send").exists());
    assert!(!ws.frontend("Manage/receive/Request/theirs.md").exists());
    // The frontend's (empty) receive side is authoritative over their send side.
    assert!(!ws.sibling("booster-manage", "send/Request/theirs.md").exists());
}

#[test]
fn dry_run_reports_changes_and_writes_nothing() {
    let ws = Workspace::new(&[("Analysis", "booster-analysis")]);
    ws.add_project("booster-analysis");
    write(&ws.frontend("Analysis/receive/Request/q.md"), "q");

    let options = RunOptions {
        mode: SyncMode::Mirror,
        dry_run: true,
    };
    let report = pipeline::run(&ws.config, options, &AtomicBool::new(false));
    assert_eq!(report.change_count(), 1);
    assert!(!ws.sibling("booster-analysis", "send").exists());
    assert!(!ws.frontend("Analysis/send").exists());
}

#[test]
fn run_changes_land_in_the_log_in_order() {
    let ws = Workspace::new(&[("Backend", "booster-backend")]);
    ws.add_project("booster-backend");
    write(&ws.frontend("Backend/receive/Request/1.md"), "1");
    write(&ws.frontend("Backend/receive/Completed/2.md"), "2");

    let report = ws.run(SyncMode::Mirror);
    let changes = report.changes();
    let outcome = log_writer::append(&ws.config.log_file, &changes).expect("log");
    assert_eq!(outcome, LogOutcome::Appended { entries: 2 });

    let text = fs::read_to_string(&ws.config.log_file).expect("read log");
    let first = text.find("1. ").expect("first entry");
    let second = text.find("2. ").expect("second entry");
    assert!(first < second);
    assert!(text.contains("Request new file: 1.md"));
    assert!(text.contains("Completed new file: 2.md"));
    assert!(text.contains("Total: 2 change(s) processed"));

    let quiet = ws.run(SyncMode::Mirror);
    let outcome = log_writer::append(&ws.config.log_file, &quiet.changes()).expect("log");
    assert_eq!(outcome, LogOutcome::NothingToLog);
}
