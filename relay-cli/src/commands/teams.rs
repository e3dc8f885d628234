//! `relay teams`: registry listing with project folder presence.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use relay_sync::layout::counterpart_root;

#[derive(Tabled)]
struct TeamRow {
    #[tabled(rename = "team")]
    team: String,
    #[tabled(rename = "project")]
    project: String,
    #[tabled(rename = "project folder")]
    folder: String,
    #[tabled(rename = "communication folder")]
    communication: String,
}

pub fn run(root: &Path) -> Result<()> {
    let config = crate::load_config(root)?;

    println!(
        "Relay v{} | {} teams | mode {} | project root {}",
        env!("CARGO_PKG_VERSION"),
        config.registry.len(),
        config.mode,
        config.project_root.display(),
    );

    if config.registry.is_empty() {
        println!("No teams registered.");
        return Ok(());
    }

    let rows: Vec<TeamRow> = config
        .registry
        .iter()
        .map(|entry| {
            let project_dir = config.project_root.join(&entry.project.0);
            TeamRow {
                team: entry.name.0.clone(),
                project: entry.project.0.clone(),
                folder: presence(project_dir.is_dir()),
                communication: presence(counterpart_root(&project_dir).is_dir()),
            }
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
    Ok(())
}

fn presence(exists: bool) -> String {
    if exists {
        "■ present".green().to_string()
    } else {
        "■ missing".yellow().to_string()
    }
}
