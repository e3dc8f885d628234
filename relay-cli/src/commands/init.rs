//! `relay init`: write a starter `relay.yaml`.

use std::path::Path;

use anyhow::{Context, Result};

use relay_core::config;

pub fn run(root: &Path) -> Result<()> {
    let path = config::init_at(root)
        .with_context(|| format!("failed to init config in '{}'", root.display()))?;
    println!("✓ Wrote {}", path.display());
    println!("  Edit `teams` to change which sibling projects are synced.");
    Ok(())
}
