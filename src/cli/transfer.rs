//! Export, import and reset commands

use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::Utc;

use questlog::domain::Clock;
use questlog::progression::{self, Transition};
use questlog::store::{export_state, import_state};

use super::Session;

pub fn export_command(session: &Session, path: Option<&Path>) -> Result<()> {
    let state = session.load();
    let json = export_state(&state, Utc::now()).context("Failed to serialize snapshot")?;

    match path {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Exported to {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

pub async fn import_command(session: &Session, path: &Path) -> Result<()> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let patch = import_state(&json, session.clock.today())
        .with_context(|| format!("Invalid snapshot: {}", path.display()))?;

    if patch.is_empty() {
        bail!("Snapshot {} contains no recognizable progress", path.display());
    }

    let current = session.load();
    let imported = patch.apply_to(&current);
    // Roll the imported dailies forward so the first command after import sees today
    let transition: Transition = progression::reducer::tick(&imported, session.clock.moment());
    session.commit(&transition).await;

    println!(
        "Imported {}: level {}, {} XP",
        path.display(),
        transition.state.level,
        transition.state.total_xp
    );
    Ok(())
}

pub fn reset_command(session: &Session, yes: bool) -> Result<()> {
    if !yes {
        bail!("This deletes all progress. Re-run with --yes to confirm.");
    }
    session.store.reset();
    println!("Progress reset.");
    Ok(())
}
