//! `fileguard refresh`: re-snapshot every watched path.

use crate::backup::{BackupStore, SnapshotReport};
use crate::config::{ConfigLayout, GuardConfig};
use crate::error::GuardResult;

/// Snapshot store for `layout`, keeping the config directory itself out
/// of directory snapshots.
pub fn backup_store(layout: &ConfigLayout) -> BackupStore {
    BackupStore::new(layout.backup_root()).with_exclude(layout.root())
}

/// Overwrite every snapshot with the current live content.
pub fn refresh_snapshots(layout: &ConfigLayout) -> GuardResult<SnapshotReport> {
    layout.ensure_dirs()?;
    let config = GuardConfig::load(layout.clone())?;
    backup_store(layout).snapshot_all(&config.watched)
}

pub fn handle_refresh_command(layout: &ConfigLayout) -> GuardResult<()> {
    let report = refresh_snapshots(layout)?;
    println!(
        "Refreshed {} snapshot(s), {} skipped, {} failed",
        report.created.len(),
        report.skipped.len(),
        report.failed.len()
    );
    for (path, err) in &report.failed {
        eprintln!("  {}: {}", path.display(), err.user_message());
    }
    Ok(())
}
