//! Reference snapshots of every watched path.
//!
//! Each watched path has exactly one snapshot at `backup/<basename>`,
//! recreated wholesale at startup and on `refresh`. Restores are staged in
//! a hidden sibling and renamed into place.

mod copy;
mod store;

pub use copy::{copy_tree, remove_path};
pub use store::{
    is_staging_path, snapshot_location, BackupEntry, BackupStore, RestoreOutcome, RestoreTarget, SkipReason,
    SnapshotReport,
};
