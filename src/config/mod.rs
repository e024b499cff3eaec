//! Configuration loaded once per monitoring session.
//!
//! [`GuardConfig`] bundles the watched paths and the threshold policy into a
//! single immutable value that is threaded into the orchestrator at
//! construction. Editing thresholds or paths writes new files; a running
//! monitor keeps the snapshot it started with.

mod layout;
mod thresholds;
mod watched;

pub use layout::{ConfigLayout, HOME_ENV};
pub use thresholds::{
    extension_of, normalize_extension, parse_threshold, ContentClass, ThresholdPolicy,
    DEFAULT_BINARY_EXTENSIONS, DEFAULT_THRESHOLD,
};
pub use watched::{read_path_list, write_path_list, PathKind, WatchedPath};

use crate::backup::snapshot_location;
use crate::error::GuardResult;

/// Immutable configuration for one monitoring session.
#[derive(Debug, Clone)]
pub struct GuardConfig {
    pub layout: ConfigLayout,
    pub watched: Vec<WatchedPath>,
    pub policy: ThresholdPolicy,
}

impl GuardConfig {
    /// Load the path list and threshold policy from `layout`.
    ///
    /// Paths that exist neither live nor as a snapshot are skipped with a
    /// warning. Duplicate entries are registered once.
    pub fn load(layout: ConfigLayout) -> GuardResult<Self> {
        let raw = read_path_list(&layout.list_file())?;
        let policy = ThresholdPolicy::load(&layout.thresholds_file())?;
        let backup_root = layout.backup_root();

        let mut watched: Vec<WatchedPath> = Vec::with_capacity(raw.len());
        for path in raw {
            let fallback = snapshot_location(&backup_root, &path)
                .as_deref()
                .and_then(PathKind::of);
            match WatchedPath::register(path, fallback) {
                Ok(entry) if watched.iter().any(|w| w.location() == entry.location()) => {
                    tracing::debug!("Duplicate watched path {}", entry.location().display());
                }
                Ok(entry) => watched.push(entry),
                Err(err) => tracing::warn!("Skipping watched path: {}", err),
            }
        }

        Ok(Self {
            layout,
            watched,
            policy,
        })
    }

    /// The watched path owning `path`, preferring the most specific match
    /// when watched directories are nested.
    pub fn owner_of(&self, path: &std::path::Path) -> Option<&WatchedPath> {
        self.watched
            .iter()
            .filter(|w| w.covers(path))
            .max_by_key(|w| w.location().components().count())
    }
}
