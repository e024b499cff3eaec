//! Shared types for filesystem change detection.

use std::path::{Path, PathBuf};
use std::time::Instant;

/// What happened to a path, after normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// The path no longer exists.
    Deleted,
    /// The path exists and was created or written.
    Modified,
}

/// A detected filesystem change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    /// Absolute path the OS reported
    pub path: PathBuf,
    /// Normalized change kind
    pub kind: ChangeKind,
    /// When the change was observed
    pub observed_at: Instant,
}

impl ChangeEvent {
    pub fn new(path: impl Into<PathBuf>, kind: ChangeKind) -> Self {
        Self {
            path: path.into(),
            kind,
            observed_at: Instant::now(),
        }
    }

    /// Create a deletion event observed now
    pub fn deleted(path: impl Into<PathBuf>) -> Self {
        Self::new(path, ChangeKind::Deleted)
    }

    /// Create a modification event observed now
    pub fn modified(path: impl Into<PathBuf>) -> Self {
        Self::new(path, ChangeKind::Modified)
    }

    /// Override the observation instant.
    pub fn observed(mut self, at: Instant) -> Self {
        self.observed_at = at;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_deletion(&self) -> bool {
        self.kind == ChangeKind::Deleted
    }

    /// Human-readable description for logging
    pub fn description(&self) -> String {
        match self.kind {
            ChangeKind::Deleted => format!("deleted: {}", self.path.display()),
            ChangeKind::Modified => format!("modified: {}", self.path.display()),
        }
    }
}
