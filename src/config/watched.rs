//! Watched path registration and the `list.txt` path list.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{GuardResult, IoResultExt, WatchError};

/// Whether a watched path is a single file or a directory tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathKind {
    File,
    Directory,
}

impl PathKind {
    /// Kind of whatever currently exists at `path`, if anything.
    pub fn of(path: &Path) -> Option<Self> {
        let meta = fs::metadata(path).ok()?;
        Some(if meta.is_dir() {
            PathKind::Directory
        } else {
            PathKind::File
        })
    }
}

/// A file or directory the guard monitors.
///
/// Immutable once registered: the kind is decided at registration time and
/// does not change even if the live path later disappears.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WatchedPath {
    location: PathBuf,
    kind: PathKind,
}

impl WatchedPath {
    pub fn new(location: impl Into<PathBuf>, kind: PathKind) -> Self {
        Self {
            location: location.into(),
            kind,
        }
    }

    /// Register a path by inspecting the filesystem.
    ///
    /// `fallback` is consulted when the live path is missing, e.g. the kind
    /// of an existing snapshot. Returns `PathUnavailable` when neither the
    /// live path nor the fallback can tell what the path is.
    pub fn register(
        location: impl Into<PathBuf>,
        fallback: Option<PathKind>,
    ) -> Result<Self, WatchError> {
        let location = location.into();
        match PathKind::of(&location).or(fallback) {
            Some(kind) => Ok(Self { location, kind }),
            None => Err(WatchError::PathUnavailable { path: location }),
        }
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    pub fn kind(&self) -> PathKind {
        self.kind
    }

    pub fn is_dir(&self) -> bool {
        self.kind == PathKind::Directory
    }

    /// True if `path` is this watched path or lies inside it.
    pub fn covers(&self, path: &Path) -> bool {
        match self.kind {
            PathKind::File => path == self.location,
            PathKind::Directory => path.starts_with(&self.location),
        }
    }
}

/// Read the raw path list, one path per line.
///
/// Lines are trimmed and blank lines skipped. A missing file yields an empty
/// list so the guard starts with nothing to watch.
pub fn read_path_list(file: &Path) -> GuardResult<Vec<PathBuf>> {
    if !file.exists() {
        tracing::warn!("No watched path list at {}, watching nothing", file.display());
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(file).with_path(file, "read path list")?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect())
}

/// Write the path list, one path per line, replacing the previous file.
pub fn write_path_list(file: &Path, paths: &[PathBuf]) -> GuardResult<()> {
    let mut content = String::new();
    for path in paths {
        content.push_str(&path.to_string_lossy());
        content.push('\n');
    }
    fs::write(file, content).with_path(file, "write path list")
}
