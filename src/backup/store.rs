//! Snapshot tree ownership: create, resolve and restore backups.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::copy::{copy_tree, remove_path};
use crate::config::{PathKind, WatchedPath};
use crate::error::{GuardError, GuardResult, IoResultExt, SystemError};

/// Suffix of the hidden sibling a restore is staged into before renaming.
const STAGING_SUFFIX: &str = "fileguard-restore";

/// Snapshot location of `path` under `backup_root`: `backup_root/basename`.
///
/// Two watched paths sharing a basename alias to the same snapshot. Returns
/// `None` for paths without a final component (such as `/`).
pub fn snapshot_location(backup_root: &Path, path: &Path) -> Option<PathBuf> {
    path.file_name().map(|name| backup_root.join(name))
}

/// The last-known-good copy of one watched path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupEntry {
    source: WatchedPath,
    snapshot: PathBuf,
}

impl BackupEntry {
    pub fn source(&self) -> &WatchedPath {
        &self.source
    }

    pub fn snapshot(&self) -> &Path {
        &self.snapshot
    }

    /// True if the snapshot currently exists on disk.
    pub fn exists(&self) -> bool {
        fs::symlink_metadata(&self.snapshot).is_ok()
    }
}

/// A concrete live path and the snapshot path it restores from.
///
/// For a path inside a watched directory the snapshot is the matching path
/// inside that directory's snapshot tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreTarget {
    pub live: PathBuf,
    pub snapshot: PathBuf,
}

/// Why a restore did not write anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// A plain restore never overwrites a file that is still present.
    LivePresent,
    /// There is no snapshot to restore from.
    SnapshotMissing,
    /// The live file's parent directory is gone.
    ParentMissing,
}

/// Result of a restore attempt that did not fail with an I/O error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    Restored { kind: PathKind },
    Skipped(SkipReason),
}

impl RestoreOutcome {
    pub fn is_restored(&self) -> bool {
        matches!(self, RestoreOutcome::Restored { .. })
    }
}

/// Per-path results of [`BackupStore::snapshot_all`].
#[derive(Debug, Default)]
pub struct SnapshotReport {
    pub created: Vec<PathBuf>,
    /// Live path missing at snapshot time; any older snapshot is kept.
    pub skipped: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, GuardError)>,
}

impl SnapshotReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.failed.is_empty()
    }
}

/// Owns the on-disk snapshot tree and one [`BackupEntry`] per watched path.
#[derive(Debug)]
pub struct BackupStore {
    root: PathBuf,
    exclude: Option<PathBuf>,
    entries: HashMap<PathBuf, BackupEntry>,
}

impl BackupStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            exclude: None,
            entries: HashMap::new(),
        }
    }

    /// Never copy anything under `path` into a snapshot. Used to keep the
    /// configuration directory out of snapshots of an enclosing directory.
    pub fn with_exclude(mut self, path: impl Into<PathBuf>) -> Self {
        self.exclude = Some(path.into());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Entry for the watched path at `location`.
    pub fn entry_for(&self, location: &Path) -> Option<&BackupEntry> {
        self.entries.get(location)
    }

    pub fn entries(&self) -> impl Iterator<Item = &BackupEntry> {
        self.entries.values()
    }

    /// Snapshot every watched path, overwriting existing snapshots.
    ///
    /// Failures are collected per path; one unreadable path does not stop
    /// the others from being snapshotted.
    pub fn snapshot_all(&mut self, paths: &[WatchedPath]) -> GuardResult<SnapshotReport> {
        fs::create_dir_all(&self.root).with_path(&self.root, "create backup dir")?;

        let mut report = SnapshotReport::default();
        let mut seen: HashMap<PathBuf, &Path> = HashMap::new();

        for watched in paths {
            if let Some(location) = snapshot_location(&self.root, watched.location()) {
                if let Some(previous) = seen.insert(location.clone(), watched.location()) {
                    tracing::warn!(
                        "{} and {} share the snapshot {}; the later one wins",
                        previous.display(),
                        watched.location().display(),
                        location.display()
                    );
                }
            }

            match self.snapshot(watched) {
                Ok(Some(_)) => report.created.push(watched.location().to_path_buf()),
                Ok(None) => report.skipped.push(watched.location().to_path_buf()),
                Err(err) => {
                    tracing::warn!(
                        "Snapshot of {} failed: {}",
                        watched.location().display(),
                        err
                    );
                    report.failed.push((watched.location().to_path_buf(), err));
                }
            }
        }

        tracing::info!(
            "Snapshots: {} created, {} skipped, {} failed",
            report.created.len(),
            report.skipped.len(),
            report.failed.len()
        );
        Ok(report)
    }

    /// Snapshot one watched path.
    ///
    /// Returns `Ok(None)` when the live path is missing; an existing snapshot
    /// is then left in place and still registered.
    pub fn snapshot(&mut self, watched: &WatchedPath) -> GuardResult<Option<BackupEntry>> {
        let live = watched.location();
        let snapshot = snapshot_location(&self.root, live).ok_or_else(|| SystemError::IoError {
            operation: "resolve snapshot".to_string(),
            path: Some(live.to_path_buf()),
            message: "path has no file name".to_string(),
        })?;
        let entry = BackupEntry {
            source: watched.clone(),
            snapshot: snapshot.clone(),
        };

        let Some(kind) = PathKind::of(live) else {
            tracing::warn!("Cannot snapshot missing path {}", live.display());
            if entry.exists() {
                self.entries.insert(live.to_path_buf(), entry);
            }
            return Ok(None);
        };

        match kind {
            PathKind::File => {
                if snapshot.is_dir() {
                    remove_path(&snapshot)?;
                }
                fs::copy(live, &snapshot).with_path(&snapshot, "copy snapshot")?;
                tracing::info!("Backup created for file: {}", live.display());
            }
            PathKind::Directory => {
                if fs::symlink_metadata(&snapshot).is_ok() {
                    remove_path(&snapshot)?;
                    tracing::debug!("Deleted existing backup directory: {}", snapshot.display());
                }
                copy_tree(live, &snapshot, self.exclude.as_deref())?;
                tracing::info!("Backup created for directory: {}", live.display());
            }
        }

        self.entries.insert(live.to_path_buf(), entry.clone());
        Ok(Some(entry))
    }

    /// Map `path` (the watched path itself or something inside it) to its
    /// restore target. Returns `None` if `owner` has no entry.
    pub fn resolve(&self, owner: &WatchedPath, path: &Path) -> Option<RestoreTarget> {
        let entry = self.entries.get(owner.location())?;
        let relative = path.strip_prefix(owner.location()).ok()?;
        let snapshot = if relative.as_os_str().is_empty() {
            entry.snapshot.clone()
        } else {
            entry.snapshot.join(relative)
        };
        Some(RestoreTarget {
            live: path.to_path_buf(),
            snapshot,
        })
    }

    /// Restore `target` from its snapshot.
    ///
    /// Files are only written when the live file is absent, the snapshot
    /// exists and the parent directory exists; anything else is reported as
    /// [`RestoreOutcome::Skipped`]. Directories are always replaced wholesale.
    pub fn restore(&self, target: &RestoreTarget) -> GuardResult<RestoreOutcome> {
        match PathKind::of(&target.snapshot) {
            None => Ok(RestoreOutcome::Skipped(SkipReason::SnapshotMissing)),
            Some(PathKind::Directory) => self.restore_dir(target),
            Some(PathKind::File) => {
                if fs::symlink_metadata(&target.live).is_ok() {
                    return Ok(RestoreOutcome::Skipped(SkipReason::LivePresent));
                }
                if !target.live.parent().is_some_and(Path::is_dir) {
                    return Ok(RestoreOutcome::Skipped(SkipReason::ParentMissing));
                }
                self.write_file(target)
            }
        }
    }

    /// Restore `target` even if a (modified) live file is still present.
    pub fn replace(&self, target: &RestoreTarget) -> GuardResult<RestoreOutcome> {
        match PathKind::of(&target.snapshot) {
            None => Ok(RestoreOutcome::Skipped(SkipReason::SnapshotMissing)),
            Some(PathKind::Directory) => self.restore_dir(target),
            Some(PathKind::File) => {
                if !target.live.parent().is_some_and(Path::is_dir) {
                    return Ok(RestoreOutcome::Skipped(SkipReason::ParentMissing));
                }
                if target.live.is_dir() {
                    remove_path(&target.live)?;
                }
                self.write_file(target)
            }
        }
    }

    /// Stage a copy of the snapshot next to the live file, then rename it
    /// over the live path.
    fn write_file(&self, target: &RestoreTarget) -> GuardResult<RestoreOutcome> {
        let staging = staging_path(&target.live)?;
        if let Err(err) = fs::copy(&target.snapshot, &staging).with_path(&staging, "stage restore") {
            let _ = remove_path(&staging);
            return Err(err);
        }
        fs::rename(&staging, &target.live).with_path(&target.live, "restore file")?;
        tracing::info!("Restored file: {}", target.live.display());
        Ok(RestoreOutcome::Restored {
            kind: PathKind::File,
        })
    }

    fn restore_dir(&self, target: &RestoreTarget) -> GuardResult<RestoreOutcome> {
        if let Some(parent) = target.live.parent() {
            fs::create_dir_all(parent).with_path(parent, "create dir")?;
        }
        let staging = staging_path(&target.live)?;
        remove_path(&staging)?;
        if let Err(err) = copy_tree(&target.snapshot, &staging, None) {
            let _ = remove_path(&staging);
            return Err(err);
        }
        remove_path(&target.live)?;
        fs::rename(&staging, &target.live).with_path(&target.live, "restore dir")?;
        tracing::info!("Restored folder: {}", target.live.display());
        Ok(RestoreOutcome::Restored {
            kind: PathKind::Directory,
        })
    }
}

/// True if `path` is a restore staging sibling.
pub fn is_staging_path(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy())
        .is_some_and(|name| name.starts_with('.') && name.ends_with(STAGING_SUFFIX))
}

/// Hidden sibling of `live` used to stage a restore.
fn staging_path(live: &Path) -> GuardResult<PathBuf> {
    let name = live.file_name().ok_or_else(|| SystemError::IoError {
        operation: "stage restore".to_string(),
        path: Some(live.to_path_buf()),
        message: "path has no file name".to_string(),
    })?;
    let staged = format!(".{}.{}", name.to_string_lossy(), STAGING_SUFFIX);
    Ok(live.with_file_name(staged))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct Fixture {
        _temp: TempDir,
        live: PathBuf,
        store: BackupStore,
    }

    fn fixture() -> Fixture {
        let temp = TempDir::new().unwrap();
        let live = temp.path().join("live");
        fs::create_dir(&live).unwrap();
        let store = BackupStore::new(temp.path().join("backup"));
        Fixture {
            _temp: temp,
            live,
            store,
        }
    }

    #[test]
    fn test_staging_path_detection() {
        let staged = staging_path(Path::new("/srv/notes.txt")).unwrap();
        assert_eq!(staged, PathBuf::from("/srv/.notes.txt.fileguard-restore"));
        assert!(is_staging_path(&staged));
        assert!(!is_staging_path(Path::new("/srv/notes.txt")));
    }

    #[test]
    fn test_snapshot_location_uses_basename() {
        assert_eq!(
            snapshot_location(Path::new("/b"), Path::new("/x/y/notes.txt")),
            Some(PathBuf::from("/b/notes.txt"))
        );
        assert_eq!(snapshot_location(Path::new("/b"), Path::new("/")), None);
    }

    #[test]
    fn test_snapshot_file_overwrites() {
        let mut fx = fixture();
        let file = fx.live.join("a.txt");
        fs::write(&file, "v1").unwrap();
        let watched = WatchedPath::new(&file, PathKind::File);

        let entry = fx.store.snapshot(&watched).unwrap().unwrap();
        assert_eq!(fs::read_to_string(entry.snapshot()).unwrap(), "v1");

        fs::write(&file, "v2").unwrap();
        fx.store.snapshot(&watched).unwrap();
        assert_eq!(fs::read_to_string(entry.snapshot()).unwrap(), "v2");
        assert_eq!(fx.store.entries().count(), 1);
    }

    #[test]
    fn test_snapshot_directory_is_full_resync() {
        let mut fx = fixture();
        let dir = fx.live.join("site");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("old.html"), "old").unwrap();
        let watched = WatchedPath::new(&dir, PathKind::Directory);
        fx.store.snapshot(&watched).unwrap();

        fs::remove_file(dir.join("old.html")).unwrap();
        fs::write(dir.join("new.html"), "new").unwrap();
        let entry = fx.store.snapshot(&watched).unwrap().unwrap();

        assert!(!entry.snapshot().join("old.html").exists());
        assert!(entry.snapshot().join("new.html").exists());
    }

    #[test]
    fn test_snapshot_missing_live_is_skipped() {
        let mut fx = fixture();
        let watched = WatchedPath::new(fx.live.join("ghost.txt"), PathKind::File);
        let report = fx.store.snapshot_all(&[watched]).unwrap();
        assert_eq!(report.skipped.len(), 1);
        assert!(!report.is_clean());
        assert_eq!(fx.store.entries().count(), 0);
    }

    #[test]
    fn test_snapshot_all_reports_created() {
        let mut fx = fixture();
        let a = fx.live.join("a.txt");
        fs::write(&a, "a").unwrap();
        let report = fx
            .store
            .snapshot_all(&[WatchedPath::new(&a, PathKind::File)])
            .unwrap();
        assert_eq!(report.created, vec![a]);
        assert!(report.is_clean());
    }

    #[test]
    fn test_restore_file_requires_absent_live() {
        let mut fx = fixture();
        let file = fx.live.join("a.txt");
        fs::write(&file, "original").unwrap();
        let watched = WatchedPath::new(&file, PathKind::File);
        fx.store.snapshot(&watched).unwrap();

        fs::write(&file, "tampered").unwrap();
        let target = fx.store.resolve(&watched, &file).unwrap();
        assert_eq!(
            fx.store.restore(&target).unwrap(),
            RestoreOutcome::Skipped(SkipReason::LivePresent)
        );
        assert_eq!(fs::read_to_string(&file).unwrap(), "tampered");

        fs::remove_file(&file).unwrap();
        assert!(fx.store.restore(&target).unwrap().is_restored());
        assert_eq!(fs::read_to_string(&file).unwrap(), "original");
    }

    #[test]
    fn test_replace_overwrites_present_file() {
        let mut fx = fixture();
        let file = fx.live.join("a.txt");
        fs::write(&file, "original").unwrap();
        let watched = WatchedPath::new(&file, PathKind::File);
        fx.store.snapshot(&watched).unwrap();

        fs::write(&file, "tampered").unwrap();
        let target = fx.store.resolve(&watched, &file).unwrap();
        assert!(fx.store.replace(&target).unwrap().is_restored());
        assert_eq!(fs::read_to_string(&file).unwrap(), "original");

        let staging = staging_path(&file).unwrap();
        assert!(!staging.exists());
    }

    #[test]
    fn test_restore_file_parent_missing() {
        let mut fx = fixture();
        let sub = fx.live.join("sub");
        fs::create_dir(&sub).unwrap();
        let file = sub.join("a.txt");
        fs::write(&file, "x").unwrap();
        let watched = WatchedPath::new(&file, PathKind::File);
        fx.store.snapshot(&watched).unwrap();

        fs::remove_dir_all(&sub).unwrap();
        let target = fx.store.resolve(&watched, &file).unwrap();
        assert_eq!(
            fx.store.restore(&target).unwrap(),
            RestoreOutcome::Skipped(SkipReason::ParentMissing)
        );
    }

    #[test]
    fn test_restore_without_snapshot() {
        let fx = fixture();
        let target = RestoreTarget {
            live: fx.live.join("a.txt"),
            snapshot: fx.store.root().join("a.txt"),
        };
        assert_eq!(
            fx.store.restore(&target).unwrap(),
            RestoreOutcome::Skipped(SkipReason::SnapshotMissing)
        );
    }

    #[test]
    fn test_restore_directory_replaces_tree() {
        let mut fx = fixture();
        let dir = fx.live.join("site");
        fs::create_dir_all(dir.join("css")).unwrap();
        fs::write(dir.join("index.html"), "<h1>hi</h1>").unwrap();
        fs::write(dir.join("css/main.css"), "body{}").unwrap();
        let watched = WatchedPath::new(&dir, PathKind::Directory);
        fx.store.snapshot(&watched).unwrap();

        fs::write(dir.join("index.html"), "defaced").unwrap();
        fs::write(dir.join("extra.js"), "evil()").unwrap();

        let target = fx.store.resolve(&watched, &dir).unwrap();
        assert_eq!(
            fx.store.restore(&target).unwrap(),
            RestoreOutcome::Restored {
                kind: PathKind::Directory
            }
        );
        assert_eq!(fs::read_to_string(dir.join("index.html")).unwrap(), "<h1>hi</h1>");
        assert_eq!(fs::read_to_string(dir.join("css/main.css")).unwrap(), "body{}");
        assert!(!dir.join("extra.js").exists());
    }

    #[test]
    fn test_resolve_inside_directory() {
        let mut fx = fixture();
        let dir = fx.live.join("site");
        fs::create_dir_all(dir.join("css")).unwrap();
        fs::write(dir.join("css/main.css"), "body{}").unwrap();
        let watched = WatchedPath::new(&dir, PathKind::Directory);
        fx.store.snapshot(&watched).unwrap();

        let inner = dir.join("css/main.css");
        let target = fx.store.resolve(&watched, &inner).unwrap();
        assert_eq!(target.snapshot, fx.store.root().join("site/css/main.css"));

        fs::remove_file(&inner).unwrap();
        assert!(fx.store.restore(&target).unwrap().is_restored());
        assert_eq!(fs::read_to_string(&inner).unwrap(), "body{}");
    }

    #[test]
    fn test_exclude_keeps_config_out_of_snapshot() {
        let temp = TempDir::new().unwrap();
        let home = temp.path().join("home");
        let config = home.join(".fileguard");
        fs::create_dir_all(config.join("backup")).unwrap();
        fs::write(home.join("doc.txt"), "d").unwrap();

        let mut store = BackupStore::new(config.join("backup")).with_exclude(&config);
        let entry = store
            .snapshot(&WatchedPath::new(&home, PathKind::Directory))
            .unwrap()
            .unwrap();
        assert!(entry.snapshot().join("doc.txt").exists());
        assert!(!entry.snapshot().join(".fileguard").exists());
    }
}
