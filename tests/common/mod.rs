//! Common test utilities for integration tests.
//!
//! [`GuardFixture`] lays out a scratch configuration directory and live
//! tree, snapshots it and builds a [`GuardOrchestrator`] wired to recording
//! test doubles.
//!
//! # Example
//!
//! ```ignore
//! let mut fx = GuardFixture::new()
//!     .file("notes.txt", "hello")
//!     .threshold(".txt", 5)
//!     .build(ScriptedAuthenticator::new());
//! ```

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;
use walkdir::WalkDir;

use fileguard::adapters::mock::{RecordingNotifier, RecordingWatchControl, ScriptedAuthenticator};
use fileguard::backup::BackupStore;
use fileguard::config::{ConfigLayout, GuardConfig, PathKind, ThresholdPolicy, WatchedPath};
use fileguard::credential::Secret;
use fileguard::gate::AuthGate;
use fileguard::guard::GuardOrchestrator;

/// The secret every fixture is guarded with.
pub const SECRET: &str = "12345";

/// Authenticator that answers wrong `n` times.
pub fn wrong_answers(n: usize) -> ScriptedAuthenticator {
    (0..n).fold(ScriptedAuthenticator::new(), |auth, i| {
        auth.then_credential(&format!("wrong-{}", i))
    })
}

/// Builder for a snapshotted live tree plus configuration directory.
pub struct GuardFixture {
    temp: TempDir,
    watched: Vec<WatchedPath>,
    policy: ThresholdPolicy,
}

impl GuardFixture {
    pub fn new() -> Self {
        Self {
            temp: TempDir::new().expect("temp dir"),
            watched: Vec::new(),
            policy: ThresholdPolicy::default(),
        }
    }

    pub fn live_root(&self) -> PathBuf {
        self.temp.path().join("live")
    }

    /// Create and watch a file under the live root.
    pub fn file(mut self, name: &str, content: impl AsRef<[u8]>) -> Self {
        let path = self.live_root().join(name);
        write_file(&path, content.as_ref());
        self.watched.push(WatchedPath::new(path, PathKind::File));
        self
    }

    /// Create and watch a directory populated with `files` (relative paths).
    pub fn dir(mut self, name: &str, files: &[(&str, &str)]) -> Self {
        let root = self.live_root().join(name);
        fs::create_dir_all(&root).expect("create dir");
        for (rel, content) in files {
            write_file(&root.join(rel), content.as_bytes());
        }
        self.watched.push(WatchedPath::new(root, PathKind::Directory));
        self
    }

    pub fn threshold(mut self, ext: &str, threshold: u64) -> Self {
        self.policy = self.policy.with_threshold(ext, threshold);
        self
    }

    /// Snapshot everything and build the orchestrator.
    pub fn build(self, auth: ScriptedAuthenticator) -> BuiltGuard {
        let layout = ConfigLayout::new(self.temp.path().join("cfg"));
        layout.ensure_dirs().expect("config dirs");

        let mut store = BackupStore::new(layout.backup_root()).with_exclude(layout.root());
        let report = store.snapshot_all(&self.watched).expect("snapshot");
        assert!(report.is_clean(), "fixture snapshot failed");

        let config = GuardConfig {
            layout: layout.clone(),
            watched: self.watched.clone(),
            policy: self.policy,
        };
        let auth = Arc::new(auth);
        let gate = AuthGate::new(auth.clone(), Secret::Plain(SECRET.to_string()));
        let notifier = RecordingNotifier::new();
        let guard = GuardOrchestrator::new(config, store, gate, Arc::new(notifier.clone()));

        BuiltGuard {
            root: self.temp.path().join("live"),
            watched: self.watched,
            layout,
            guard,
            auth,
            notifier,
            watch: RecordingWatchControl::new(),
            _temp: self.temp,
        }
    }
}

impl Default for GuardFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// A ready orchestrator and the doubles it talks to.
pub struct BuiltGuard {
    pub root: PathBuf,
    pub watched: Vec<WatchedPath>,
    pub layout: ConfigLayout,
    pub guard: GuardOrchestrator,
    pub auth: Arc<ScriptedAuthenticator>,
    pub notifier: RecordingNotifier,
    pub watch: RecordingWatchControl,
    _temp: TempDir,
}

impl BuiltGuard {
    pub fn path(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    pub fn snapshot_of(&self, rel: &str) -> PathBuf {
        self.layout.backup_root().join(rel)
    }
}

pub fn write_file(path: &Path, content: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent");
    }
    fs::write(path, content).expect("write file");
}

/// Relative path and file content (`None` for directories) under `root`,
/// sorted.
pub fn tree_contents(root: &Path) -> Vec<(PathBuf, Option<Vec<u8>>)> {
    let mut entries: Vec<_> = WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .map(|e| e.expect("walk"))
        .map(|e| {
            let rel = e.path().strip_prefix(root).expect("prefix").to_path_buf();
            let content = e
                .file_type()
                .is_file()
                .then(|| fs::read(e.path()).expect("read"));
            (rel, content)
        })
        .collect();
    entries.sort();
    entries
}

/// True if both trees hold the same directories and byte-identical files.
pub fn trees_identical(a: &Path, b: &Path) -> bool {
    tree_contents(a) == tree_contents(b)
}
