//! Recording notifier for testing.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::traits::RestoreNotifier;

/// Notifier that remembers every restored path.
///
/// Clones share the same record, so a test can keep one handle and hand the
/// other to the orchestrator.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    paths: Arc<Mutex<Vec<PathBuf>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.paths.lock().map(|p| p.len()).unwrap_or(0)
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.paths.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

impl RestoreNotifier for RecordingNotifier {
    fn notify_restoration(&self, path: &Path) {
        if let Ok(mut paths) = self.paths.lock() {
            paths.push(path.to_path_buf());
        }
    }
}
