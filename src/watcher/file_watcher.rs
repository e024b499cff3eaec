//! Native filesystem subscription using the `notify` crate.
//!
//! Directories are watched recursively. Individual files are watched through
//! their parent directory (non-recursive) so that editors replacing a file
//! via rename do not silently end the subscription; events for siblings are
//! filtered out before they reach the orchestrator.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use super::filter::normalize;
use crate::config::{PathKind, WatchedPath};
use crate::error::{GuardResult, WatchError};
use crate::guard::GuardMessage;
use crate::traits::WatchControl;

/// Stoppable, restartable watch over a fixed set of [`WatchedPath`]s.
///
/// The native watcher handle MUST be kept alive; dropping it stops watching.
/// Every (re)start bumps a generation counter, and callbacks from an older
/// generation are discarded, so nothing queued by a stopped subscription can
/// reach the orchestrator after [`EventWatcher::stop`] returns.
pub struct EventWatcher {
    watched: Vec<WatchedPath>,
    message_tx: mpsc::UnboundedSender<GuardMessage>,
    native: Option<RecommendedWatcher>,
    generation: Arc<AtomicU64>,
}

impl EventWatcher {
    pub fn new(watched: Vec<WatchedPath>, message_tx: mpsc::UnboundedSender<GuardMessage>) -> Self {
        Self {
            watched,
            message_tx,
            native: None,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn watched(&self) -> &[WatchedPath] {
        &self.watched
    }

    pub fn is_running(&self) -> bool {
        self.native.is_some()
    }

    /// Subscribe to every watched path that currently exists.
    ///
    /// Returns the number of native subscriptions made. Missing paths are
    /// skipped with a warning.
    pub fn start(&mut self) -> GuardResult<usize> {
        if self.is_running() {
            self.stop();
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let current = Arc::clone(&self.generation);
        let watched = self.watched.clone();
        let tx = self.message_tx.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: Result<notify::Event, notify::Error>| {
                if current.load(Ordering::SeqCst) != generation {
                    return;
                }
                match res {
                    Ok(event) => {
                        for change in normalize(&event) {
                            if watched.iter().any(|w| w.covers(&change.path)) {
                                tracing::trace!("Filesystem change {}", change.description());
                                let _ = tx.send(GuardMessage::Fs(change));
                            }
                        }
                    }
                    Err(e) => tracing::warn!("Watch backend error: {}", e),
                }
            },
            notify::Config::default(),
        )
        .map_err(WatchError::from)?;

        let mut subscribed = 0;
        for (path, mode) in subscriptions(&self.watched) {
            match watcher.watch(&path, mode) {
                Ok(()) => {
                    tracing::debug!("Watching {} ({:?})", path.display(), mode);
                    subscribed += 1;
                }
                Err(e) => tracing::warn!("Failed to watch {}: {}", path.display(), e),
            }
        }

        self.native = Some(watcher);
        tracing::info!("Watcher started with {} subscription(s)", subscribed);
        Ok(subscribed)
    }

    /// Release the native subscription. Safe to call when already stopped.
    pub fn stop(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if self.native.take().is_some() {
            tracing::debug!("Watcher stopped");
        }
    }
}

impl WatchControl for EventWatcher {
    fn suspend(&mut self) {
        self.stop();
    }

    fn resume(&mut self) -> GuardResult<()> {
        self.start().map(|_| ())
    }
}

impl Drop for EventWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Native subscriptions needed to cover `watched`.
///
/// Non-recursive parent watches already covered by a recursive watch are
/// folded into it.
fn subscriptions(watched: &[WatchedPath]) -> Vec<(PathBuf, RecursiveMode)> {
    let mut wanted: BTreeMap<PathBuf, RecursiveMode> = BTreeMap::new();

    for entry in watched {
        let location = entry.location();
        if location.symlink_metadata().is_err() {
            tracing::warn!("Watched path {} does not exist, skipping", location.display());
            continue;
        }
        let (path, mode) = match entry.kind() {
            PathKind::Directory => (location.to_path_buf(), RecursiveMode::Recursive),
            PathKind::File => match location.parent() {
                Some(parent) if parent.is_dir() => {
                    (parent.to_path_buf(), RecursiveMode::NonRecursive)
                }
                _ => {
                    tracing::warn!("Parent of {} is not a directory, skipping", location.display());
                    continue;
                }
            },
        };
        let slot = wanted.entry(path).or_insert(mode);
        if mode == RecursiveMode::Recursive {
            *slot = RecursiveMode::Recursive;
        }
    }

    let recursive: Vec<PathBuf> = wanted
        .iter()
        .filter(|(_, mode)| **mode == RecursiveMode::Recursive)
        .map(|(path, _)| path.clone())
        .collect();

    wanted
        .into_iter()
        .filter(|(path, mode)| {
            *mode == RecursiveMode::Recursive
                || !recursive.iter().any(|root| path.starts_with(root))
        })
        .collect()
}
