//! Restore notification trait abstraction.

use std::path::Path;

/// Fire-and-forget, user-visible notice that a path was restored.
///
/// Implementations must not block the event pipeline for long and must not
/// fail: delivery problems are logged by the implementation itself.
pub trait RestoreNotifier: Send + Sync {
    fn notify_restoration(&self, path: &Path);
}
