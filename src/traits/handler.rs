//! Consumer side of the event pipeline.

use crate::guard::HandleOutcome;
use crate::traits::WatchControl;
use crate::watcher::{ChangeEvent, ChangeKind};

/// Receives normalized filesystem changes, one at a time.
///
/// Each call must fully resolve its event (classification, authentication
/// and any restore) before returning. `watch` is the subscription that
/// produced the event, handed in so a restore can suspend it.
pub trait GuardEventHandler {
    fn on_deleted(&mut self, event: &ChangeEvent, watch: &mut dyn WatchControl) -> HandleOutcome;

    fn on_modified(&mut self, event: &ChangeEvent, watch: &mut dyn WatchControl)
        -> HandleOutcome;

    /// Dispatch on the event kind.
    fn handle(&mut self, event: &ChangeEvent, watch: &mut dyn WatchControl) -> HandleOutcome {
        match event.kind {
            ChangeKind::Deleted => self.on_deleted(event, watch),
            ChangeKind::Modified => self.on_modified(event, watch),
        }
    }
}
