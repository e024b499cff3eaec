//! Normalization of raw `notify` events into [`ChangeEvent`]s.

use std::path::Path;

use notify::event::{MetadataKind, ModifyKind};
use notify::{Event, EventKind};

use super::types::{ChangeEvent, ChangeKind};
use crate::config::extension_of;

/// Editor swap files and temp artifacts that never count as tampering.
pub const EXCLUDED_EXTENSIONS: &[&str] = &[".swp", ".swo", ".tmp"];

/// True if `path` carries one of the [`EXCLUDED_EXTENSIONS`].
pub fn is_excluded(path: &Path) -> bool {
    let ext = extension_of(path);
    EXCLUDED_EXTENSIONS.contains(&ext.as_str())
}

/// Convert one OS event into zero or more change events.
///
/// Create and modify map to `Modified`, remove maps to `Deleted`. A path that
/// no longer exists at this point is always reported as `Deleted`, whatever
/// the OS said. Access and access-time updates are dropped.
pub fn normalize(event: &Event) -> Vec<ChangeEvent> {
    let reported = match &event.kind {
        EventKind::Remove(_) => ChangeKind::Deleted,
        EventKind::Create(_) => ChangeKind::Modified,
        EventKind::Modify(ModifyKind::Metadata(MetadataKind::AccessTime)) => return Vec::new(),
        EventKind::Modify(_) => ChangeKind::Modified,
        EventKind::Access(_) => return Vec::new(),
        EventKind::Any | EventKind::Other => ChangeKind::Modified,
    };

    event
        .paths
        .iter()
        .map(|path| {
            let kind = if path.symlink_metadata().is_err() {
                ChangeKind::Deleted
            } else {
                reported
            };
            ChangeEvent::new(path.clone(), kind)
        })
        .collect()
}
