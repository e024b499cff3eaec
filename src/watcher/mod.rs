//! Filesystem change detection.
//!
//! ```text
//! notify callback ──normalize──▶ ChangeEvent ──GuardMessage::Fs──▶ monitor loop
//! ```
//!
//! The watcher only reports; it never classifies. Exclusion of editor
//! artifacts and everything after it is up to the orchestrator.

mod file_watcher;
mod filter;
mod types;

pub use file_watcher::EventWatcher;
pub use filter::{is_excluded, normalize, EXCLUDED_EXTENSIONS};
pub use types::{ChangeEvent, ChangeKind};
