//! Concrete implementations of trait abstractions.
//!
//! # Adapters
//!
//! - [`TerminalAuthenticator`] - Hidden-input password prompt on the controlling terminal
//! - [`DesktopNotifier`] - Restore notice on stderr plus a native banner where available
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides test doubles:
//! - [`mock::ScriptedAuthenticator`] - Replays a fixed list of answers
//! - [`mock::RecordingNotifier`] - Records every restore notice
//! - [`mock::RecordingWatchControl`] - Counts suspend/resume calls

pub mod desktop_notifier;
pub mod mock;
pub mod terminal_auth;

pub use desktop_notifier::DesktopNotifier;
pub use mock::{RecordingNotifier, RecordingWatchControl, ScriptedAuthenticator};
pub use terminal_auth::TerminalAuthenticator;
