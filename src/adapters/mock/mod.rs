//! Mock implementations for testing.
//!
//! These doubles let the gate, bootstrap and orchestrator run without a
//! terminal or a native watcher.
//!
//! # Available Mocks
//!
//! - [`ScriptedAuthenticator`] - Replays scripted answers in order
//! - [`RecordingNotifier`] - Records restore notices
//! - [`RecordingWatchControl`] - Counts suspend/resume calls

pub mod authenticator;
pub mod notifier;
pub mod watch;

pub use authenticator::ScriptedAuthenticator;
pub use notifier::RecordingNotifier;
pub use watch::RecordingWatchControl;
