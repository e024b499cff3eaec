//! Event orchestration: classify, authenticate, restore.
//!
//! [`GuardOrchestrator`] implements [`crate::traits::GuardEventHandler`];
//! [`run`] feeds it from the watcher channel until shutdown.

mod monitor;
mod orchestrator;
mod state;

pub use monitor::{run, GuardMessage, MonitorStats};
pub use orchestrator::{GuardOrchestrator, HandleOutcome, IgnoreReason};
pub use state::GuardState;
