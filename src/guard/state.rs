//! Orchestrator state.

use std::fmt;

/// Where the orchestrator is in handling the current event.
///
/// ```text
/// Watching ─▶ Classifying ─▶ Authenticating ─▶ Restoring ─▶ Watching
///                 │                 │              │
///                 └── None ─────────┴── Granted    └─ Suspended while writing
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GuardState {
    #[default]
    Watching,
    Classifying,
    Authenticating,
    Restoring,
    /// Subscription released while a restore writes to disk.
    Suspended,
}

impl GuardState {
    pub fn as_str(&self) -> &'static str {
        match self {
            GuardState::Watching => "watching",
            GuardState::Classifying => "classifying",
            GuardState::Authenticating => "authenticating",
            GuardState::Restoring => "restoring",
            GuardState::Suspended => "suspended",
        }
    }
}

impl fmt::Display for GuardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
