//! Error category classification for unified error handling.
//!
//! Categories decide how a failure is handled: credential and usage problems
//! abort startup, while system and watch failures during monitoring are
//! logged and the guard keeps watching the remaining paths.

/// High-level categorization of errors for handling decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Missing or malformed configuration files.
    /// Usually degrades to an empty configuration rather than failing.
    Configuration,

    /// Filesystem errors while snapshotting or restoring.
    System,

    /// Native watch subscription problems (vanished paths, backend failures).
    Watch,

    /// Credential bootstrap failures. Only fatal before monitoring starts.
    Auth,

    /// Invalid input on the command line.
    User,
}

impl ErrorCategory {
    /// Returns true if a failure in this category must abort startup.
    pub fn is_fatal_at_startup(&self) -> bool {
        matches!(self, ErrorCategory::Auth | ErrorCategory::User)
    }

    /// Returns suggested recovery actions for this category.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCategory::Configuration => {
                "Check the files in the fileguard configuration directory"
            }
            ErrorCategory::System => "Check file permissions and available disk space",
            ErrorCategory::Watch => "Make sure every watched path exists, then restart",
            ErrorCategory::Auth => "Run `fileguard set-password` to (re)create the secret",
            ErrorCategory::User => "Run `fileguard --help` for usage",
        }
    }
}
