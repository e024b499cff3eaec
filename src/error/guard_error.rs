//! Unified error type for fileguard.

use std::fmt;

use super::category::ErrorCategory;
use super::config::{ConfigError, CredentialError, WatchError};
use super::system::{classify_io_error, SystemError};

/// Unified error type.
///
/// Every fallible operation in the crate returns [`GuardError`] through
/// [`GuardResult`](super::GuardResult), so the monitor can decide from the
/// category alone whether to abort or keep watching.
#[derive(Debug)]
pub enum GuardError {
    /// Configuration directory problems.
    Config(ConfigError),

    /// Stored secret problems.
    Credential(CredentialError),

    /// Filesystem errors (snapshot, restore).
    System(SystemError),

    /// Native watch subscription errors.
    Watch(WatchError),

    /// Invalid command line.
    Usage { message: String },
}

impl GuardError {
    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            GuardError::Config(_) => ErrorCategory::Configuration,
            GuardError::Credential(_) => ErrorCategory::Auth,
            GuardError::System(_) => ErrorCategory::System,
            GuardError::Watch(_) => ErrorCategory::Watch,
            GuardError::Usage { .. } => ErrorCategory::User,
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            GuardError::System(err) => err.user_message(),
            GuardError::Usage { message } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            GuardError::Config(err) => err.error_code(),
            GuardError::Credential(err) => err.error_code(),
            GuardError::System(err) => err.error_code(),
            GuardError::Watch(err) => err.error_code(),
            GuardError::Usage { .. } => "E_USAGE",
        }
    }

    /// Get the recovery hint for this error.
    pub fn recovery_hint(&self) -> &'static str {
        self.category().recovery_hint()
    }

    /// Build a usage error.
    pub fn usage(message: impl Into<String>) -> Self {
        GuardError::Usage {
            message: message.into(),
        }
    }
}

impl fmt::Display for GuardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuardError::Config(err) => write!(f, "{}", err),
            GuardError::Credential(err) => write!(f, "{}", err),
            GuardError::System(err) => write!(f, "{}", err),
            GuardError::Watch(err) => write!(f, "{}", err),
            GuardError::Usage { message } => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for GuardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GuardError::Config(err) => Some(err),
            GuardError::Credential(err) => Some(err),
            GuardError::System(err) => Some(err),
            GuardError::Watch(err) => Some(err),
            GuardError::Usage { .. } => None,
        }
    }
}

// ============================================================================
// From implementations for automatic error conversion
// ============================================================================

impl From<ConfigError> for GuardError {
    fn from(err: ConfigError) -> Self {
        GuardError::Config(err)
    }
}

impl From<CredentialError> for GuardError {
    fn from(err: CredentialError) -> Self {
        GuardError::Credential(err)
    }
}

impl From<SystemError> for GuardError {
    fn from(err: SystemError) -> Self {
        GuardError::System(err)
    }
}

impl From<WatchError> for GuardError {
    fn from(err: WatchError) -> Self {
        GuardError::Watch(err)
    }
}

impl From<notify::Error> for GuardError {
    fn from(err: notify::Error) -> Self {
        GuardError::Watch(WatchError::Backend(err))
    }
}

impl From<std::io::Error> for GuardError {
    fn from(err: std::io::Error) -> Self {
        GuardError::System(classify_io_error(err, None, "I/O operation"))
    }
}
