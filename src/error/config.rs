//! Configuration, credential and watch subscription error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors while reading or writing the configuration directory.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The threshold policy file exists but could not be parsed.
    #[error("Invalid threshold policy in {}: {message}", path.display())]
    InvalidThresholds { path: PathBuf, message: String },

    /// A threshold given on the command line is not a non-negative integer.
    #[error("Invalid threshold value '{value}': expected a non-negative integer")]
    InvalidThresholdValue { value: String },

    /// Serializing the threshold policy failed.
    #[error("Failed to serialize threshold policy: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ConfigError {
    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            ConfigError::InvalidThresholds { .. } => "E_CFG_THRESHOLDS",
            ConfigError::InvalidThresholdValue { .. } => "E_CFG_THRESHOLD_VALUE",
            ConfigError::Serialize(_) => "E_CFG_SERIALIZE",
        }
    }
}

/// Errors around the stored shared secret.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// No secret has been stored yet.
    #[error("No secret is configured")]
    NotSet,

    /// The user tried to store an empty secret.
    #[error("The secret cannot be empty")]
    Empty,

    /// The startup challenge was cancelled or exhausted.
    #[error("Secret verification failed")]
    VerificationFailed,

    /// The new secret and its confirmation differ.
    #[error("The secrets entered do not match")]
    ConfirmationMismatch,

    /// The authenticator could not read input (closed terminal, etc.).
    #[error("Failed to read credential input: {message}")]
    PromptFailed { message: String },
}

impl CredentialError {
    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            CredentialError::NotSet => "E_AUTH_NOT_SET",
            CredentialError::Empty => "E_AUTH_EMPTY",
            CredentialError::VerificationFailed => "E_AUTH_FAILED",
            CredentialError::ConfirmationMismatch => "E_AUTH_MISMATCH",
            CredentialError::PromptFailed { .. } => "E_AUTH_PROMPT",
        }
    }
}

/// Errors from the native watch subscription.
#[derive(Debug, Error)]
pub enum WatchError {
    /// A configured path vanished before it could be subscribed.
    #[error("Watched path unavailable: {}", path.display())]
    PathUnavailable { path: PathBuf },

    /// The notify backend failed to create or register a watch.
    #[error("Watch backend error: {0}")]
    Backend(#[from] notify::Error),
}

impl WatchError {
    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            WatchError::PathUnavailable { .. } => "E_WATCH_PATH",
            WatchError::Backend(_) => "E_WATCH_BACKEND",
        }
    }
}
