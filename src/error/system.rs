//! Filesystem error types.
//!
//! Snapshot and restore operations report failures through [`SystemError`],
//! always carrying the path and the operation that failed so the monitor
//! can log which watched path is affected.

use std::fmt;
use std::path::PathBuf;

/// System-specific error variants.
#[derive(Debug, Clone, PartialEq)]
pub enum SystemError {
    /// File not found.
    FileNotFound { path: PathBuf },

    /// Directory not found.
    DirectoryNotFound { path: PathBuf },

    /// Permission denied for file/directory operation.
    PermissionDenied { path: PathBuf, operation: String },

    /// Out of disk space while writing a snapshot or restore.
    InsufficientDiskSpace { path: PathBuf },

    /// Generic I/O error.
    IoError {
        operation: String,
        path: Option<PathBuf>,
        message: String,
    },

    /// Could not determine home directory.
    NoHomeDirectory,
}

impl SystemError {
    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            SystemError::PermissionDenied { path, operation } => {
                format!(
                    "Permission denied: Cannot {} '{}'.\nCheck the permissions of the watched path and the backup directory.",
                    operation,
                    path.display()
                )
            }
            SystemError::InsufficientDiskSpace { path } => {
                format!(
                    "Not enough disk space at '{}'.\nFree up some space so snapshots can be written.",
                    path.display()
                )
            }
            SystemError::NoHomeDirectory => {
                "Could not determine your home directory. Set FILEGUARD_HOME or pass --config-dir."
                    .to_string()
            }
            other => other.to_string(),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            SystemError::FileNotFound { .. } => "E_SYS_FILE_NOT_FOUND",
            SystemError::DirectoryNotFound { .. } => "E_SYS_DIR_NOT_FOUND",
            SystemError::PermissionDenied { .. } => "E_SYS_PERM",
            SystemError::InsufficientDiskSpace { .. } => "E_SYS_DISK_SPACE",
            SystemError::IoError { .. } => "E_SYS_IO",
            SystemError::NoHomeDirectory => "E_SYS_NO_HOME",
        }
    }
}

impl fmt::Display for SystemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SystemError::FileNotFound { path } => {
                write!(f, "File not found: '{}'", path.display())
            }
            SystemError::DirectoryNotFound { path } => {
                write!(f, "Directory not found: '{}'", path.display())
            }
            SystemError::PermissionDenied { path, operation } => {
                write!(f, "Permission denied: {} '{}'", operation, path.display())
            }
            SystemError::InsufficientDiskSpace { path } => {
                write!(f, "Insufficient disk space at '{}'", path.display())
            }
            SystemError::IoError {
                operation,
                path,
                message,
            } => match path {
                Some(p) => write!(
                    f,
                    "I/O error during {} at '{}': {}",
                    operation,
                    p.display(),
                    message
                ),
                None => write!(f, "I/O error during {}: {}", operation, message),
            },
            SystemError::NoHomeDirectory => {
                write!(f, "Could not determine home directory")
            }
        }
    }
}

impl std::error::Error for SystemError {}

/// Classify an I/O error into a SystemError.
pub fn classify_io_error(
    err: std::io::Error,
    path: Option<PathBuf>,
    operation: &str,
) -> SystemError {
    use std::io::ErrorKind;

    match (err.kind(), path) {
        (ErrorKind::NotFound, Some(p)) => {
            if p.is_dir() || operation.contains("dir") {
                SystemError::DirectoryNotFound { path: p }
            } else {
                SystemError::FileNotFound { path: p }
            }
        }
        (ErrorKind::PermissionDenied, Some(p)) => SystemError::PermissionDenied {
            path: p,
            operation: operation.to_string(),
        },
        (_, Some(p)) if is_disk_space_error(&err) => {
            SystemError::InsufficientDiskSpace { path: p }
        }
        (_, path) => SystemError::IoError {
            operation: operation.to_string(),
            path,
            message: err.to_string(),
        },
    }
}

/// Check if an I/O error is a disk space error.
fn is_disk_space_error(err: &std::io::Error) -> bool {
    #[cfg(unix)]
    {
        // ENOSPC
        err.raw_os_error() == Some(28)
    }
    #[cfg(not(unix))]
    {
        let msg = err.to_string().to_lowercase();
        msg.contains("no space") || msg.contains("disk full")
    }
}
