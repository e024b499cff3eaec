//! Result type alias and I/O context helpers.

use std::path::Path;

use super::guard_error::GuardError;
use super::system::classify_io_error;

/// Type alias for Results using GuardError.
pub type GuardResult<T> = Result<T, GuardError>;

/// Extension trait attaching the failing path and operation to I/O errors.
///
/// # Example
///
/// ```ignore
/// use fileguard::error::IoResultExt;
///
/// std::fs::copy(&src, &dst).with_path(&dst, "copy snapshot")?;
/// ```
pub trait IoResultExt<T> {
    /// Convert an `io::Result` into a [`GuardResult`], recording `path`
    /// and `operation` in the resulting [`SystemError`](super::SystemError).
    fn with_path(self, path: &Path, operation: &str) -> GuardResult<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: &Path, operation: &str) -> GuardResult<T> {
        self.map_err(|e| GuardError::System(classify_io_error(e, Some(path.to_path_buf()), operation)))
    }
}
