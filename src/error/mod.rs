//! Unified error handling for fileguard.
//!
//! - **Error Categories**: decide between aborting startup and keeping watch
//! - **Domain errors**: configuration, credential, filesystem and watch errors
//! - **Unified Error Type**: `GuardError` consolidates all of them
//! - **Result Type Alias**: `GuardResult<T>` for consistent return types
//!
//! # Error Categories
//!
//! | Category | Description | Fatal at startup |
//! |----------|-------------|------------------|
//! | Configuration | Missing or malformed config files | No (degrades) |
//! | System | Snapshot/restore I/O failures | No |
//! | Watch | Vanished paths, notify backend failures | No |
//! | Auth | Secret bootstrap failed | Yes |
//! | User | Invalid command line | Yes |

mod category;
mod config;
mod guard_error;
mod result;
mod system;

pub use category::ErrorCategory;
pub use config::{ConfigError, CredentialError, WatchError};
pub use guard_error::GuardError;
pub use result::{GuardResult, IoResultExt};
pub use system::{classify_io_error, SystemError};
