//! On-disk layout of the configuration directory.
//!
//! ```text
//! ~/.fileguard/
//! ├── list.txt          watched paths, one per line
//! ├── password.txt      stored secret
//! ├── thresholds.json   threshold policy
//! └── backup/           one snapshot per watched path, keyed by basename
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{GuardResult, IoResultExt, SystemError};

/// Default configuration directory name under the home directory.
const CONFIG_DIR: &str = ".fileguard";

/// Environment variable overriding the configuration directory.
pub const HOME_ENV: &str = "FILEGUARD_HOME";

const LIST_FILE: &str = "list.txt";
const PASSWORD_FILE: &str = "password.txt";
const THRESHOLDS_FILE: &str = "thresholds.json";
const BACKUP_DIR: &str = "backup";

/// Resolved paths of every file the guard persists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLayout {
    root: PathBuf,
}

impl ConfigLayout {
    /// Use `root` as the configuration directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve the configuration directory from `FILEGUARD_HOME`, falling
    /// back to `~/.fileguard`.
    pub fn from_env() -> GuardResult<Self> {
        if let Some(dir) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self::new(PathBuf::from(dir)));
        }
        let home = dirs::home_dir().ok_or(SystemError::NoHomeDirectory)?;
        Ok(Self::new(home.join(CONFIG_DIR)))
    }

    /// Create the configuration directory and the backup root if missing.
    pub fn ensure_dirs(&self) -> GuardResult<()> {
        fs::create_dir_all(&self.root).with_path(&self.root, "create config dir")?;
        let backup = self.backup_root();
        fs::create_dir_all(&backup).with_path(&backup, "create backup dir")?;
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn list_file(&self) -> PathBuf {
        self.root.join(LIST_FILE)
    }

    pub fn password_file(&self) -> PathBuf {
        self.root.join(PASSWORD_FILE)
    }

    pub fn thresholds_file(&self) -> PathBuf {
        self.root.join(THRESHOLDS_FILE)
    }

    pub fn backup_root(&self) -> PathBuf {
        self.root.join(BACKUP_DIR)
    }
}
