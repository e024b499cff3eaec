//! Credential storage in the configuration directory.

use std::fs;
use std::path::{Path, PathBuf};

use super::secret::Secret;
use crate::error::{CredentialError, GuardResult, IoResultExt};

/// Reads and writes the stored secret (`password.txt`).
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored secret, `None` if none has been set.
    pub fn load(&self) -> GuardResult<Option<Secret>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path).with_path(&self.path, "read secret")?;
        let secret = Secret::parse(&content);
        if let Some(secret) = &secret {
            if secret.is_plaintext() {
                tracing::warn!(
                    "Secret in {} is stored as plaintext; run `fileguard set-password` to hash it",
                    self.path.display()
                );
            }
        }
        Ok(secret)
    }

    /// Load the secret or fail with `NotSet`.
    pub fn require(&self) -> GuardResult<Secret> {
        self.load()?.ok_or_else(|| CredentialError::NotSet.into())
    }

    /// Hash and store a new secret. Empty secrets are rejected.
    pub fn set_secret(&self, secret: &str) -> GuardResult<Secret> {
        if secret.is_empty() {
            return Err(CredentialError::Empty.into());
        }
        let hashed = Secret::hashed(secret);
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_path(parent, "create config dir")?;
        }
        fs::write(&self.path, hashed.encode()).with_path(&self.path, "write secret")?;
        restrict_permissions(&self.path)?;
        tracing::info!("Secret stored in {}", self.path.display());
        Ok(hashed)
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> GuardResult<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600)).with_path(path, "chmod secret")
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> GuardResult<()> {
    Ok(())
}
