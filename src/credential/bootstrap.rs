//! Startup credential bootstrap and secret rotation.
//!
//! Monitoring only starts once the operator has proven they know the secret
//! (or created one on first run). A failure here is the one case that aborts
//! the process with a non-zero exit code.

use std::sync::Arc;

use super::secret::Secret;
use super::store::CredentialStore;
use crate::error::{CredentialError, GuardResult};
use crate::gate::AuthGate;
use crate::traits::{Authenticator, PromptResponse};

/// Create the secret on first run, otherwise verify it.
pub fn bootstrap(
    store: &CredentialStore,
    authenticator: Arc<dyn Authenticator>,
) -> GuardResult<Secret> {
    match store.load()? {
        None => {
            tracing::info!("No secret configured yet, asking for a new one");
            create_secret(store, authenticator.as_ref(), false)
        }
        Some(secret) => verify_existing(secret, authenticator),
    }
}

/// Verify the current secret (if any), then store a new one.
pub fn change_secret(
    store: &CredentialStore,
    authenticator: Arc<dyn Authenticator>,
) -> GuardResult<Secret> {
    if let Some(secret) = store.load()? {
        verify_existing(secret, authenticator.clone())?;
    }
    create_secret(store, authenticator.as_ref(), true)
}

fn verify_existing(secret: Secret, authenticator: Arc<dyn Authenticator>) -> GuardResult<Secret> {
    let session = AuthGate::new(authenticator, secret.clone()).challenge();
    if session.is_granted() {
        Ok(secret)
    } else {
        Err(CredentialError::VerificationFailed.into())
    }
}

fn create_secret(
    store: &CredentialStore,
    authenticator: &dyn Authenticator,
    confirm: bool,
) -> GuardResult<Secret> {
    let first = read_new_secret(authenticator, "Create a new password:")?;
    if confirm {
        let second = read_new_secret(authenticator, "Confirm the new password:")?;
        if first != second {
            return Err(CredentialError::ConfirmationMismatch.into());
        }
    }
    store.set_secret(&first)
}

fn read_new_secret(authenticator: &dyn Authenticator, prompt: &str) -> GuardResult<String> {
    match authenticator.prompt(prompt)? {
        PromptResponse::Credential(value) if !value.is_empty() => Ok(value),
        PromptResponse::Credential(_) => Err(CredentialError::Empty.into()),
        PromptResponse::Cancelled => Err(CredentialError::VerificationFailed.into()),
    }
}
