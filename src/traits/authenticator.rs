//! Authenticator trait abstraction.
//!
//! The authentication challenge is a blocking UI boundary: the orchestrator
//! waits on [`Authenticator::prompt`] until a human answers or declines.

use crate::error::CredentialError;

/// What the human answered to one prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptResponse {
    /// A credential to compare against the stored secret.
    Credential(String),
    /// Explicit decline. Resolves the challenge as denied immediately.
    Cancelled,
}

impl PromptResponse {
    pub fn credential(value: impl Into<String>) -> Self {
        PromptResponse::Credential(value.into())
    }
}

/// Source of credentials for an authentication challenge.
///
/// Implementations include the terminal prompt used in production and the
/// scripted mock used in tests.
///
/// # Example
///
/// ```ignore
/// use fileguard::traits::{Authenticator, PromptResponse};
///
/// fn ask(auth: &dyn Authenticator) -> bool {
///     matches!(auth.prompt("Enter password:"), Ok(PromptResponse::Credential(_)))
/// }
/// ```
pub trait Authenticator: Send + Sync {
    /// Show `prompt` and block until a credential or a cancellation arrives.
    ///
    /// # Returns
    /// - `Ok(PromptResponse::Credential(_))` when something was entered
    /// - `Ok(PromptResponse::Cancelled)` when the user declined
    /// - `Err(_)` when input could not be read at all
    fn prompt(&self, prompt: &str) -> Result<PromptResponse, CredentialError>;
}
