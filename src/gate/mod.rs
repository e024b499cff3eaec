//! Bounded-retry authentication challenge.
//!
//! A challenge prompts for the shared secret up to [`MAX_ATTEMPTS`] times.
//! The first matching credential grants; an explicit cancellation denies
//! immediately; running out of attempts denies. Nothing is remembered
//! between challenges.

use std::sync::Arc;

use crate::credential::Secret;
use crate::traits::{Authenticator, PromptResponse};

/// Attempts allowed per challenge.
pub const MAX_ATTEMPTS: u32 = 3;

const PROMPT: &str = "Enter password:";

/// Resolution state of an [`AuthSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    Pending,
    Granted,
    Denied,
}

/// Why a session was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// Every attempt was wrong.
    Exhausted,
    /// The user declined to answer.
    Cancelled,
    /// Input could not be read; treated like a cancellation.
    PromptFailed,
}

/// State of one challenge. Discarded once resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    attempts_used: u32,
    max_attempts: u32,
    outcome: AuthOutcome,
    deny_reason: Option<DenyReason>,
}

impl AuthSession {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            attempts_used: 0,
            max_attempts,
            outcome: AuthOutcome::Pending,
            deny_reason: None,
        }
    }

    pub fn attempts_used(&self) -> u32 {
        self.attempts_used
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn outcome(&self) -> AuthOutcome {
        self.outcome
    }

    pub fn deny_reason(&self) -> Option<DenyReason> {
        self.deny_reason
    }

    pub fn is_granted(&self) -> bool {
        self.outcome == AuthOutcome::Granted
    }

    pub fn is_denied(&self) -> bool {
        self.outcome == AuthOutcome::Denied
    }

    fn has_attempts_left(&self) -> bool {
        self.attempts_used < self.max_attempts
    }

    fn grant(&mut self) {
        self.outcome = AuthOutcome::Granted;
    }

    fn deny(&mut self, reason: DenyReason) {
        self.outcome = AuthOutcome::Denied;
        self.deny_reason = Some(reason);
    }
}

/// Runs challenges against a stored [`Secret`] through an [`Authenticator`].
pub struct AuthGate {
    authenticator: Arc<dyn Authenticator>,
    secret: Secret,
}

impl AuthGate {
    pub fn new(authenticator: Arc<dyn Authenticator>, secret: Secret) -> Self {
        Self {
            authenticator,
            secret,
        }
    }

    /// Run one challenge to resolution. Blocks until the authenticator
    /// answers; there is no timeout.
    pub fn challenge(&self) -> AuthSession {
        let mut session = AuthSession::new(MAX_ATTEMPTS);

        while session.has_attempts_left() {
            let prompt = if session.attempts_used == 0 {
                PROMPT.to_string()
            } else {
                format!(
                    "Incorrect password ({} of {} attempts used). {}",
                    session.attempts_used, session.max_attempts, PROMPT
                )
            };

            match self.authenticator.prompt(&prompt) {
                Ok(PromptResponse::Credential(candidate)) => {
                    if self.secret.verify(&candidate) {
                        session.grant();
                        tracing::info!("Authentication granted");
                        return session;
                    }
                    session.attempts_used += 1;
                    tracing::warn!(
                        "Wrong credential ({}/{})",
                        session.attempts_used,
                        session.max_attempts
                    );
                }
                Ok(PromptResponse::Cancelled) => {
                    tracing::info!("Authentication cancelled");
                    session.deny(DenyReason::Cancelled);
                    return session;
                }
                Err(err) => {
                    tracing::warn!("Authentication prompt failed: {}", err);
                    session.deny(DenyReason::PromptFailed);
                    return session;
                }
            }
        }

        tracing::warn!("Authentication attempts exhausted");
        session.deny(DenyReason::Exhausted);
        session
    }
}
