//! Terminal password prompt.
//!
//! Reads the credential with echo disabled via `rpassword`. An empty line or
//! end-of-input counts as declining the challenge.

use std::io;

use crate::error::CredentialError;
use crate::traits::{Authenticator, PromptResponse};

/// [`Authenticator`] backed by the controlling terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalAuthenticator;

impl TerminalAuthenticator {
    pub fn new() -> Self {
        Self
    }
}

impl Authenticator for TerminalAuthenticator {
    fn prompt(&self, prompt: &str) -> Result<PromptResponse, CredentialError> {
        match rpassword::prompt_password(format!("{} ", prompt.trim_end())) {
            Ok(line) => Ok(interpret_line(line)),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(PromptResponse::Cancelled),
            Err(e) => Err(CredentialError::PromptFailed {
                message: e.to_string(),
            }),
        }
    }
}

fn interpret_line(line: String) -> PromptResponse {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.is_empty() {
        PromptResponse::Cancelled
    } else {
        PromptResponse::Credential(line.to_string())
    }
}
