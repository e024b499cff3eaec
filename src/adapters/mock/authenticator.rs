//! Scripted authenticator for testing.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::error::CredentialError;
use crate::traits::{Authenticator, PromptResponse};

enum Step {
    Answer(PromptResponse),
    Fail(CredentialError),
}

/// Authenticator that replays a fixed script of answers.
///
/// Once the script runs out every further prompt is answered with
/// [`PromptResponse::Cancelled`], so a test can never hang on a prompt.
///
/// # Example
///
/// ```ignore
/// use fileguard::adapters::mock::ScriptedAuthenticator;
///
/// let auth = ScriptedAuthenticator::new()
///     .then_credential("wrong")
///     .then_credential("12345");
/// ```
#[derive(Default)]
pub struct ScriptedAuthenticator {
    script: Mutex<VecDeque<Step>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedAuthenticator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a credential answer.
    pub fn then_credential(self, value: &str) -> Self {
        self.push(Step::Answer(PromptResponse::credential(value)))
    }

    /// Queue an explicit cancellation.
    pub fn then_cancel(self) -> Self {
        self.push(Step::Answer(PromptResponse::Cancelled))
    }

    /// Queue an input failure.
    pub fn then_error(self, error: CredentialError) -> Self {
        self.push(Step::Fail(error))
    }

    /// Number of prompts shown so far.
    pub fn prompt_count(&self) -> usize {
        self.prompts.lock().map(|p| p.len()).unwrap_or(0)
    }

    /// Every prompt text shown so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    /// Answers not yet consumed.
    pub fn remaining(&self) -> usize {
        self.script.lock().map(|s| s.len()).unwrap_or(0)
    }

    fn push(self, step: Step) -> Self {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(step);
        }
        self
    }
}

impl Authenticator for ScriptedAuthenticator {
    fn prompt(&self, prompt: &str) -> Result<PromptResponse, CredentialError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        let step = self.script.lock().ok().and_then(|mut s| s.pop_front());
        match step {
            Some(Step::Answer(response)) => Ok(response),
            Some(Step::Fail(error)) => Err(error),
            None => Ok(PromptResponse::Cancelled),
        }
    }
}
