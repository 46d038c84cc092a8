//! Deterministic generators for tests and offline runs.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::GenerationError;
use crate::generator::TextGenerator;
use crate::Result;

/// Replays a fixed sequence of replies, one per call.
///
/// Once the script is exhausted every further call fails with
/// [`GenerationError::Unreachable`]. Every prompt received is recorded.
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<Result<String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    /// Creates a generator that answers with `replies` in order.
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_results(replies.into_iter().map(|r| Ok(r.into())))
    }

    /// Creates a generator from explicit successes and failures.
    pub fn from_results<I>(replies: I) -> Self
    where
        I: IntoIterator<Item = Result<String>>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Returns every prompt received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }

    /// Number of replies not yet consumed.
    pub fn remaining(&self) -> usize {
        self.replies.lock().map(|r| r.len()).unwrap_or(0)
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, prompt: &str, _max_tokens: u32) -> Result<String> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        self.replies
            .lock()
            .ok()
            .and_then(|mut replies| replies.pop_front())
            .unwrap_or_else(|| Err(GenerationError::Unreachable("script exhausted".to_string())))
    }
}

/// Answers by calling a closure with the prompt.
pub struct FnGenerator<F> {
    reply: F,
}

impl<F> FnGenerator<F>
where
    F: Fn(&str) -> Result<String> + Send + Sync,
{
    /// Wraps `reply`.
    pub fn new(reply: F) -> Self {
        Self { reply }
    }
}

#[async_trait]
impl<F> TextGenerator for FnGenerator<F>
where
    F: Fn(&str) -> Result<String> + Send + Sync,
{
    fn name(&self) -> &str {
        "fn"
    }

    async fn generate(&self, prompt: &str, _max_tokens: u32) -> Result<String> {
        (self.reply)(prompt)
    }
}

/// Fails every call with the configured error.
pub struct FailingGenerator {
    error: GenerationError,
}

impl Default for FailingGenerator {
    fn default() -> Self {
        Self::new(GenerationError::Unreachable("offline".to_string()))
    }
}

impl FailingGenerator {
    /// Creates a generator that always returns `error`.
    pub fn new(error: GenerationError) -> Self {
        Self { error }
    }
}

#[async_trait]
impl TextGenerator for FailingGenerator {
    fn name(&self) -> &str {
        "failing"
    }

    async fn generate(&self, _prompt: &str, _max_tokens: u32) -> Result<String> {
        Err(self.error.clone())
    }
}
