//! The text-generation capability.

use async_trait::async_trait;

use crate::Result;

/// An opaque `generate(prompt) -> text` capability.
///
/// Implementations own their latency, timeout and retry policy. Callers
/// only see "eventually returns text or signals failure".
///
/// # Implementors
///
/// - [`OpenAiGenerator`](crate::OpenAiGenerator): chat completions over HTTP
/// - [`mock::ScriptedGenerator`](crate::mock::ScriptedGenerator): canned replies
/// - [`mock::FnGenerator`](crate::mock::FnGenerator): closure-backed replies
/// - [`mock::FailingGenerator`](crate::mock::FailingGenerator): always fails
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Short identifier used in log events.
    fn name(&self) -> &str;

    /// Generates text for `prompt`, producing at most `max_tokens` tokens.
    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String>;
}
