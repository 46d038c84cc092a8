//! OpenAI-compatible chat completions adapter.
//!
//! Sends the whole prompt as a single system message and returns the
//! trimmed content of the first choice.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::RETRY_AFTER;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::GeneratorConfig;
use crate::error::GenerationError;
use crate::generator::TextGenerator;
use crate::Result;

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Text generator backed by an OpenAI-compatible HTTP endpoint.
pub struct OpenAiGenerator {
    config: GeneratorConfig,
    api_key: String,
    client: reqwest::Client,
}

impl OpenAiGenerator {
    /// Creates a generator, reading the API key from `config.api_key_env`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Auth`] when the variable is unset, or
    /// [`GenerationError::Unreachable`] when the HTTP client cannot be built.
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .map_err(|_| GenerationError::Auth(format!("{} is not set", config.api_key_env)))?;
        Self::with_api_key(config, api_key)
    }

    /// Creates a generator with an explicit API key.
    pub fn with_api_key(config: GeneratorConfig, api_key: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GenerationError::Unreachable(e.to_string()))?;

        Ok(Self {
            config,
            api_key: api_key.into(),
            client,
        })
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    fn name(&self) -> &str {
        &self.config.model
    }

    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: [ChatMessage {
                role: "system",
                content: prompt,
            }],
            max_tokens,
            temperature: self.config.temperature,
        };

        debug!(model = %self.config.model, max_tokens, "sending chat completion");

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned);
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status.as_u16(), retry_after.as_deref(), body));
        }

        let body = response.text().await.map_err(transport_error)?;
        extract_content(&body)
    }
}

fn transport_error(err: reqwest::Error) -> GenerationError {
    if err.is_timeout() {
        GenerationError::Timeout
    } else if err.is_decode() {
        GenerationError::Malformed(err.to_string())
    } else {
        GenerationError::Unreachable(err.to_string())
    }
}

/// Maps a non-success HTTP status to a generation error.
pub(crate) fn status_error(status: u16, retry_after: Option<&str>, body: String) -> GenerationError {
    match status {
        401 | 403 => GenerationError::Auth(body),
        429 => GenerationError::RateLimited {
            retry_after: retry_after
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs),
        },
        _ => GenerationError::Provider {
            status,
            message: body,
        },
    }
}

/// Pulls the first choice's content out of a chat completions body.
pub(crate) fn extract_content(body: &str) -> Result<String> {
    let parsed: ChatResponse =
        serde_json::from_str(body).map_err(|e| GenerationError::Malformed(e.to_string()))?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .ok_or_else(|| GenerationError::Malformed("response has no message content".to_string()))
}
