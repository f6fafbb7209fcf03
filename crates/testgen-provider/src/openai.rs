//! OpenAI provider
//!
//! Uses the Responses API. Older response shapes from compatible servers
//! (chat completions) are also understood when reading the text back.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use crate::config::GeneratorConfig;
use crate::error::GenerationError;
use crate::sanitize::{redact, truncate};
use crate::{CompletionRequest, Provider, ERROR_BODY_LIMIT};

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";
const NAME: &str = "openai";

/// OpenAI Responses API client
pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("api_key", &"<REDACTED>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    temperature: f32,
    input: [InputMessage<'a>; 2],
}

#[derive(Serialize)]
struct InputMessage<'a> {
    role: &'a str,
    content: &'a str,
}

impl OpenAiProvider {
    /// Build a client from resolved configuration
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Client`] if the HTTP client cannot be built.
    pub fn new(config: &GeneratorConfig) -> Result<Self, GenerationError> {
        tracing::debug!(
            provider = NAME,
            model = %config.model,
            api_key_len = config.api_key.len(),
            "creating OpenAI provider"
        );
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GenerationError::Client(e.to_string()))?;
        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| OPENAI_API_BASE.to_string())
                .trim_end_matches('/')
                .to_string(),
        })
    }

    fn scrub(&self, message: &str) -> String {
        redact(message, &[&self.api_key])
    }
}

#[async_trait]
impl Provider for OpenAiProvider {
    fn name(&self) -> &str {
        NAME
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, GenerationError> {
        let body = ResponsesRequest {
            model: &self.model,
            temperature: request.temperature,
            input: [
                InputMessage {
                    role: "system",
                    content: &request.system,
                },
                InputMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
        };

        let response = self
            .client
            .post(format!("{}/responses", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::Request {
                provider: NAME,
                message: self.scrub(&e.to_string()),
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(GenerationError::Status {
                provider: NAME,
                status: status.as_u16(),
                body: truncate(&self.scrub(&text), ERROR_BODY_LIMIT),
            });
        }

        let value: Value = response.json().await.map_err(|e| GenerationError::Decode {
            provider: NAME,
            message: self.scrub(&e.to_string()),
        })?;

        Ok(response_text(&value))
    }
}

/// Pull the generated text out of a response body
///
/// Tries `output_text`, then the `output[].content[]` parts, then the chat
/// completions `choices[0].message.content`. Empty string when none match.
#[must_use]
pub fn response_text(value: &Value) -> String {
    if let Some(text) = value.get("output_text").and_then(Value::as_str) {
        if !text.trim().is_empty() {
            return text.to_string();
        }
    }

    let parts: String = value
        .get("output")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|item| item.get("content").and_then(Value::as_array))
        .flatten()
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect();
    if !parts.is_empty() {
        return parts;
    }

    match value.pointer("/choices/0/message/content") {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.get("text").and_then(Value::as_str))
            .collect(),
        _ => String::new(),
    }
}
