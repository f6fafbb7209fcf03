//! Google Gemini provider
//!
//! Native `generateContent` endpoint with the key in `x-goog-api-key`, so
//! it never appears in a URL.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use crate::config::GeneratorConfig;
use crate::error::GenerationError;
use crate::sanitize::{redact, truncate};
use crate::{CompletionRequest, Provider, ERROR_BODY_LIMIT};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const NAME: &str = "gemini";

/// Gemini API client
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("api_key", &"<REDACTED>")
            .field("api_key_len", &self.api_key.len())
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl GeminiProvider {
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
            "creating Gemini provider"
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
                .unwrap_or_else(|| GEMINI_API_BASE.to_string())
                .trim_end_matches('/')
                .to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    fn scrub(&self, message: &str) -> String {
        redact(message, &[&self.api_key])
    }
}

fn request_body(request: &CompletionRequest) -> Value {
    json!({
        "systemInstruction": {
            "parts": [{"text": request.system}]
        },
        "contents": [{
            "role": "user",
            "parts": [{"text": request.user}]
        }],
        "generationConfig": {
            "temperature": request.temperature
        }
    })
}

#[async_trait]
impl Provider for GeminiProvider {
    fn name(&self) -> &str {
        NAME
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, GenerationError> {
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body(&request))
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

/// Concatenated text parts of the first candidate
#[must_use]
pub fn response_text(value: &Value) -> String {
    value
        .pointer("/candidates/0/content/parts")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect()
}
