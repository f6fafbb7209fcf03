//! Prompted test generation on top of any [`Provider`]

use async_trait::async_trait;

use crate::error::GenerationError;
use crate::prompt::{repair_prompt, user_prompt, SYSTEM_PROMPT};
use crate::sanitize::strip_markdown_fences;
use crate::{CompletionRequest, Provider, TestGenerator};

/// Wraps a provider with the test-generation prompts and output cleanup
#[derive(Debug)]
pub struct PromptedGenerator<P> {
    provider: P,
    temperature: f32,
}

impl<P: Provider> PromptedGenerator<P> {
    /// Create a generator over `provider`
    #[must_use]
    pub fn new(provider: P, temperature: f32) -> Self {
        Self {
            provider,
            temperature,
        }
    }

    /// Underlying provider
    #[inline]
    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    async fn ask(&self, user: String) -> Result<String, GenerationError> {
        let request = CompletionRequest::new(SYSTEM_PROMPT, user, self.temperature);
        let raw = self.provider.complete(request).await?;
        let code = strip_markdown_fences(&raw);
        if code.is_empty() {
            tracing::debug!(provider = self.provider.name(), "model returned empty output");
            return Err(GenerationError::EmptyOutput);
        }
        tracing::debug!(
            provider = self.provider.name(),
            raw_len = raw.len(),
            code_len = code.len(),
            "completion received"
        );
        Ok(code)
    }
}

#[async_trait]
impl<P: Provider> TestGenerator for PromptedGenerator<P> {
    async fn generate(&self, function_source: &str) -> Result<String, GenerationError> {
        self.ask(user_prompt(function_source)).await
    }

    async fn repair(
        &self,
        function_source: &str,
        prior_output: &str,
        rejection_reason: &str,
    ) -> Result<String, GenerationError> {
        self.ask(repair_prompt(function_source, prior_output, rejection_reason))
            .await
    }
}
