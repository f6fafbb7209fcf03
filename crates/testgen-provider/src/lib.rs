//! testgen Generation Providers
//!
//! The generator seam of testgen: something that turns a normalized
//! function into candidate pytest text, and can be asked once to repair a
//! rejected candidate.
//!
//! # Layers
//!
//! - [`Provider`]: one chat-style completion against a remote model
//! - [`PromptedGenerator`]: adds the test-generation prompts and output
//!   cleanup to any provider
//! - [`TestGenerator`]: what the orchestrator depends on
//!
//! [`build_generator`] selects a backend from a [`GeneratorConfig`].
//! Output from every layer is untrusted; acceptance is decided elsewhere.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

use async_trait::async_trait;

pub mod config;
pub mod error;
pub mod gemini;
pub mod generator;
pub mod openai;
pub mod prompt;
pub mod sanitize;

pub use config::{GeneratorConfig, ProviderKind};
pub use error::GenerationError;
pub use gemini::GeminiProvider;
pub use generator::PromptedGenerator;
pub use openai::OpenAiProvider;
pub use sanitize::strip_markdown_fences;

/// Maximum characters of an HTTP error body kept in an error
pub const ERROR_BODY_LIMIT: usize = 512;

/// A single completion request
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// System instructions
    pub system: String,
    /// User message
    pub user: String,
    /// Sampling temperature
    pub temperature: f32,
}

impl CompletionRequest {
    /// Create a request
    #[must_use]
    pub fn new(system: impl Into<String>, user: impl Into<String>, temperature: f32) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            temperature,
        }
    }
}

/// A remote model backend
#[async_trait]
pub trait Provider: Send + Sync {
    /// Short backend name used in logs and errors
    fn name(&self) -> &str;

    /// Run one completion and return the raw text
    async fn complete(&self, request: CompletionRequest) -> Result<String, GenerationError>;
}

/// Produces candidate pytest modules
#[async_trait]
pub trait TestGenerator: Send + Sync {
    /// Generate tests for a normalized function
    async fn generate(&self, function_source: &str) -> Result<String, GenerationError>;

    /// Generate a replacement after `prior_output` was rejected for
    /// `rejection_reason`
    async fn repair(
        &self,
        function_source: &str,
        prior_output: &str,
        rejection_reason: &str,
    ) -> Result<String, GenerationError>;
}

/// Build the configured backend
///
/// # Errors
///
/// Returns [`GenerationError::Client`] if the HTTP client cannot be built.
pub fn build_generator(config: &GeneratorConfig) -> Result<Box<dyn TestGenerator>, GenerationError> {
    tracing::debug!(provider = %config.provider, model = %config.model, "building generator");
    let generator: Box<dyn TestGenerator> = match config.provider {
        ProviderKind::OpenAi => Box::new(PromptedGenerator::new(
            OpenAiProvider::new(config)?,
            config.temperature,
        )),
        ProviderKind::Gemini => Box::new(PromptedGenerator::new(
            GeminiProvider::new(config)?,
            config.temperature,
        )),
    };
    Ok(generator)
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
