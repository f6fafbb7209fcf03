//! Generator configuration
//!
//! Resolved from the process environment, or from any lookup function so
//! tests never have to mutate global state.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::GenerationError;

/// Selects the backend
pub const PROVIDER_VAR: &str = "TESTGEN_LLM_PROVIDER";
/// OpenAI credential
pub const OPENAI_KEY_VAR: &str = "OPENAI_API_KEY";
/// Gemini credential
pub const GEMINI_KEY_VAR: &str = "GEMINI_API_KEY";
/// Optional model override
pub const MODEL_VAR: &str = "TESTGEN_MODEL";
/// Optional request timeout in seconds
pub const TIMEOUT_VAR: &str = "TESTGEN_TIMEOUT_SECS";
/// Optional API base URL override
pub const BASE_URL_VAR: &str = "TESTGEN_API_BASE";

/// Request timeout when none is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Supported generation backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProviderKind {
    /// OpenAI Responses API
    #[default]
    OpenAi,
    /// Google Gemini `generateContent`
    Gemini,
}

impl ProviderKind {
    /// Lowercase name as accepted in the environment
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Gemini => "gemini",
        }
    }

    /// Environment variable holding this backend's credential
    #[inline]
    #[must_use]
    pub const fn key_var(self) -> &'static str {
        match self {
            Self::OpenAi => OPENAI_KEY_VAR,
            Self::Gemini => GEMINI_KEY_VAR,
        }
    }

    /// Model used when `TESTGEN_MODEL` is unset
    #[inline]
    #[must_use]
    pub const fn default_model(self) -> &'static str {
        match self {
            Self::OpenAi => "gpt-4.1-mini",
            Self::Gemini => "gemini-2.5-flash",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProviderKind {
    type Err = GenerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        match normalized.as_str() {
            "openai" => Ok(Self::OpenAi),
            "gemini" => Ok(Self::Gemini),
            _ => Err(GenerationError::UnsupportedProvider(normalized)),
        }
    }
}

/// Everything a backend needs to make a request
#[derive(Clone)]
pub struct GeneratorConfig {
    /// Selected backend
    pub provider: ProviderKind,
    /// Credential for `provider`
    pub api_key: String,
    /// Model identifier
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Per-request timeout
    pub timeout: Duration,
    /// API base URL; the backend default when `None`
    pub base_url: Option<String>,
}

impl GeneratorConfig {
    /// Create a config with the backend's defaults
    #[must_use]
    pub fn new(provider: ProviderKind, api_key: impl Into<String>) -> Self {
        Self {
            provider,
            api_key: api_key.into(),
            model: provider.default_model().to_string(),
            temperature: 0.0,
            timeout: DEFAULT_TIMEOUT,
            base_url: None,
        }
    }

    /// Set the model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the API base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Resolve from the process environment
    ///
    /// # Errors
    ///
    /// Returns an error if the provider name is unknown or its credential
    /// is missing.
    pub fn from_env() -> Result<Self, GenerationError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve from an arbitrary variable lookup
    ///
    /// An unset provider defaults to OpenAI; a set but blank one is
    /// rejected like any other unknown name.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider name is unknown or its credential
    /// is missing or empty.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, GenerationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let provider = match lookup(PROVIDER_VAR) {
            Some(value) => value.parse::<ProviderKind>()?,
            None => ProviderKind::default(),
        };

        let api_key = lookup(provider.key_var())
            .filter(|key| !key.is_empty())
            .ok_or(GenerationError::MissingCredential(provider.key_var()))?;

        let mut config = Self::new(provider, api_key);

        if let Some(model) = non_blank(lookup(MODEL_VAR)) {
            config.model = model;
        }

        if let Some(raw) = lookup(TIMEOUT_VAR) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout = Duration::from_secs(secs),
                _ => tracing::debug!(value = %raw, "ignoring invalid {TIMEOUT_VAR}"),
            }
        }

        config.base_url = non_blank(lookup(BASE_URL_VAR));

        Ok(config)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl fmt::Debug for GeneratorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorConfig")
            .field("provider", &self.provider)
            .field("api_key", &"<REDACTED>")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_to_openai() {
        let config = GeneratorConfig::from_lookup(lookup(&[(OPENAI_KEY_VAR, "sk-test")])).unwrap();
        assert_eq!(config.provider, ProviderKind::OpenAi);
        assert_eq!(config.model, "gpt-4.1-mini");
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert!(config.temperature.abs() < f32::EPSILON);
        assert!(config.base_url.is_none());
    }

    #[test]
    fn test_provider_name_is_case_insensitive() {
        let config = GeneratorConfig::from_lookup(lookup(&[
            (PROVIDER_VAR, "  Gemini "),
            (GEMINI_KEY_VAR, "g-key"),
        ]))
        .unwrap();
        assert_eq!(config.provider, ProviderKind::Gemini);
        assert_eq!(config.model, "gemini-2.5-flash");
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let err = GeneratorConfig::from_lookup(lookup(&[(PROVIDER_VAR, "Claude")])).unwrap_err();
        assert!(matches!(err, GenerationError::UnsupportedProvider(name) if name == "claude"));
    }

    #[test]
    fn test_blank_provider_rejected() {
        let err = GeneratorConfig::from_lookup(lookup(&[(PROVIDER_VAR, ""), (OPENAI_KEY_VAR, "k")]))
            .unwrap_err();
        assert!(matches!(err, GenerationError::UnsupportedProvider(_)));
    }

    #[test]
    fn test_missing_or_empty_credential() {
        let err = GeneratorConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, GenerationError::MissingCredential(OPENAI_KEY_VAR)));

        let err = GeneratorConfig::from_lookup(lookup(&[
            (PROVIDER_VAR, "gemini"),
            (GEMINI_KEY_VAR, ""),
            (OPENAI_KEY_VAR, "present-but-irrelevant"),
        ]))
        .unwrap_err();
        assert!(matches!(err, GenerationError::MissingCredential(GEMINI_KEY_VAR)));
    }

    #[test]
    fn test_overrides() {
        let config = GeneratorConfig::from_lookup(lookup(&[
            (OPENAI_KEY_VAR, "k"),
            (MODEL_VAR, "gpt-4o"),
            (TIMEOUT_VAR, "5"),
            (BASE_URL_VAR, "http://localhost:8080/v1"),
        ]))
        .unwrap();
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.base_url.as_deref(), Some("http://localhost:8080/v1"));
    }

    #[test]
    fn test_invalid_timeout_falls_back() {
        for raw in ["soon", "0", "-3", ""] {
            let config =
                GeneratorConfig::from_lookup(lookup(&[(OPENAI_KEY_VAR, "k"), (TIMEOUT_VAR, raw)]))
                    .unwrap();
            assert_eq!(config.timeout, DEFAULT_TIMEOUT, "{raw}");
        }
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = GeneratorConfig::new(ProviderKind::OpenAi, "sk-very-secret");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("sk-very-secret"));
        assert!(rendered.contains("<REDACTED>"));
    }
}
