//! Error types for test generation
//!
//! Every provider failure is reported as a [`GenerationError`]; the
//! orchestrator does not look further than that.

/// Generation or repair failure
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// Credential for the selected provider is not configured
    #[error("missing required environment variable: {0}")]
    MissingCredential(&'static str),

    /// Provider name not recognised
    #[error("unsupported TESTGEN_LLM_PROVIDER value: '{0}'; supported providers: openai, gemini")]
    UnsupportedProvider(String),

    /// HTTP client could not be built
    #[error("http client setup failed: {0}")]
    Client(String),

    /// Transport-level failure (connect, timeout, TLS)
    #[error("{provider} request failed: {message}")]
    Request {
        /// Provider name
        provider: &'static str,
        /// Redacted failure message
        message: String,
    },

    /// Non-success HTTP status
    #[error("{provider} returned HTTP {status}: {body}")]
    Status {
        /// Provider name
        provider: &'static str,
        /// HTTP status code
        status: u16,
        /// Redacted, truncated response body
        body: String,
    },

    /// Response body was not the expected JSON
    #[error("{provider} response could not be decoded: {message}")]
    Decode {
        /// Provider name
        provider: &'static str,
        /// Redacted failure message
        message: String,
    },

    /// Model answered with nothing usable
    #[error("model returned empty output")]
    EmptyOutput,
}
