//! Error types for the testgen pipeline
//!
//! Every variant collapses to the same user-facing message; the detail is
//! for logs only.

use std::fmt;

use testgen_provider::GenerationError;

/// The only text a user ever sees on failure
pub const USER_ERROR_MESSAGE: &str = "Error: This tool only generates unit tests for functions.";

/// Which generator call failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStage {
    /// First attempt
    Generate,
    /// One-shot repair
    Repair,
}

impl fmt::Display for GenerationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Generate => "generation",
            Self::Repair => "repair",
        })
    }
}

/// Pipeline failure
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Input is not exactly one function
    #[error("input is not a single function definition")]
    NotASingleFunction,

    /// Generator call failed
    #[error("{stage} failed: {source}")]
    Generation {
        /// Stage that failed
        stage: GenerationStage,
        /// Underlying failure
        #[source]
        source: GenerationError,
    },

    /// Repaired output was still rejected
    #[error("generated tests rejected after repair: {reason}")]
    InvalidOutput {
        /// Validator reason for the final rejection
        reason: String,
    },
}

impl PipelineError {
    /// Generic message for the user
    #[inline]
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        USER_ERROR_MESSAGE
    }

    /// Check if the input itself was refused, before any generation
    #[inline]
    #[must_use]
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::NotASingleFunction)
    }
}
