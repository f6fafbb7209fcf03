//! The testgen pipeline
//!
//! extract → normalize → generate → validate, with at most one repair.

use std::sync::Arc;

use testgen_provider::TestGenerator;
use testgen_syntax::{extract, normalize, validate, Verdict};

use crate::error::{GenerationStage, PipelineError};

/// Accepted test module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedTests {
    /// Test code, trimmed, ending with exactly one newline
    pub code: String,
    /// Whether the one-shot repair produced it
    pub repaired: bool,
}

impl GeneratedTests {
    fn accepted(raw: &str, repaired: bool) -> Self {
        Self {
            code: format!("{}\n", raw.trim()),
            repaired,
        }
    }
}

/// Runs a source text through the full pipeline
#[derive(Clone)]
pub struct Pipeline {
    generator: Arc<dyn TestGenerator>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline").finish_non_exhaustive()
    }
}

impl Pipeline {
    /// Create a pipeline over a generator
    #[must_use]
    pub fn new(generator: Arc<dyn TestGenerator>) -> Self {
        Self { generator }
    }

    /// Produce an accepted test module for `source`
    ///
    /// The generator only ever sees the normalized function, never the raw
    /// input.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::NotASingleFunction`] if extraction rejects the input
    /// - [`PipelineError::Generation`] if a generator call fails
    /// - [`PipelineError::InvalidOutput`] if the repaired output is rejected
    pub async fn run(&self, source: &str) -> Result<GeneratedTests, PipelineError> {
        let slice = extract(source).map_err(|_| PipelineError::NotASingleFunction)?;
        let normalized = normalize(&slice);
        tracing::info!(
            slice_len = slice.as_str().len(),
            normalized_len = normalized.as_str().len(),
            "function extracted"
        );

        let first = self
            .generator
            .generate(normalized.as_str())
            .await
            .map_err(|source| generation_failed(GenerationStage::Generate, source))?;

        let verdict = validate(&first);
        if verdict.accepted() {
            tracing::info!("generated tests accepted");
            return Ok(GeneratedTests::accepted(&first, false));
        }
        tracing::debug!(reason = verdict.reason(), "first validation failed");

        let second = self
            .generator
            .repair(normalized.as_str(), &first, verdict.reason())
            .await
            .map_err(|source| generation_failed(GenerationStage::Repair, source))?;

        let retry: Verdict = validate(&second);
        if !retry.accepted() {
            tracing::debug!(reason = retry.reason(), "retry validation failed");
            return Err(PipelineError::InvalidOutput {
                reason: retry.reason().to_string(),
            });
        }

        tracing::info!("repaired tests accepted");
        Ok(GeneratedTests::accepted(&second, true))
    }
}

fn generation_failed(
    stage: GenerationStage,
    source: testgen_provider::GenerationError,
) -> PipelineError {
    tracing::warn!(%stage, error = %source, "generator call failed");
    PipelineError::Generation { stage, source }
}
