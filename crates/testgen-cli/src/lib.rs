//! testgen command line
//!
//! The process-facing shell around [`testgen_core::Pipeline`]. Everything
//! except argument parsing and process exit lives here so it can be tested
//! in-process.
//!
//! Output contract: on success stdout holds the tests and one trailing
//! newline; on any failure it holds only [`USER_ERROR_MESSAGE`] with no
//! newline. Internal reasons go to stderr through `tracing`, and only when
//! enabled.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

use std::io::{Read, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use testgen_core::Pipeline;
use testgen_provider::TestGenerator;
use tracing_subscriber::EnvFilter;

pub use testgen_core::USER_ERROR_MESSAGE;

/// Enables debug logging when set to `1`
pub const DEBUG_VAR: &str = "TESTGEN_DEBUG";

/// What the process should print and return
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliOutcome {
    /// Exact stdout content
    pub stdout: String,
    /// Process exit code
    pub exit_code: i32,
}

impl CliOutcome {
    /// Generic failure outcome
    #[must_use]
    pub fn failure() -> Self {
        Self {
            stdout: USER_ERROR_MESSAGE.to_string(),
            exit_code: 1,
        }
    }

    /// Check for exit code 0
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Run the pipeline on `source` and map the result to process output
pub async fn run(source: &str, generator: Arc<dyn TestGenerator>) -> CliOutcome {
    match Pipeline::new(generator).run(source).await {
        Ok(tests) => {
            tracing::debug!(repaired = tests.repaired, "tests generated");
            CliOutcome {
                stdout: tests.code,
                exit_code: 0,
            }
        }
        Err(err) => {
            tracing::debug!(error = %err, structural = err.is_structural(), "pipeline failed");
            CliOutcome::failure()
        }
    }
}

/// Write the outcome and return the process exit code
///
/// A failed write exits 1 even when the pipeline succeeded.
pub fn deliver<W: Write>(outcome: &CliOutcome, out: &mut W) -> i32 {
    match out
        .write_all(outcome.stdout.as_bytes())
        .and_then(|()| out.flush())
    {
        Ok(()) => outcome.exit_code,
        Err(err) => {
            tracing::debug!(error = %err, "stdout write failed");
            1
        }
    }
}

/// Read the input file, or stdin when `path` is `None`
///
/// Unreadable input is treated as empty, which the extractor rejects.
#[must_use]
pub fn read_source(path: Option<&Path>) -> String {
    match try_read_source(path) {
        Ok(source) => source,
        Err(err) => {
            tracing::debug!(error = %format!("{err:#}"), "input unreadable, treating as empty");
            String::new()
        }
    }
}

fn try_read_source(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            Ok(buf)
        }
    }
}

/// Check whether `TESTGEN_DEBUG` requests debug output
#[must_use]
pub fn debug_requested() -> bool {
    std::env::var(DEBUG_VAR).is_ok_and(|value| value == "1")
}

/// Install the stderr subscriber
///
/// `RUST_LOG` wins when set; otherwise `debug` turns on debug logs and
/// logging stays off.
pub fn init_tracing(debug: bool) {
    let default_directive = if debug { "debug" } else { "off" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    // A subscriber may already be installed when embedded
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use testgen_test_utils::{samples, ScriptedGenerator};

    #[tokio::test]
    async fn test_success_outcome() {
        let generator = Arc::new(ScriptedGenerator::with_outputs([samples::ACCEPTED_TESTS]));
        let outcome = run(samples::SIMPLE_FUNCTION, generator).await;
        assert!(outcome.is_success());
        assert_eq!(outcome.stdout, samples::ACCEPTED_TESTS);
    }

    #[tokio::test]
    async fn test_failure_outcome_has_no_newline() {
        let outcome = run("", Arc::new(ScriptedGenerator::new())).await;
        assert_eq!(outcome, CliOutcome::failure());
        assert!(!outcome.stdout.ends_with('\n'));
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_deliver_writes_exact_stdout() {
        let outcome = CliOutcome {
            stdout: samples::ACCEPTED_TESTS.to_string(),
            exit_code: 0,
        };
        let mut out = Vec::new();
        assert_eq!(deliver(&outcome, &mut out), 0);
        assert_eq!(out, samples::ACCEPTED_TESTS.as_bytes());
    }

    #[test]
    fn test_failed_write_exits_nonzero() {
        let outcome = CliOutcome {
            stdout: samples::ACCEPTED_TESTS.to_string(),
            exit_code: 0,
        };
        assert_eq!(deliver(&outcome, &mut ClosedPipe), 1);
        assert_eq!(deliver(&CliOutcome::failure(), &mut ClosedPipe), 1);
    }

    #[test]
    fn test_missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(read_source(Some(&dir.path().join("absent.py"))), "");
    }
}
