//! testgen Core Pipeline
//!
//! Wires the syntax layer and a [`TestGenerator`](testgen_provider::TestGenerator)
//! into the end-to-end flow:
//!
//! 1. Extract the single function, or stop
//! 2. Normalize it
//! 3. Generate candidate tests
//! 4. Validate; on rejection, repair exactly once and validate again
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use testgen_core::Pipeline;
//! use testgen_provider::{build_generator, GeneratorConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GeneratorConfig::from_env()?;
//! let pipeline = Pipeline::new(Arc::from(build_generator(&config)?));
//! let tests = pipeline.run("def add(a, b):\n    return a + b\n").await?;
//! print!("{}", tests.code);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod pipeline;

pub use error::{GenerationStage, PipelineError, USER_ERROR_MESSAGE};
pub use pipeline::{GeneratedTests, Pipeline};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
